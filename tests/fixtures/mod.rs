//! Test fixtures for route-corridor.
//!
//! Provides realistic test data:
//! - Real UK towns along and away from the London to Birmingham motorway
//! - A polyline following that route

pub mod uk_locations;

pub use uk_locations::*;
