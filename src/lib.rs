//! route-corridor core
//!
//! Spherical geodesy, corridor boxing of route polylines, and containment
//! search for places near a point or along a route.

pub mod error;
pub mod angle;
pub mod geodesy;
pub mod bounds;
pub mod polyline;
pub mod route_boxer;
pub mod traits;
pub mod route;
pub mod place_search;
pub mod postcode;
pub mod osrm;

pub use bounds::LatLngBounds;
pub use error::{DirectionsError, GeoError, GeoResult};
pub use geodesy::LatLng;
pub use postcode::Postcode;
