//! Core capabilities the geometry and search code is written against.
//!
//! These are intentionally minimal. Concrete apps should implement them for
//! their own data models.

use serde::{Deserialize, Serialize};

use crate::error::DirectionsError;
use crate::geodesy::LatLng;
use crate::route::Route;

/// Anything with a position on the map.
pub trait Location {
    /// Position in decimal degrees.
    fn coordinates(&self) -> LatLng;

    /// Free-text address, if known.
    fn address(&self) -> Option<&str> {
        None
    }
}

impl Location for LatLng {
    fn coordinates(&self) -> LatLng {
        *self
    }
}

impl<T: Location + ?Sized> Location for &T {
    fn coordinates(&self) -> LatLng {
        (**self).coordinates()
    }

    fn address(&self) -> Option<&str> {
        (**self).address()
    }
}

/// Something that can route between points.
///
/// Implementations are expected to block until the route is available.
pub trait DirectionsProvider {
    fn directions(&self, request: &DirectionsRequest) -> Result<Route, DirectionsError>;
}

/// Road features a route should avoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Avoid {
    Tolls,
    Highways,
    Ferries,
}

/// Per-request routing options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionsOptions {
    pub avoid: Vec<Avoid>,
    /// Ask the provider for alternative routes. Only the first is used.
    pub alternatives: bool,
}

/// A request from `origin` to `destination` through optional waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    pub waypoints: Vec<LatLng>,
    pub options: DirectionsOptions,
}

impl DirectionsRequest {
    pub fn new(origin: LatLng, destination: LatLng) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            options: DirectionsOptions::default(),
        }
    }

    pub fn with_waypoints(mut self, waypoints: Vec<LatLng>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn with_options(mut self, options: DirectionsOptions) -> Self {
        self.options = options;
        self
    }

    /// Origin, waypoints and destination, in travel order.
    pub fn stops(&self) -> Vec<LatLng> {
        let mut stops = Vec::with_capacity(self.waypoints.len() + 2);
        stops.push(self.origin);
        stops.extend_from_slice(&self.waypoints);
        stops.push(self.destination);
        stops
    }
}
