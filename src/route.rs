//! Routes returned by a directions provider, and their corridor boxes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bounds::LatLngBounds;
use crate::error::GeoResult;
use crate::geodesy::LatLng;
use crate::polyline::Polyline;
use crate::route_boxer::box_path;

/// One leg of a route, between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub start: LatLng,
    pub end: LatLng,
    /// Meters.
    pub distance_m: f64,
    /// Seconds.
    pub duration_s: f64,
}

/// A route: its legs plus the full geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<Leg>,
    pub overview_path: Polyline,
}

impl Route {
    pub fn new(legs: Vec<Leg>, overview_path: Polyline) -> Self {
        Self {
            legs,
            overview_path,
        }
    }

    pub fn total_distance_km(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_m).sum::<f64>() / 1000.0
    }

    /// Total travel time. Negative or non-finite leg totals count as zero.
    pub fn total_duration(&self) -> Duration {
        let seconds: f64 = self.legs.iter().map(|leg| leg.duration_s).sum();
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
    }

    pub fn summary(&self) -> RouteSummary {
        RouteSummary {
            distance_km: self.total_distance_km(),
            duration: self.total_duration(),
        }
    }
}

/// Totals over all legs of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration: Duration,
}

impl RouteSummary {
    /// `None` when the duration is zero.
    pub fn average_speed_kmh(&self) -> Option<f64> {
        let hours = self.duration.as_secs_f64() / 3600.0;
        (hours > 0.0).then(|| self.distance_km / hours)
    }
}

/// A set of corridor boxes, optionally with the route they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoundedRoute {
    WithRoute {
        route: Route,
        bounds: Vec<LatLngBounds>,
    },
    BoundsOnly(Vec<LatLngBounds>),
}

impl BoundedRoute {
    /// Boxes the route's overview path with the given range.
    pub fn from_route(route: Route, range_km: f64) -> GeoResult<Self> {
        let bounds = box_path(route.overview_path.points(), range_km)?;
        Ok(Self::WithRoute { route, bounds })
    }

    pub fn bounds(&self) -> &[LatLngBounds] {
        match self {
            Self::WithRoute { bounds, .. } => bounds,
            Self::BoundsOnly(bounds) => bounds,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::WithRoute { route, .. } => Some(route),
            Self::BoundsOnly(_) => None,
        }
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            Self::WithRoute { route, .. } => Some(route),
            Self::BoundsOnly(_) => None,
        }
    }
}

impl From<Vec<LatLngBounds>> for BoundedRoute {
    fn from(bounds: Vec<LatLngBounds>) -> Self {
        Self::BoundsOnly(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(distance_m: f64, duration_s: f64) -> Leg {
        Leg {
            start: LatLng::new(0.0, 0.0),
            end: LatLng::new(0.0, 1.0),
            distance_m,
            duration_s,
        }
    }

    fn london_to_birmingham() -> Route {
        Route::new(
            vec![leg(120_000.0, 5_400.0), leg(60_500.0, 2_700.0)],
            Polyline::new(vec![LatLng::new(51.5, -0.12), LatLng::new(52.48, -1.9)]),
        )
    }

    #[test]
    fn test_totals() {
        let route = london_to_birmingham();
        assert!((route.total_distance_km() - 180.5).abs() < 1e-9);
        assert_eq!(route.total_duration(), Duration::from_secs(8_100));
    }

    #[test]
    fn test_summary_speed() {
        let summary = london_to_birmingham().summary();
        let speed = summary.average_speed_kmh().unwrap();
        assert!((speed - 180.5 / 2.25).abs() < 1e-9, "got {}", speed);
    }

    #[test]
    fn test_empty_route() {
        let route = Route::new(vec![], Polyline::default());
        assert_eq!(route.total_distance_km(), 0.0);
        assert_eq!(route.total_duration(), Duration::ZERO);
        assert_eq!(route.summary().average_speed_kmh(), None);
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let route = Route::new(vec![leg(10.0, -5.0)], Polyline::default());
        assert_eq!(route.total_duration(), Duration::ZERO);
    }

    #[test]
    fn test_from_route_boxes_overview_path() {
        let bounded = BoundedRoute::from_route(london_to_birmingham(), 5.0).unwrap();
        assert_eq!(bounded.bounds().len(), 23);
        assert!(bounded.route().is_some());
    }

    #[test]
    fn test_from_route_rejects_short_path() {
        let route = Route::new(vec![], Polyline::new(vec![LatLng::new(51.5, -0.12)]));
        assert!(BoundedRoute::from_route(route, 5.0).is_err());
    }

    #[test]
    fn test_bounds_only() {
        let bounds = vec![LatLngBounds::at_point(LatLng::new(1.0, 1.0))];
        let bounded = BoundedRoute::from(bounds.clone());
        assert_eq!(bounded.bounds(), &bounds[..]);
        assert!(bounded.route().is_none());
        assert!(bounded.into_route().is_none());
    }
}
