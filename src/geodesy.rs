//! Spherical-earth geodesy: rhumb lines, great circles and a local
//! equirectangular projection.
//!
//! All formulae use a spherical Earth of mean radius 6371 km. They follow
//! the movable-type.co.uk latitude/longitude scripts.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::{DecimalDegree, Dms, to_bearing, to_degrees, to_radians};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Latitude difference (radians) below which a rhumb line is treated as
/// running due east/west.
const RHUMB_EPSILON: f64 = 1e-10;

/// A geographic coordinate in decimal degrees.
///
/// `LatLng::default()` is (0, 0), which is also the sentinel
/// [`rhumb_destination`] returns when the formula breaks down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn from_decimal(lat: DecimalDegree, lng: DecimalDegree) -> Self {
        Self::new(lat.value(), lng.value())
    }

    pub fn from_dms(lat: Dms, lng: Dms) -> Self {
        Self::from_decimal(lat.to_decimal_degrees(), lng.to_decimal_degrees())
    }

    pub fn lat_degrees(&self) -> DecimalDegree {
        DecimalDegree::new(self.lat)
    }

    pub fn lng_degrees(&self) -> DecimalDegree {
        DecimalDegree::new(self.lng)
    }

    pub fn rhumb_destination(self, bearing: f64, distance_km: f64) -> LatLng {
        rhumb_destination(self, bearing, distance_km)
    }

    pub fn rhumb_bearing_to(self, dest: LatLng) -> f64 {
        rhumb_bearing(self, dest)
    }

    pub fn distance_to(self, other: LatLng) -> f64 {
        distance_km(self, other)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.lat, self.lng)
    }
}

/// Point reached by travelling `distance_km` from `start` along a constant
/// `bearing` (degrees clockwise from north).
///
/// Returns `None` when the result is not a number, which happens when the
/// path runs into a pole.
pub fn try_rhumb_destination(start: LatLng, bearing: f64, distance_km: f64) -> Option<LatLng> {
    let d = distance_km / EARTH_RADIUS_KM;
    let lat1 = to_radians(start.lat);
    let lng1 = to_radians(start.lng);
    let theta = to_radians(bearing);

    let mut lat2 = lat1 + d * theta.cos();
    let d_lat = lat2 - lat1;
    let d_phi = ((lat2 / 2.0 + PI / 4.0).tan() / (lat1 / 2.0 + PI / 4.0).tan()).ln();
    let q = if d_lat.abs() > RHUMB_EPSILON {
        d_lat / d_phi
    } else {
        lat1.cos()
    };
    let d_lng = d * theta.sin() / q;

    // past the pole
    if lat2.abs() > PI / 2.0 {
        lat2 = if lat2 > 0.0 { PI - lat2 } else { -(PI - lat2) };
    }
    let lng2 = (lng1 + d_lng + PI) % (2.0 * PI) - PI;

    if lat2.is_nan() || lng2.is_nan() {
        return None;
    }
    Some(LatLng::new(to_degrees(lat2), to_degrees(lng2)))
}

/// Like [`try_rhumb_destination`], but returns the zero `LatLng` instead of
/// `None`. Callers can detect the sentinel by comparing with
/// `LatLng::default()`.
pub fn rhumb_destination(start: LatLng, bearing: f64, distance_km: f64) -> LatLng {
    try_rhumb_destination(start, bearing, distance_km).unwrap_or_default()
}

/// Constant bearing from `start` to `dest`, in `[0, 360)`.
pub fn rhumb_bearing(start: LatLng, dest: LatLng) -> f64 {
    let mut d_lng = to_radians(dest.lng - start.lng);
    let d_phi = ((to_radians(dest.lat) / 2.0 + PI / 4.0).tan()
        / (to_radians(start.lat) / 2.0 + PI / 4.0).tan())
    .ln();
    // take the shorter way round
    if d_lng.abs() > PI {
        d_lng = if d_lng > 0.0 {
            -(2.0 * PI - d_lng)
        } else {
            2.0 * PI + d_lng
        };
    }
    to_bearing(d_lng.atan2(d_phi))
}

/// Destination along a great circle from `start` with initial `bearing`.
pub fn great_circle_destination(start: LatLng, bearing: f64, distance_km: f64) -> LatLng {
    let d = distance_km / EARTH_RADIUS_KM;
    let lat1 = to_radians(start.lat);
    let lng1 = to_radians(start.lng);
    let theta = to_radians(bearing);

    let lat2 = (lat1.sin() * d.cos() + lat1.cos() * d.sin() * theta.cos()).asin();
    let y = theta.sin() * d.sin() * lat1.cos();
    let x = d.cos() - lat1.sin() * lat2.sin();
    let lng2 = lng1 + y.atan2(x);

    LatLng::new(to_degrees(lat2), to_degrees(lng2))
}

/// Haversine great-circle distance in kilometers.
pub fn distance_km(from: LatLng, to: LatLng) -> f64 {
    let lat1 = to_radians(from.lat);
    let lat2 = to_radians(to.lat);
    let lng1 = to_radians(from.lng);
    let lng2 = to_radians(to.lng);

    let a = ((lat2 - lat1) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lng2 - lng1) / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Local planar coordinates in kilometers relative to a projection centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquirectangularCoordinate {
    pub x: f64,
    pub y: f64,
}

/// Equirectangular projection around a fixed centre.
///
/// Only accurate close to the centre; meant for local-scale comparisons.
#[derive(Debug, Clone)]
pub struct EquirectangularProjection {
    centre: LatLng,
    cos_lat: f64,
}

impl EquirectangularProjection {
    pub fn new(centre: LatLng) -> Self {
        Self {
            centre,
            cos_lat: to_radians(centre.lat).cos(),
        }
    }

    pub fn centre(&self) -> LatLng {
        self.centre
    }

    pub fn project(&self, point: LatLng) -> EquirectangularCoordinate {
        EquirectangularCoordinate {
            x: EARTH_RADIUS_KM
                * (to_radians(point.lng) - to_radians(self.centre.lng))
                * self.cos_lat,
            y: EARTH_RADIUS_KM * (to_radians(point.lat) - to_radians(self.centre.lat)),
        }
    }
}
