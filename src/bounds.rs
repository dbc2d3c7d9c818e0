//! Axis-aligned latitude/longitude rectangles.

use std::f64::consts::SQRT_2;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};
use crate::geodesy::{LatLng, distance_km, rhumb_destination};
use crate::traits::Location;

/// A rectangle given by its south-west and north-east corners.
///
/// Does not handle boxes that cross the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Zero-area box at `point`.
    pub fn at_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Box around `center` reaching at least `distance_km` in every
    /// cardinal direction.
    ///
    /// The corners sit `distance_km * √2` away along the diagonals, so the
    /// box over-approximates the circle of that radius.
    pub fn bounding_box(center: LatLng, distance_km: f64) -> Self {
        let diagonal = distance_km * SQRT_2;
        Self::new(
            rhumb_destination(center, 225.0, diagonal),
            rhumb_destination(center, 45.0, diagonal),
        )
    }

    /// Smallest box containing every point.
    pub fn from_points(points: &[LatLng]) -> GeoResult<Self> {
        let (first, rest) = points
            .split_first()
            .ok_or(GeoError::EmptyInput("no points to bound"))?;
        let mut bounds = Self::at_point(*first);
        for point in rest {
            bounds.extend(*point);
        }
        Ok(bounds)
    }

    /// Union of all boxes.
    pub fn largest_box(boxes: &[LatLngBounds]) -> GeoResult<Self> {
        let mut largest = *boxes
            .first()
            .ok_or(GeoError::EmptyInput("no boxes to merge"))?;
        for b in boxes {
            largest.extend(b.north_east);
            largest.extend(b.south_west);
        }
        Ok(largest)
    }

    /// Grows the box so it includes `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn contained_in_box<L: Location + ?Sized>(&self, location: &L) -> bool {
        self.contains(location.coordinates())
    }

    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(other.south_west) && self.contains(other.north_east)
    }

    /// Haversine distance from the centre to the north-east corner.
    pub fn distance_from_centre_km(&self) -> f64 {
        distance_km(self.center(), self.north_east)
    }

    /// Every value whose location falls inside the box, in input order.
    pub fn get_all_in_box<'a, T>(&self, values: &'a [T]) -> Vec<&'a T>
    where
        T: Location + Sync,
    {
        values
            .par_iter()
            .filter(|value| self.contained_in_box(*value))
            .collect()
    }
}
