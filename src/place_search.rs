//! Finds places near a point or along a boxed route.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bounds::LatLngBounds;
use crate::geodesy::LatLng;
use crate::route::{BoundedRoute, Route};
use crate::traits::Location;

/// Options for [`PlaceSearch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Report each place at most once in [`PlaceSearch::along`], even when
    /// several corridor boxes overlap it.
    pub dedupe: bool,
}

/// Places found around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesAroundPoint<T> {
    pub places: Vec<T>,
    pub centre: LatLng,
}

/// Places found along a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesAlongRoute<T> {
    /// The route the corridor was built from, when known.
    pub route: Option<Route>,
    pub places: Vec<T>,
}

/// A fixed list of candidate places to search.
#[derive(Debug, Clone)]
pub struct PlaceSearch<T> {
    places: Vec<T>,
    options: SearchOptions,
}

impl<T> PlaceSearch<T>
where
    T: Location + Clone + Send + Sync,
{
    pub fn new(places: Vec<T>) -> Self {
        Self::with_options(places, SearchOptions::default())
    }

    pub fn with_options(places: Vec<T>, options: SearchOptions) -> Self {
        Self { places, options }
    }

    pub fn places(&self) -> &[T] {
        &self.places
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Places inside the square reaching `distance_km` from `centre` in
    /// every cardinal direction. The square's corners reach further, so
    /// this is a coarse filter.
    pub fn around(&self, centre: LatLng, distance_km: f64) -> PlacesAroundPoint<T> {
        let bounds = LatLngBounds::bounding_box(centre, distance_km);
        let places: Vec<T> = bounds
            .get_all_in_box(&self.places)
            .into_iter()
            .cloned()
            .collect();
        debug!(
            candidates = self.places.len(),
            hits = places.len(),
            distance_km,
            "places around point"
        );
        PlacesAroundPoint { places, centre }
    }

    /// Places inside any of the route's corridor boxes.
    ///
    /// Boxes are checked in order and hits are appended box by box. Without
    /// [`SearchOptions::dedupe`] a place covered by several boxes is
    /// reported once per box.
    pub fn along(&self, route: &BoundedRoute) -> PlacesAlongRoute<T> {
        let boxes = route.bounds();
        let places = match LatLngBounds::largest_box(boxes) {
            Ok(union) => self.collect_along(&union, boxes),
            Err(_) => Vec::new(),
        };
        debug!(
            candidates = self.places.len(),
            boxes = boxes.len(),
            hits = places.len(),
            dedupe = self.options.dedupe,
            "places along route"
        );
        PlacesAlongRoute {
            route: route.route().cloned(),
            places,
        }
    }

    fn collect_along(&self, union: &LatLngBounds, boxes: &[LatLngBounds]) -> Vec<T> {
        let candidates: Vec<Candidate<'_, T>> = self
            .places
            .iter()
            .enumerate()
            .map(|(index, place)| Candidate { index, place })
            .collect();
        let coarse = union.get_all_in_box(&candidates);

        let mut seen = vec![false; self.places.len()];
        let mut places = Vec::new();
        for b in boxes {
            for hit in b.get_all_in_box(&coarse) {
                if self.options.dedupe {
                    if seen[hit.index] {
                        continue;
                    }
                    seen[hit.index] = true;
                }
                places.push(hit.place.clone());
            }
        }
        places
    }
}

impl<T> From<Vec<T>> for PlaceSearch<T>
where
    T: Location + Clone + Send + Sync,
{
    fn from(places: Vec<T>) -> Self {
        Self::new(places)
    }
}

/// A place plus its position in the candidate list.
struct Candidate<'a, T> {
    index: usize,
    place: &'a T,
}

impl<T: Location> Location for Candidate<'_, T> {
    fn coordinates(&self) -> LatLng {
        self.place.coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_and(other: LatLng) -> PlaceSearch<LatLng> {
        PlaceSearch::new(vec![other, LatLng::new(0.0, 0.0)])
    }

    #[test]
    fn test_around_lat_only_one_point() {
        let result = origin_and(LatLng::new(1.0, 0.0)).around(LatLng::new(0.0, 0.0), 10.0);
        assert_eq!(result.places, vec![LatLng::new(0.0, 0.0)]);
        assert_eq!(result.centre, LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_around_lat_only_two_points() {
        let result = origin_and(LatLng::new(1.0, 0.0)).around(LatLng::new(0.0, 0.0), 112.0);
        assert_eq!(result.places.len(), 2);
    }

    #[test]
    fn test_around_lat_lng_one_point() {
        let result = origin_and(LatLng::new(1.0, 1.0)).around(LatLng::new(0.0, 0.0), 100.0);
        assert_eq!(result.places.len(), 1);
    }

    #[test]
    fn test_around_lat_lng_two_points() {
        let result = origin_and(LatLng::new(1.0, 1.0)).around(LatLng::new(0.0, 0.0), 112.0);
        assert_eq!(result.places.len(), 2);
    }

    #[test]
    fn test_along_keeps_duplicates_by_default() {
        let search = PlaceSearch::new(vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.0)]);
        let route = BoundedRoute::BoundsOnly(vec![
            LatLngBounds::at_point(LatLng::new(0.0, 0.0)),
            LatLngBounds::new(LatLng::new(-1.0, -1.0), LatLng::new(1.0, 1.0)),
        ]);
        let result = search.along(&route);
        assert_eq!(result.places.len(), 4);
        assert!(result.route.is_none());
    }

    #[test]
    fn test_along_dedupe() {
        let places = vec![LatLng::new(0.0, 0.0), LatLng::new(0.5, 0.5), LatLng::new(5.0, 5.0)];
        let search = PlaceSearch::with_options(places, SearchOptions { dedupe: true });
        let route = BoundedRoute::BoundsOnly(vec![
            LatLngBounds::new(LatLng::new(-1.0, -1.0), LatLng::new(1.0, 1.0)),
            LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(2.0, 2.0)),
        ]);
        let result = search.along(&route);
        assert_eq!(result.places, vec![LatLng::new(0.0, 0.0), LatLng::new(0.5, 0.5)]);
    }

    #[test]
    fn test_along_orders_by_box() {
        let places = vec![LatLng::new(1.5, 1.5), LatLng::new(0.5, 0.5)];
        let search = PlaceSearch::new(places);
        let route = BoundedRoute::BoundsOnly(vec![
            LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)),
            LatLngBounds::new(LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)),
        ]);
        let result = search.along(&route);
        assert_eq!(result.places, vec![LatLng::new(0.5, 0.5), LatLng::new(1.5, 1.5)]);
    }

    #[test]
    fn test_along_without_boxes() {
        let search = PlaceSearch::new(vec![LatLng::new(0.0, 0.0)]);
        let result = search.along(&BoundedRoute::BoundsOnly(vec![]));
        assert!(result.places.is_empty());
    }
}
