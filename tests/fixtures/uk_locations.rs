//! Real UK towns and motorway services for realistic test fixtures.
//!
//! Coordinates are town centres (or the services' car park), taken from
//! OpenStreetMap and rounded to four decimal places.

use route_corridor::geodesy::LatLng;
use route_corridor::traits::Location;

/// A named place with coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }
}

impl Location for Place {
    fn coordinates(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    fn address(&self) -> Option<&str> {
        Some(self.name)
    }
}

// ============================================================================
// London to Birmingham, roughly following the M1 and M6
// ============================================================================

pub const LONDON: Place = Place::new("London", 51.5074, -0.1278);
pub const WATFORD: Place = Place::new("Watford", 51.6565, -0.3903);
pub const MILTON_KEYNES: Place = Place::new("Milton Keynes", 52.0406, -0.7594);
pub const NORTHAMPTON: Place = Place::new("Northampton", 52.2405, -0.9027);
pub const COVENTRY: Place = Place::new("Coventry", 52.4068, -1.5197);
pub const BIRMINGHAM: Place = Place::new("Birmingham", 52.4862, -1.8904);

pub const LONDON_TO_BIRMINGHAM: &[Place] = &[
    LONDON,
    WATFORD,
    MILTON_KEYNES,
    NORTHAMPTON,
    COVENTRY,
    BIRMINGHAM,
];

// ============================================================================
// Places close to that route
// ============================================================================

pub const NEAR_ROUTE: &[Place] = &[
    Place::new("Luton", 51.8787, -0.4200),
    Place::new("Toddington Services", 51.9484, -0.5125),
    Place::new("Newport Pagnell Services", 52.0838, -0.7523),
    Place::new("Watford Gap Services", 52.3063, -1.1217),
    Place::new("Rugby", 52.3709, -1.2650),
];

// ============================================================================
// Places well away from it
// ============================================================================

pub const OFF_ROUTE: &[Place] = &[
    Place::new("Oxford", 51.7520, -1.2577),
    Place::new("Cambridge", 52.2053, 0.1218),
    Place::new("Reading", 51.4543, -0.9781),
    Place::new("Manchester", 53.4808, -2.2426),
    Place::new("Bristol", 51.4545, -2.5879),
    Place::new("Leeds", 53.8008, -1.5491),
    Place::new("Norwich", 52.6309, 1.2974),
    Place::new("Brighton", 50.8225, -0.1372),
    Place::new("Edinburgh", 55.9533, -3.1883),
];

/// Route stops, nearby places and far-away places, in that order.
pub fn all_places() -> Vec<Place> {
    LONDON_TO_BIRMINGHAM
        .iter()
        .chain(NEAR_ROUTE)
        .chain(OFF_ROUTE)
        .cloned()
        .collect()
}

pub fn route_path() -> Vec<LatLng> {
    LONDON_TO_BIRMINGHAM.iter().map(|p| p.coordinates()).collect()
}
