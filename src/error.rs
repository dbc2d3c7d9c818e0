//! Error types for the geospatial core and the directions adapter.

use thiserror::Error;

/// Errors produced by the geometry, postcode and search code.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    #[error("invalid angle: {minutes} minutes, {seconds} seconds (each must be within 0..=60)")]
    InvalidAngle { minutes: u32, seconds: f64 },

    #[error("sign flag (negative: {negative}) disagrees with {degrees} degrees")]
    InvalidSign { degrees: i32, negative: bool },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("'{0}' is not a valid postcode and can't be fixed")]
    InvalidPostcode(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("distance must be finite and positive, got {0}")]
    InvalidDistance(f64),

    #[error("invalid encoded polyline: {0}")]
    InvalidPolyline(String),
}

pub type GeoResult<T> = Result<T, GeoError>;

/// Errors returned by a directions provider.
#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {code}: {message}")]
    Provider { code: String, message: String },

    #[error("provider returned no route")]
    NoRoute,

    #[error("route geometry: {0}")]
    Geometry(#[from] GeoError),
}
