//! Polyline representation for route geometries.
//!
//! Routes are handled as decoded coordinate sequences. The compact encoded
//! form ([Google's polyline algorithm]) only appears at the boundary, when
//! reading a provider response.
//!
//! [Google's polyline algorithm]: https://developers.google.com/maps/documentation/utilities/polylinealgorithm

use serde::{Deserialize, Serialize};

use crate::bounds::LatLngBounds;
use crate::error::{GeoError, GeoResult};
use crate::geodesy::LatLng;

/// Decimal places kept by the standard encoding.
pub const DEFAULT_PRECISION: u32 = 5;

/// Largest precision that still fits every coordinate in an `i64`.
const MAX_PRECISION: u32 = 12;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<LatLng>,
}

impl Polyline {
    pub fn new(points: Vec<LatLng>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    pub fn into_points(self) -> Vec<LatLng> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> GeoResult<LatLngBounds> {
        LatLngBounds::from_points(&self.points)
    }

    /// Decodes an encoded polyline with `precision` decimal places.
    pub fn decode(encoded: &str, precision: u32) -> GeoResult<Self> {
        let factor = scale(precision)?;
        let mut reader = Reader {
            bytes: encoded.as_bytes(),
            pos: 0,
        };

        let mut points = Vec::new();
        let (mut lat, mut lng) = (0i64, 0i64);
        while !reader.at_end() {
            lat = reader.accumulate(lat)?;
            if reader.at_end() {
                return Err(GeoError::InvalidPolyline(format!(
                    "missing longitude after byte {}",
                    reader.pos
                )));
            }
            lng = reader.accumulate(lng)?;
            points.push(LatLng::new(lat as f64 / factor, lng as f64 / factor));
        }

        Ok(Self { points })
    }

    /// Encodes the points with `precision` decimal places.
    pub fn encode(&self, precision: u32) -> GeoResult<String> {
        let factor = scale(precision)?;
        let mut out = String::new();
        let (mut prev_lat, mut prev_lng) = (0i64, 0i64);
        for point in &self.points {
            let lat = to_fixed(point.lat, factor)?;
            let lng = to_fixed(point.lng, factor)?;
            write_value(&mut out, delta(lat, prev_lat)?);
            write_value(&mut out, delta(lng, prev_lng)?);
            prev_lat = lat;
            prev_lng = lng;
        }
        Ok(out)
    }
}

impl From<Vec<LatLng>> for Polyline {
    fn from(points: Vec<LatLng>) -> Self {
        Self::new(points)
    }
}

fn scale(precision: u32) -> GeoResult<f64> {
    if precision > MAX_PRECISION {
        return Err(GeoError::InvalidPolyline(format!(
            "precision {} is above {}",
            precision, MAX_PRECISION
        )));
    }
    Ok(10f64.powi(precision as i32))
}

/// Scaled coordinates are kept within ±2^61 so that every delta fits the
/// zigzag encoding.
const MAX_FIXED: f64 = (1u64 << 61) as f64;

fn to_fixed(value: f64, factor: f64) -> GeoResult<i64> {
    let scaled = (value * factor).round();
    if !scaled.is_finite() || scaled.abs() >= MAX_FIXED {
        return Err(GeoError::InvalidPolyline(format!(
            "coordinate {} can't be encoded",
            value
        )));
    }
    Ok(scaled as i64)
}

fn delta(value: i64, prev: i64) -> GeoResult<i64> {
    value.checked_sub(prev).ok_or_else(|| {
        GeoError::InvalidPolyline(format!("delta from {} to {} overflows", prev, value))
    })
}

fn write_value(out: &mut String, value: i64) {
    let zigzag = if value < 0 { !(value << 1) } else { value << 1 };
    let mut v = zigzag as u64;
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Adds the next value to the running coordinate `total`.
    fn accumulate(&mut self, total: i64) -> GeoResult<i64> {
        let value = self.next_value()?;
        total.checked_add(value).ok_or_else(|| {
            GeoError::InvalidPolyline(format!("coordinate overflows at byte {}", self.pos))
        })
    }

    /// Reads one zigzag-encoded signed value.
    fn next_value(&mut self) -> GeoResult<i64> {
        let mut result: u64 = 0;
        let mut shift = 0;
        loop {
            let chunk = self.next_chunk()?;
            if shift > 60 {
                return Err(GeoError::InvalidPolyline(format!(
                    "value too long at byte {}",
                    self.pos
                )));
            }
            result |= (chunk & 0x1f) << shift;
            if chunk & 0x20 == 0 {
                break;
            }
            shift += 5;
        }
        let value = result as i64;
        Ok(if value & 1 == 1 { !(value >> 1) } else { value >> 1 })
    }

    fn next_chunk(&mut self) -> GeoResult<u64> {
        let byte = *self.bytes.get(self.pos).ok_or_else(|| {
            GeoError::InvalidPolyline(format!("truncated value at byte {}", self.pos))
        })?;
        self.pos += 1;
        match byte.checked_sub(63) {
            Some(chunk) if chunk < 64 => Ok(u64::from(chunk)),
            _ => Err(GeoError::InvalidPolyline(format!(
                "unexpected character {:?} at byte {}",
                char::from(byte),
                self.pos - 1
            ))),
        }
    }
}
