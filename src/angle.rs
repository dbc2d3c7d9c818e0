//! Angle representations: decimal degrees and degrees/minutes/seconds.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

/// Degrees to radians, computed as `deg * π / 180`.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Radians to degrees, computed as `rad * 180 / π`.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

/// Converts an angle in radians into a compass bearing in `[0, 360)`.
#[inline]
pub fn to_bearing(radians: f64) -> f64 {
    (to_degrees(radians) + 360.0) % 360.0
}

/// An angle in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecimalDegree(f64);

impl DecimalDegree {
    pub fn new(degrees: f64) -> Self {
        Self(degrees)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn to_radians(self) -> f64 {
        to_radians(self.0)
    }

    pub fn from_radians(radians: f64) -> Self {
        Self(to_degrees(radians))
    }

    /// Floor decomposition of the magnitude; the sign goes back on the degrees.
    pub fn to_dms(self) -> Dms {
        let negative = self.0 < 0.0;
        let magnitude = self.0.abs();

        let degrees = magnitude.floor();
        let fractional_minutes = (magnitude - degrees) * 60.0;
        let minutes = fractional_minutes.floor();
        let seconds = (fractional_minutes - minutes) * 60.0;

        let degrees = degrees as i32;
        Dms {
            degrees: if negative { -degrees } else { degrees },
            minutes: minutes as u32,
            seconds,
            negative,
        }
    }
}

impl From<f64> for DecimalDegree {
    fn from(degrees: f64) -> Self {
        Self(degrees)
    }
}

impl From<DecimalDegree> for f64 {
    fn from(dd: DecimalDegree) -> Self {
        dd.0
    }
}

impl From<Dms> for DecimalDegree {
    fn from(dms: Dms) -> Self {
        dms.to_decimal_degrees()
    }
}

impl fmt::Display for DecimalDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An angle in degrees, minutes and seconds.
///
/// The sign lives on the degrees. Angles between -1° and 0° have zero
/// degrees, so the sign is also tracked separately to keep conversions
/// lossless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DmsParts")]
pub struct Dms {
    degrees: i32,
    minutes: u32,
    seconds: f64,
    negative: bool,
}

impl Dms {
    /// Builds a DMS angle; minutes and seconds must each be within `0..=60`.
    pub fn new(degrees: i32, minutes: u32, seconds: f64) -> GeoResult<Self> {
        if minutes > 60 || !(0.0..=60.0).contains(&seconds) {
            return Err(GeoError::InvalidAngle { minutes, seconds });
        }
        Ok(Self {
            degrees,
            minutes,
            seconds,
            negative: degrees < 0,
        })
    }

    pub fn degrees(&self) -> i32 {
        self.degrees
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn to_decimal_degrees(&self) -> DecimalDegree {
        let sign = if self.negative { -1.0 } else { 1.0 };
        let magnitude = f64::from(self.degrees.unsigned_abs())
            + f64::from(self.minutes) / 60.0
            + self.seconds / 3600.0;
        DecimalDegree(sign * magnitude)
    }

    pub fn to_radians(&self) -> f64 {
        self.to_decimal_degrees().to_radians()
    }
}

/// Unchecked wire form of [`Dms`].
#[derive(Deserialize)]
struct DmsParts {
    degrees: i32,
    minutes: u32,
    seconds: f64,
    negative: bool,
}

impl TryFrom<DmsParts> for Dms {
    type Error = GeoError;

    fn try_from(parts: DmsParts) -> GeoResult<Self> {
        let dms = Dms::new(parts.degrees, parts.minutes, parts.seconds)?;
        // only zero degrees may carry either sign
        if parts.degrees != 0 && parts.negative != dms.negative {
            return Err(GeoError::InvalidSign {
                degrees: parts.degrees,
                negative: parts.negative,
            });
        }
        Ok(Self {
            negative: parts.negative,
            ..dms
        })
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { "-" } else { "" };
        write!(
            f,
            "{}{}°{}'{}\"",
            sign,
            self.degrees.unsigned_abs(),
            self.minutes,
            self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_dms_to_dd() {
        let dd = Dms::new(53, 19, 14.0).unwrap().to_decimal_degrees();
        assert!((dd.value() - 53.32055555555556).abs() < TOL);
    }

    #[test]
    fn test_negative_dms_to_dd() {
        let dd = Dms::new(-53, 19, 14.0).unwrap().to_decimal_degrees();
        assert!((dd.value() + 53.32055555555556).abs() < TOL);
    }

    #[test]
    fn test_dd_to_dms() {
        let dms = DecimalDegree::new(53.32055555555556).to_dms();
        assert_eq!(dms.degrees(), 53);
        assert_eq!(dms.minutes(), 19);
        assert!((dms.seconds() - 14.0).abs() < TOL);
    }

    #[test]
    fn test_dd_to_dms_fractional_seconds() {
        let dms = DecimalDegree::new(45.504305555555556).to_dms();
        assert_eq!(dms.degrees(), 45);
        assert_eq!(dms.minutes(), 30);
        assert!((dms.seconds() - 15.5).abs() < 1e-6);
    }

    #[test]
    fn test_negative_dd_to_dms_keeps_sign_on_degrees() {
        let dms = DecimalDegree::new(-74.006).to_dms();
        assert_eq!(dms.degrees(), -74);
        assert_eq!(dms.minutes(), 0);
        assert!(dms.is_negative());
    }

    #[test]
    fn test_round_trip() {
        for dd in [0.0, 0.5, -0.5, 1.0, -1.0, 53.3205, -53.3205, 179.999, -179.999, 359.75] {
            let back = DecimalDegree::new(dd).to_dms().to_decimal_degrees();
            assert!((back.value() - dd).abs() < TOL, "{} came back as {}", dd, back);
        }
    }

    #[test]
    fn test_zero_degrees_positive() {
        let dd = Dms::new(0, 30, 0.0).unwrap().to_decimal_degrees();
        assert!((dd.value() - 0.5).abs() < TOL);
    }

    #[test]
    fn test_rejects_minutes_over_60() {
        assert_eq!(
            Dms::new(12, 64, 54.0),
            Err(GeoError::InvalidAngle { minutes: 64, seconds: 54.0 })
        );
    }

    #[test]
    fn test_rejects_seconds_over_60() {
        assert!(Dms::new(12, 54, 64.0).is_err());
        assert!(Dms::new(45, 30, 61.5).is_err());
    }

    #[test]
    fn test_rejects_negative_or_nan_seconds() {
        assert!(Dms::new(12, 0, -1.0).is_err());
        assert!(Dms::new(12, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_accepts_boundary_values() {
        let dms = Dms::new(45, 60, 60.0).unwrap();
        assert_eq!(dms.minutes(), 60);
    }

    #[test]
    fn test_to_radians() {
        let rad = DecimalDegree::new(45.504305555555556).to_radians();
        assert!((rad - 0.793036688).abs() < 1e-6);
    }

    #[test]
    fn test_to_bearing_range() {
        assert!((to_bearing(0.0) - 0.0).abs() < TOL);
        assert!((to_bearing(-PI / 2.0) - 270.0).abs() < TOL);
        assert!((to_bearing(PI / 2.0) - 90.0).abs() < TOL);
        let b = to_bearing(-PI);
        assert!((0.0..360.0).contains(&b));
    }

    #[test]
    fn test_serde_round_trip() {
        let dms = DecimalDegree::new(-0.5).to_dms();
        let json = serde_json::to_string(&dms).unwrap();
        let back: Dms = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dms);
        assert!(back.is_negative());
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let json = r#"{"degrees":1,"minutes":99,"seconds":-5,"negative":false}"#;
        assert!(serde_json::from_str::<Dms>(json).is_err());

        let json = r#"{"degrees":1,"minutes":0,"seconds":75.0,"negative":false}"#;
        assert!(serde_json::from_str::<Dms>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_sign_mismatch() {
        let json = r#"{"degrees":-12,"minutes":30,"seconds":0.0,"negative":false}"#;
        let err = serde_json::from_str::<Dms>(json).unwrap_err();
        assert!(err.to_string().contains("-12"), "{}", err);

        let json = r#"{"degrees":12,"minutes":30,"seconds":0.0,"negative":true}"#;
        assert!(serde_json::from_str::<Dms>(json).is_err());
    }

    #[test]
    fn test_display() {
        let dms = Dms::new(-1, 43, 47.0).unwrap();
        assert_eq!(dms.to_string(), "-1°43'47\"");
    }
}
