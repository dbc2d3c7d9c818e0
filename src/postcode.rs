//! UK postcodes packed into a single integer.
//!
//! A postcode such as `SW1A 1AA` is an outward code (area letters plus
//! district) and an inward code (sector digit plus two unit letters). Each
//! field is folded into a mixed-radix integer, in this order:
//!
//! | field                  | base | encoding                         |
//! |------------------------|------|----------------------------------|
//! | area letter            | 26   | `A`..`Z`                         |
//! | second area letter     | 27   | 0 = absent, then `A`..`Z`        |
//! | district digit         | 10   | `0`..`9`                         |
//! | second district char   | 37   | 0 = absent, `0`..`9`, `A`..`Z`   |
//! | sector digit           | 10   | `0`..`9`                         |
//! | unit letters (two)     | 26   | `A`..`Z`                         |
//!
//! Every well-formed postcode maps to exactly one integer below
//! [`Postcode::MAX_VALUE`], so equality and hashing are integer operations.

use std::fmt;
use std::str::{Chars, FromStr};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, GeoResult};

static FIXABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*[a-z01]{1,2}[0-9oi][a-z0-9]?\s*[0-9oi][a-z01]{2}\s*$")
        .expect("postcode fix pattern must compile")
});

/// A validated UK postcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Postcode(u32);

impl Postcode {
    /// One past the largest encoded value.
    pub const MAX_VALUE: u32 = 26 * 27 * 10 * 37 * 10 * 26 * 26;

    /// Parses a postcode in a single pass. Case is ignored, as are spaces
    /// anywhere in the input. Anything left over after the unit letters is
    /// an error.
    pub fn try_parse(s: &str) -> Option<Postcode> {
        let mut input = Input { chars: s.chars() };

        let mut current = input.next();
        let mut data = parse_letter(current)?;

        current = input.next();
        data *= 27;
        if is_letter(current) {
            data += parse_letter(current)? + 1;
            current = input.next();
        }

        data = data * 10 + parse_digit(current)?;

        // one character of lookahead decides whether `current` is a second
        // district character or already the sector digit
        current = input.next();
        let mut next = input.next();
        data *= 37;
        if is_digit(next) {
            data += if is_digit(current) {
                parse_digit(current)? + 1
            } else {
                parse_letter(current)? + 11
            };
            current = next;
            next = input.next();
        }

        data = data * 10 + parse_digit(current)?;
        data = data * 26 + parse_letter(next)?;
        data = data * 26 + parse_letter(input.next())?;

        if input.next().is_some() {
            return None;
        }
        Some(Postcode(data))
    }

    /// Parses `s`, falling back to [`Postcode::try_fix`].
    pub fn parse(s: &str) -> GeoResult<Postcode> {
        Self::try_parse(s)
            .or_else(|| Self::try_fix(s))
            .ok_or_else(|| GeoError::InvalidPostcode(s.to_string()))
    }

    /// Repairs common transcription slips before parsing: `0`/`O` and
    /// `1`/`I` swapped, odd case, stray whitespace.
    ///
    /// Each position is coerced to what the format expects there, so
    /// `SWIA IAA` becomes `SW1A 1AA`.
    pub fn try_fix(s: &str) -> Option<Postcode> {
        if !FIXABLE.is_match(s) {
            return None;
        }

        let cleaned: Vec<char> = s
            .to_uppercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let split = cleaned.len().checked_sub(3)?;
        let (outward, inward) = cleaned.split_at(split);

        let outward = match outward.len() {
            2 => coerce("LN", outward),
            3 => coerce("L??", outward),
            4 => coerce("LLN?", outward),
            _ => outward.iter().collect(),
        };
        let inward = coerce("NLL", inward);

        Self::try_parse(&format!("{} {}", outward, inward))
    }

    pub fn fix(s: &str) -> GeoResult<Postcode> {
        Self::try_fix(s).ok_or_else(|| GeoError::InvalidPostcode(s.to_string()))
    }

    pub fn to_u32(self) -> u32 {
        self.0
    }

    pub fn from_u32(value: u32) -> GeoResult<Postcode> {
        if value >= Self::MAX_VALUE {
            return Err(GeoError::InvalidPostcode(format!("encoded value {}", value)));
        }
        Ok(Postcode(value))
    }

    /// Area and district, e.g. `SW1A`.
    pub fn outward(&self) -> String {
        self.decode().outward()
    }

    /// Sector and unit, e.g. `1AA`.
    pub fn inward(&self) -> String {
        self.decode().inward()
    }

    fn decode(&self) -> Decoded {
        let mut data = self.0;
        let mut take = |base: u32| {
            let rem = data % base;
            data /= base;
            rem
        };

        let unit_2 = letter(take(26));
        let unit_1 = letter(take(26));
        let sector = digit(take(10));
        let district_2 = match take(37) {
            0 => None,
            n @ 1..=10 => Some(digit(n - 1)),
            n => Some(letter(n - 11)),
        };
        let district_1 = digit(take(10));
        let area_2 = match take(27) {
            0 => None,
            n => Some(letter(n - 1)),
        };
        let area_1 = letter(take(26));

        Decoded {
            area: [Some(area_1), area_2],
            district: [Some(district_1), district_2],
            inward: [sector, unit_1, unit_2],
        }
    }
}

struct Decoded {
    area: [Option<char>; 2],
    district: [Option<char>; 2],
    inward: [char; 3],
}

impl Decoded {
    fn outward(&self) -> String {
        self.area.iter().chain(&self.district).flatten().collect()
    }

    fn inward(&self) -> String {
        self.inward.iter().collect()
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decoded = self.decode();
        write!(f, "{} {}", decoded.outward(), decoded.inward())
    }
}

impl FromStr for Postcode {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Postcode {
    type Error = GeoError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Postcode> for String {
    fn from(postcode: Postcode) -> Self {
        postcode.to_string()
    }
}

/// Characters of the input with ASCII spaces skipped.
struct Input<'a> {
    chars: Chars<'a>,
}

impl Input<'_> {
    fn next(&mut self) -> Option<char> {
        self.chars.find(|c| *c != ' ')
    }
}

// The end of input counts as a digit for lookahead purposes.
fn is_letter(c: Option<char>) -> bool {
    c.is_some_and(|c| c >= 'A')
}

fn is_digit(c: Option<char>) -> bool {
    !is_letter(c)
}

fn parse_letter(c: Option<char>) -> Option<u32> {
    let c = c?.to_ascii_uppercase();
    c.is_ascii_uppercase().then(|| c as u32 - 'A' as u32)
}

fn parse_digit(c: Option<char>) -> Option<u32> {
    c?.to_digit(10)
}

fn letter(n: u32) -> char {
    char::from(b'A' + n as u8)
}

fn digit(n: u32) -> char {
    char::from(b'0' + n as u8)
}

/// Coerces each character towards the class the pattern expects: `L` for
/// a letter, `N` for a digit, `?` for either.
fn coerce(pattern: &str, input: &[char]) -> String {
    pattern
        .chars()
        .zip(input)
        .map(|(target, &c)| match (target, c) {
            ('L', '0') => 'O',
            ('L', '1') => 'I',
            ('N', 'O') => '0',
            ('N', 'I') => '1',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: [&str; 7] = [
        "SW1A 1AA", "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "W1A 0AX", "EC1A 1BB",
    ];

    #[test]
    fn test_parse_and_display_round_trip() {
        for s in VALID {
            let postcode = Postcode::try_parse(s).unwrap_or_else(|| panic!("{} should parse", s));
            assert_eq!(postcode.to_string(), s);
        }
    }

    #[test]
    fn test_parse_ignores_case_and_spaces() {
        let postcode = Postcode::try_parse(" sw1a1aa ").unwrap();
        assert_eq!(postcode.to_string(), "SW1A 1AA");
        assert_eq!(Postcode::try_parse("s w 1 a 1 a a"), Some(postcode));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in [
            "",
            "SW1A 1A",
            "SW1A 1AAA",
            "1SW 1AA",
            "SW1A-1AA",
            "SWAA 1AA",
            "SW1A 1A1",
            "SW1A\t1AA",
        ] {
            assert_eq!(Postcode::try_parse(s), None, "{:?} should not parse", s);
        }
    }

    #[test]
    fn test_outward_and_inward() {
        let postcode: Postcode = "DN55 1PT".parse().unwrap();
        assert_eq!(postcode.outward(), "DN55");
        assert_eq!(postcode.inward(), "1PT");

        let postcode: Postcode = "M1 1AE".parse().unwrap();
        assert_eq!(postcode.outward(), "M1");
        assert_eq!(postcode.inward(), "1AE");
    }

    #[test]
    fn test_encoding_is_stable() {
        let a = Postcode::try_parse("A0 0AA").unwrap();
        assert_eq!(a.to_u32(), 0);
        let z = Postcode::try_parse("ZZ9Z 9ZZ").unwrap();
        assert_eq!(z.to_u32(), Postcode::MAX_VALUE - 1);
        assert!(Postcode::MAX_VALUE < 1 << 31);
    }

    #[test]
    fn test_from_u32() {
        let postcode = Postcode::try_parse("CR2 6XH").unwrap();
        assert_eq!(Postcode::from_u32(postcode.to_u32()), Ok(postcode));
        assert!(Postcode::from_u32(Postcode::MAX_VALUE).is_err());
    }

    #[test]
    fn test_equality_follows_encoding() {
        let a = Postcode::try_parse("b338th").unwrap();
        let b = Postcode::try_parse("B33 8TH").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_u32(), b.to_u32());
        assert_ne!(a, Postcode::try_parse("B33 8TJ").unwrap());
    }

    #[test]
    fn test_fix_swapped_characters() {
        assert_eq!(Postcode::fix("SWIA IAA").unwrap().to_string(), "SW1A 1AA");
        assert_eq!(Postcode::fix("0X1 1AA").unwrap().to_string(), "OX1 1AA");
        assert_eq!(Postcode::fix("DN55 IPT").unwrap().to_string(), "DN55 1PT");
        assert_eq!(Postcode::fix("m1 iae").unwrap().to_string(), "M1 1AE");
        assert_eq!(Postcode::fix("  cr2   6xh ").unwrap().to_string(), "CR2 6XH");
    }

    #[test]
    fn test_fix_is_idempotent() {
        for s in ["SWIA IAA", "sw1a 1aa", "B33 8TH", "0X1 1AA"] {
            let once = Postcode::fix(s).unwrap();
            let twice = Postcode::fix(&once.to_string()).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_fix_rejects_unfixable() {
        assert!(Postcode::try_fix("not a postcode").is_none());
        assert!(Postcode::try_fix("SW1A").is_none());
        assert!(matches!(
            Postcode::fix("12345"),
            Err(GeoError::InvalidPostcode(_))
        ));
    }

    #[test]
    fn test_parse_falls_back_to_fix() {
        assert_eq!(Postcode::parse("SWIA IAA").unwrap().to_string(), "SW1A 1AA");
        let err = Postcode::parse("nope").unwrap_err();
        assert_eq!(err, GeoError::InvalidPostcode("nope".to_string()));
    }

    #[test]
    fn test_coerce() {
        let input: Vec<char> = "0O8".chars().collect();
        assert_eq!(coerce("LLN", &input), "OO8");
        let input: Vec<char> = "IO1".chars().collect();
        assert_eq!(coerce("N??", &input), "1O1");
    }
}
