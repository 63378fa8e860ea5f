//! Zone band type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid zone code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid zone code: {reason}")]
pub struct InvalidZone {
    reason: &'static str,
}

/// One of the four geographic bands along the coastal strip.
///
/// Zones are ordered `A < B < C < D`. The distance between two zones is the
/// difference of their indices, and it is what drives zone-to-zone fares.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::Zone;
///
/// let a = Zone::parse("A").unwrap();
/// let d = Zone::parse("d").unwrap();
/// assert_eq!(a.distance(d), 3);
/// assert!(a < d);
///
/// assert!(Zone::parse("E").is_err());
/// assert!(Zone::parse("AB").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    A,
    B,
    C,
    D,
}

impl Zone {
    /// All zones in axis order.
    pub const ALL: [Zone; 4] = [Zone::A, Zone::B, Zone::C, Zone::D];

    /// Parse a zone code.
    ///
    /// Accepts a single letter `A`-`D` in either case, surrounding whitespace
    /// ignored.
    pub fn parse(s: &str) -> Result<Self, InvalidZone> {
        let s = s.trim();
        let mut chars = s.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(InvalidZone {
                reason: "must be exactly 1 character",
            });
        };

        match c.to_ascii_uppercase() {
            'A' => Ok(Zone::A),
            'B' => Ok(Zone::B),
            'C' => Ok(Zone::C),
            'D' => Ok(Zone::D),
            _ => Err(InvalidZone {
                reason: "must be one of A, B, C, D",
            }),
        }
    }

    /// Position on the axis, 0 for `A` through 3 for `D`.
    pub fn index(self) -> usize {
        match self {
            Zone::A => 0,
            Zone::B => 1,
            Zone::C => 2,
            Zone::D => 3,
        }
    }

    /// Number of band boundaries crossed travelling between the two zones.
    pub fn distance(self, other: Zone) -> usize {
        self.index().abs_diff(other.index())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Zone::A => "A",
            Zone::B => "B",
            Zone::C => "C",
            Zone::D => "D",
        }
    }
}

impl FromStr for Zone {
    type Err = InvalidZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
