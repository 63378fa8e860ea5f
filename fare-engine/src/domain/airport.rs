//! Airport code type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirportCode {
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// Codes are always 3 uppercase ASCII letters. The catalog loader uppercases
/// the column before parsing, so `vra` in a CSV file is accepted there, but
/// this constructor is strict.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::AirportCode;
///
/// let vra = AirportCode::parse("VRA").unwrap();
/// assert_eq!(vra.as_str(), "VRA");
///
/// assert!(AirportCode::parse("vra").is_err());
/// assert!(AirportCode::parse("VR").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AirportCode([u8; 3]);

impl AirportCode {
    /// Parse an airport code. The input must be exactly 3 letters A-Z.
    pub fn parse(s: &str) -> Result<Self, InvalidAirportCode> {
        let bytes: [u8; 3] = s.as_bytes().try_into().map_err(|_| InvalidAirportCode {
            reason: "must be exactly 3 characters",
        })?;

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidAirportCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(AirportCode(bytes))
    }

    pub fn as_str(&self) -> &str {
        // only ASCII letters are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AirportCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
