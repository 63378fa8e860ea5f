//! Places and their pricing anchors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::{AirportCode, Zone};

/// Error returned when parsing an unknown place kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown place kind: {0:?}")]
pub struct InvalidPlaceKind(String);

/// The category a place belongs to. Ids are unique only within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Airport,
    Hotel,
    Restaurant,
    City,
}

impl PlaceKind {
    pub const ALL: [PlaceKind; 4] = [
        PlaceKind::Airport,
        PlaceKind::Hotel,
        PlaceKind::Restaurant,
        PlaceKind::City,
    ];

    /// Parse a kind name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidPlaceKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "airport" => Ok(PlaceKind::Airport),
            "hotel" => Ok(PlaceKind::Hotel),
            "restaurant" => Ok(PlaceKind::Restaurant),
            "city" => Ok(PlaceKind::City),
            _ => Err(InvalidPlaceKind(s.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlaceKind::Airport => "airport",
            PlaceKind::Hotel => "hotel",
            PlaceKind::Restaurant => "restaurant",
            PlaceKind::City => "city",
        }
    }
}

impl FromStr for PlaceKind {
    type Err = InvalidPlaceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PlaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a place is priced as: a zone band or a named airport.
///
/// A place carries exactly one anchor, so "both" and "neither" cannot be
/// represented for catalog entries. Airports order before zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Anchor {
    Airport(AirportCode),
    Zone(Zone),
}

impl Anchor {
    pub fn zone(&self) -> Option<Zone> {
        match self {
            Anchor::Zone(z) => Some(*z),
            Anchor::Airport(_) => None,
        }
    }

    pub fn airport(&self) -> Option<AirportCode> {
        match self {
            Anchor::Airport(code) => Some(*code),
            Anchor::Zone(_) => None,
        }
    }

    pub fn is_airport(&self) -> bool {
        matches!(self, Anchor::Airport(_))
    }
}

impl From<Zone> for Anchor {
    fn from(zone: Zone) -> Self {
        Anchor::Zone(zone)
    }
}

impl From<AirportCode> for Anchor {
    fn from(code: AirportCode) -> Self {
        Anchor::Airport(code)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anchor::Airport(code) => code.fmt(f),
            Anchor::Zone(zone) => zone.fmt(f),
        }
    }
}

impl Serialize for Anchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub kind: PlaceKind,
    pub id: String,
    pub name: String,
    /// `None` only for places synthesized when a lookup fails.
    pub anchor: Option<Anchor>,
    /// Other ids the booking flow may send for this place.
    pub aliases: Vec<String>,
}

impl Place {
    /// A place that could not be matched to the catalog.
    pub fn unresolved(kind: PlaceKind, identifier: &str) -> Self {
        Self {
            kind,
            id: identifier.to_string(),
            name: identifier.to_string(),
            anchor: None,
            aliases: Vec::new(),
        }
    }

    pub fn zone(&self) -> Option<Zone> {
        self.anchor.and_then(|a| a.zone())
    }

    pub fn airport_code(&self) -> Option<AirportCode> {
        self.anchor.and_then(|a| a.airport())
    }

    pub fn is_resolved(&self) -> bool {
        self.anchor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vra() -> AirportCode {
        AirportCode::parse("VRA").unwrap()
    }

    #[test]
    fn parse_kinds() {
        assert_eq!(PlaceKind::parse("airport"), Ok(PlaceKind::Airport));
        assert_eq!(PlaceKind::parse("Hotel"), Ok(PlaceKind::Hotel));
        assert_eq!(PlaceKind::parse(" RESTAURANT "), Ok(PlaceKind::Restaurant));
        assert_eq!(PlaceKind::parse("city"), Ok(PlaceKind::City));
    }

    #[test]
    fn reject_unknown_kind() {
        let err = PlaceKind::parse("beach").unwrap_err();
        assert_eq!(err.to_string(), "unknown place kind: \"beach\"");
        assert!(PlaceKind::parse("").is_err());
        assert!(PlaceKind::parse("hotels").is_err());
    }

    #[test]
    fn kind_roundtrips_through_display() {
        for kind in PlaceKind::ALL {
            assert_eq!(PlaceKind::parse(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn anchor_accessors() {
        let zone = Anchor::from(Zone::B);
        assert_eq!(zone.zone(), Some(Zone::B));
        assert_eq!(zone.airport(), None);
        assert!(!zone.is_airport());

        let airport = Anchor::from(vra());
        assert_eq!(airport.airport(), Some(vra()));
        assert_eq!(airport.zone(), None);
        assert!(airport.is_airport());
    }

    #[test]
    fn airports_sort_before_zones() {
        assert!(Anchor::Airport(vra()) < Anchor::Zone(Zone::A));
        assert!(Anchor::Zone(Zone::A) < Anchor::Zone(Zone::D));
    }

    #[test]
    fn anchor_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Anchor::Zone(Zone::A)).unwrap(), "\"A\"");
        assert_eq!(
            serde_json::to_string(&Anchor::Airport(vra())).unwrap(),
            "\"VRA\""
        );
    }

    #[test]
    fn unresolved_place_has_no_anchor() {
        let place = Place::unresolved(PlaceKind::Hotel, "nowhere_inn");
        assert!(!place.is_resolved());
        assert_eq!(place.zone(), None);
        assert_eq!(place.airport_code(), None);
        assert_eq!(place.id, "nowhere_inn");
        assert!(place.aliases.is_empty());
    }
}
