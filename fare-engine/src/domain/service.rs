//! Bookable service names.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A service offered by the booking assistant.
///
/// Only [`Service::Taxi`] is priced by the engine; the others are booked
/// on request and quote as not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Taxi,
    Retro,
    Guide,
    Photo,
}

impl Service {
    /// Parse a service name. Matching is exact; unknown names give `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "taxi" => Some(Service::Taxi),
            "retro" => Some(Service::Retro),
            "guide" => Some(Service::Guide),
            "photo" => Some(Service::Photo),
            _ => None,
        }
    }

    /// Whether fares for this service come from the rule table.
    pub fn is_priced(self) -> bool {
        matches!(self, Service::Taxi)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Service::Taxi => "taxi",
            Service::Retro => "retro",
            Service::Guide => "guide",
            Service::Photo => "photo",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
