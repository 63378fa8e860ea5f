//! Quote results.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Anchor;
use crate::rules::RuleType;
use crate::surcharge::Modifier;

/// How a quote's base fare was obtained.
///
/// Meant for operators and logs; customers never see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleLabel {
    #[serde(rename = "airport_airport")]
    AirportAirport,
    #[serde(rename = "airport_zone")]
    AirportZone,
    #[serde(rename = "intra_zone")]
    IntraZone,
    #[serde(rename = "zone_zone")]
    ZoneZone,
    /// No tier had a rule; the configured fallback price was used.
    #[serde(rename = "fallback")]
    Fallback,
    /// The service is not priced by this engine.
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl RuleLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleLabel::AirportAirport => "airport_airport",
            RuleLabel::AirportZone => "airport_zone",
            RuleLabel::IntraZone => "intra_zone",
            RuleLabel::ZoneZone => "zone_zone",
            RuleLabel::Fallback => "fallback",
            RuleLabel::NotApplicable => "n/a",
        }
    }

    /// True when a catalog rule priced the trip.
    pub fn is_rule_match(self) -> bool {
        !matches!(self, RuleLabel::Fallback | RuleLabel::NotApplicable)
    }
}

impl From<RuleType> for RuleLabel {
    fn from(rule_type: RuleType) -> Self {
        match rule_type {
            RuleType::AirportAirport => RuleLabel::AirportAirport,
            RuleType::AirportZone => RuleLabel::AirportZone,
            RuleType::IntraZone => RuleLabel::IntraZone,
            RuleType::ZoneZone => RuleLabel::ZoneZone,
        }
    }
}

impl fmt::Display for RuleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A priced trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    #[serde(with = "rust_decimal::serde::float")]
    pub base_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_usd: Decimal,
    pub modifiers: Vec<Modifier>,
    pub rule_label: RuleLabel,
    /// Resolved pickup anchor, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Anchor>,
    /// Resolved drop-off anchor, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Anchor>,
}

impl Quote {
    /// The quote returned for services the engine does not price.
    pub fn not_applicable() -> Self {
        Self {
            base_usd: Decimal::ZERO,
            total_usd: Decimal::ZERO,
            modifiers: Vec::new(),
            rule_label: RuleLabel::NotApplicable,
            from: None,
            to: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule_label == RuleLabel::Fallback
    }
}
