//! Fare rule table.
//!
//! A static price list keyed by rule type and an unordered pair of endpoint
//! codes. Rules are symmetric: a rule stored as `A,B` also answers `B,A`.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{AirportCode, Anchor, Zone};
use crate::error::CatalogError;

/// The fare list shipped with the crate.
const BUILTIN_RULES: &str = include_str!("../../data/fare_rules.csv");

/// Highest price a rule may carry (USD).
///
/// Keeps every quote, surcharges included, far inside `Decimal` range.
pub const MAX_PRICE_USD: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Check that `price` is a usable amount of money.
pub(crate) fn check_price(price: Decimal) -> Result<(), String> {
    if price.is_sign_negative() {
        Err(format!("price {price} is negative"))
    } else if price > MAX_PRICE_USD {
        Err(format!("price {price} is above {MAX_PRICE_USD}"))
    } else {
        Ok(())
    }
}

/// Category of a fare rule. Also names the resolver tier that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    AirportAirport,
    AirportZone,
    IntraZone,
    ZoneZone,
}

impl RuleType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "airport_airport" => Some(RuleType::AirportAirport),
            "airport_zone" => Some(RuleType::AirportZone),
            "intra_zone" => Some(RuleType::IntraZone),
            "zone_zone" => Some(RuleType::ZoneZone),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RuleType::AirportAirport => "airport_airport",
            RuleType::AirportZone => "airport_zone",
            RuleType::IntraZone => "intra_zone",
            RuleType::ZoneZone => "zone_zone",
        }
    }

    /// Check that a code pair has the shape this rule type prices.
    ///
    /// `airport_zone` pairs are accepted in either order.
    pub fn fits(self, a: Anchor, b: Anchor) -> bool {
        match (self, a, b) {
            (RuleType::AirportAirport, Anchor::Airport(x), Anchor::Airport(y)) => x != y,
            (RuleType::AirportZone, Anchor::Airport(_), Anchor::Zone(_))
            | (RuleType::AirportZone, Anchor::Zone(_), Anchor::Airport(_)) => true,
            (RuleType::IntraZone, Anchor::Zone(x), Anchor::Zone(y)) => x == y,
            (RuleType::ZoneZone, Anchor::Zone(x), Anchor::Zone(y)) => x != y,
            _ => false,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown rule type {s:?}"))
    }
}

/// A priced relation between two endpoint codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareRule {
    pub rule_type: RuleType,
    pub from: Anchor,
    pub to: Anchor,
    pub price_usd: Decimal,
}

/// Lookup key: rule type plus the code pair in sorted order.
type RuleKey = (RuleType, Anchor, Anchor);

fn key(rule_type: RuleType, a: Anchor, b: Anchor) -> RuleKey {
    if a <= b {
        (rule_type, a, b)
    } else {
        (rule_type, b, a)
    }
}

/// Immutable fare rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<RuleKey, FareRule>,
}

impl RuleTable {
    /// Build a table from parsed rules.
    ///
    /// Fails if the list is empty, a rule's codes do not fit its type, a
    /// price is negative or above [`MAX_PRICE_USD`], or two rules share a
    /// type and unordered pair.
    pub fn new(rules: Vec<FareRule>) -> Result<Self, CatalogError> {
        if rules.is_empty() {
            return Err(CatalogError::Empty("fare rules"));
        }

        let mut map = HashMap::with_capacity(rules.len());
        for rule in rules {
            if !rule.rule_type.fits(rule.from, rule.to) {
                return Err(CatalogError::InvalidRule(format!(
                    "{} rule cannot price {} -> {}",
                    rule.rule_type, rule.from, rule.to
                )));
            }
            if let Err(reason) = check_price(rule.price_usd) {
                return Err(CatalogError::InvalidRule(format!(
                    "{reason} for {} -> {}",
                    rule.from, rule.to
                )));
            }

            let k = key(rule.rule_type, rule.from, rule.to);
            if map.contains_key(&k) {
                return Err(CatalogError::DuplicateRule {
                    rule_type: rule.rule_type.to_string(),
                    from: rule.from.to_string(),
                    to: rule.to.to_string(),
                });
            }
            map.insert(k, rule);
        }

        Ok(Self { rules: map })
    }

    /// Load the fare list shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_reader(BUILTIN_RULES.as_bytes())
    }

    /// Load a rules CSV file with columns `rule_type,from_code,to_code,price_usd`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load rules from CSV data.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = rdr.headers()?.clone();

        let mut rules = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let row: RuleRecord = record.deserialize(Some(&headers))?;
            rules.push(row.into_rule(line)?);
        }

        let table = Self::new(rules)?;
        info!(rules = table.len(), "loaded fare rules");
        Ok(table)
    }

    /// Write the table as CSV in [`RuleTable::iter`] order.
    ///
    /// Airport-zone rules are written airport first and intra-zone rules
    /// spell out both codes, so the output loads back into an equal table.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), CatalogError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for rule in self.iter() {
            wtr.serialize(RuleRecord::from_rule(rule))?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Find the rule of `rule_type` for a code pair, in either order.
    pub fn find(&self, rule_type: RuleType, a: Anchor, b: Anchor) -> Option<&FareRule> {
        self.rules.get(&key(rule_type, a, b))
    }

    /// All rules, sorted by type and codes.
    pub fn iter(&self) -> impl Iterator<Item = &FareRule> {
        let mut keys: Vec<&RuleKey> = self.rules.keys().collect();
        keys.sort();
        keys.into_iter().filter_map(|k| self.rules.get(k))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// One row of the fare rules CSV.
#[derive(Debug, Serialize, Deserialize)]
struct RuleRecord {
    rule_type: String,
    from_code: String,
    to_code: Option<String>,
    price_usd: String,
}

impl RuleRecord {
    fn from_rule(rule: &FareRule) -> Self {
        let (from, to) = match (rule.from, rule.to) {
            (zone @ Anchor::Zone(_), airport @ Anchor::Airport(_)) => (airport, zone),
            pair => pair,
        };
        Self {
            rule_type: rule.rule_type.to_string(),
            from_code: from.to_string(),
            to_code: Some(to.to_string()),
            price_usd: rule.price_usd.to_string(),
        }
    }

    fn into_rule(self, line: u64) -> Result<FareRule, CatalogError> {
        let rule_type = RuleType::from_str(&self.rule_type)
            .map_err(|reason| CatalogError::invalid_row(line, reason))?;

        let (from_kind, to_kind) = match rule_type {
            RuleType::AirportAirport => (CodeKind::Airport, CodeKind::Airport),
            RuleType::AirportZone => (CodeKind::Airport, CodeKind::Zone),
            RuleType::IntraZone | RuleType::ZoneZone => (CodeKind::Zone, CodeKind::Zone),
        };

        let from = from_kind.parse(&self.from_code, line)?;
        let to = match self.to_code.filter(|c| !c.is_empty()) {
            Some(code) => to_kind.parse(&code, line)?,
            // intra_zone rows may leave the second code blank
            None if rule_type == RuleType::IntraZone => from,
            None => return Err(CatalogError::invalid_row(line, "to_code is empty")),
        };

        if !rule_type.fits(from, to) {
            return Err(CatalogError::invalid_row(
                line,
                format!("{rule_type} rule cannot price {from} -> {to}"),
            ));
        }

        let price_usd = Decimal::from_str(&self.price_usd).map_err(|e| {
            CatalogError::invalid_row(line, format!("price {:?}: {e}", self.price_usd))
        })?;
        check_price(price_usd).map_err(|reason| CatalogError::invalid_row(line, reason))?;

        Ok(FareRule {
            rule_type,
            from,
            to,
            price_usd,
        })
    }
}

#[derive(Clone, Copy)]
enum CodeKind {
    Airport,
    Zone,
}

impl CodeKind {
    fn parse(self, code: &str, line: u64) -> Result<Anchor, CatalogError> {
        let parsed = match self {
            CodeKind::Airport => AirportCode::parse(&code.to_uppercase())
                .map(Anchor::Airport)
                .map_err(|e| e.to_string()),
            CodeKind::Zone => Zone::parse(code).map(Anchor::Zone).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| CatalogError::invalid_row(line, reason))
    }
}
