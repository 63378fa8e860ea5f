//! Tiered fare resolution.
//!
//! Two resolved endpoints are matched against an ordered list of tiers.
//! Each tier decides whether it applies to the pair of anchors and, if so,
//! which rule it would look up. The first tier whose rule exists wins;
//! later tiers are never consulted, even if they would be cheaper.

use std::fmt;

use tracing::debug;

use crate::domain::{Anchor, PlaceKind};
use crate::gazetteer::Gazetteer;
use crate::rules::{FareRule, RuleTable, RuleType};

/// A rule lookup a tier wants to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleLookup {
    pub rule_type: RuleType,
    pub a: Anchor,
    pub b: Anchor,
}

impl RuleLookup {
    fn new(rule_type: RuleType, a: Anchor, b: Anchor) -> Self {
        Self { rule_type, a, b }
    }

    /// Whether a rule for this lookup could exist in a valid table.
    pub fn is_priceable(&self) -> bool {
        self.rule_type.fits(self.a, self.b)
    }

    pub fn find<'r>(&self, rules: &'r RuleTable) -> Option<&'r FareRule> {
        rules.find(self.rule_type, self.a, self.b)
    }
}

impl fmt::Display for RuleLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}<->{}", self.rule_type, self.a, self.b)
    }
}

type Tier = fn(Anchor, Anchor) -> Option<RuleLookup>;

/// Tiers in precedence order.
const TIERS: [Tier; 4] = [airport_airport, airport_zone, intra_zone, zone_zone];

fn airport_airport(from: Anchor, to: Anchor) -> Option<RuleLookup> {
    (from.is_airport() && to.is_airport())
        .then(|| RuleLookup::new(RuleType::AirportAirport, from, to))
}

fn airport_zone(from: Anchor, to: Anchor) -> Option<RuleLookup> {
    match (from, to) {
        (Anchor::Airport(_), Anchor::Zone(_)) => {
            Some(RuleLookup::new(RuleType::AirportZone, from, to))
        }
        // rules are stored airport first
        (Anchor::Zone(_), Anchor::Airport(_)) => {
            Some(RuleLookup::new(RuleType::AirportZone, to, from))
        }
        _ => None,
    }
}

fn intra_zone(from: Anchor, to: Anchor) -> Option<RuleLookup> {
    match (from, to) {
        (Anchor::Zone(x), Anchor::Zone(y)) if x == y => {
            Some(RuleLookup::new(RuleType::IntraZone, from, to))
        }
        _ => None,
    }
}

fn zone_zone(from: Anchor, to: Anchor) -> Option<RuleLookup> {
    match (from, to) {
        (Anchor::Zone(x), Anchor::Zone(y)) if x != y => {
            Some(RuleLookup::new(RuleType::ZoneZone, from, to))
        }
        _ => None,
    }
}

/// Lookups that apply to a pair of anchors, highest precedence first.
pub fn tier_lookups(from: Anchor, to: Anchor) -> impl Iterator<Item = RuleLookup> {
    TIERS.into_iter().filter_map(move |tier| tier(from, to))
}

/// Pick the rule for a pair of anchors, or `None` if no tier has one.
pub fn select_rule(rules: &RuleTable, from: Anchor, to: Anchor) -> Option<&FareRule> {
    tier_lookups(from, to).find_map(|lookup| {
        let rule = lookup.find(rules);
        if rule.is_some() {
            debug!(tier = %lookup.rule_type, a = %lookup.a, b = %lookup.b, "tier matched");
        }
        rule
    })
}

/// Outcome of resolving both endpoints of a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub from: Option<Anchor>,
    pub to: Option<Anchor>,
    /// `None` means the quote must use the fallback price.
    pub rule: Option<&'a FareRule>,
}

/// Resolves endpoints and picks rules against borrowed catalogs.
#[derive(Debug, Clone, Copy)]
pub struct FareResolver<'a> {
    gazetteer: &'a Gazetteer,
    rules: &'a RuleTable,
}

impl<'a> FareResolver<'a> {
    pub fn new(gazetteer: &'a Gazetteer, rules: &'a RuleTable) -> Self {
        Self { gazetteer, rules }
    }

    /// Resolve one endpoint given as the booking flow stores it.
    ///
    /// An unknown kind yields `None`. A missing id is treated like an
    /// unknown one, so a restaurant still lands in the default zone.
    pub fn resolve_endpoint(&self, kind: &str, id: Option<&str>) -> Option<Anchor> {
        let kind = match PlaceKind::parse(kind) {
            Ok(kind) => kind,
            Err(e) => {
                debug!(error = %e, "endpoint kind not recognized");
                return None;
            }
        };
        self.gazetteer.resolve(kind, id.unwrap_or_default()).anchor
    }

    /// Resolve both endpoints and select the rule that prices the trip.
    pub fn resolve(
        &self,
        from_kind: &str,
        from_id: Option<&str>,
        to_kind: &str,
        to_id: Option<&str>,
    ) -> Resolution<'a> {
        let from = self.resolve_endpoint(from_kind, from_id);
        let to = self.resolve_endpoint(to_kind, to_id);
        let rule = match (from, to) {
            (Some(a), Some(b)) => select_rule(self.rules, a, b),
            _ => None,
        };
        Resolution { from, to, rule }
    }
}

/// Lookups the gazetteer can produce for which the table has no rule.
///
/// Every unordered pair of reachable anchors is checked with the lookup
/// the resolver would try first. Each gap is a trip that quotes at the
/// fallback price.
pub fn coverage_gaps(gazetteer: &Gazetteer, rules: &RuleTable) -> Vec<RuleLookup> {
    let anchors: Vec<Anchor> = gazetteer.anchors().into_iter().collect();

    let mut gaps = Vec::new();
    for (i, &a) in anchors.iter().enumerate() {
        for &b in &anchors[i..] {
            let Some(lookup) = tier_lookups(a, b).find(RuleLookup::is_priceable) else {
                continue;
            };
            if lookup.find(rules).is_none() {
                gaps.push(lookup);
            }
        }
    }
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AirportCode, Zone};
    use rust_decimal_macros::dec;

    fn airport(s: &str) -> Anchor {
        Anchor::Airport(AirportCode::parse(s).unwrap())
    }

    fn zone(z: Zone) -> Anchor {
        Anchor::Zone(z)
    }

    fn rules(csv: &str) -> RuleTable {
        RuleTable::from_reader(format!("rule_type,from_code,to_code,price_usd\n{csv}").as_bytes())
            .unwrap()
    }

    fn places(csv: &str) -> Gazetteer {
        Gazetteer::from_reader(format!("kind,id,name,zone,airport_code\n{csv}").as_bytes())
            .unwrap()
    }

    #[test]
    fn tiers_are_disjoint() {
        let all = [airport("VRA"), airport("HAV"), zone(Zone::A), zone(Zone::D)];
        for a in all {
            for b in all {
                let priceable = tier_lookups(a, b).filter(RuleLookup::is_priceable).count();
                let expected = usize::from(!(a.is_airport() && a == b));
                assert_eq!(priceable, expected, "{a} -> {b}");
            }
        }
    }

    #[test]
    fn airport_zone_lookup_is_airport_first() {
        let fwd: Vec<_> = tier_lookups(airport("VRA"), zone(Zone::D)).collect();
        let rev: Vec<_> = tier_lookups(zone(Zone::D), airport("VRA")).collect();
        assert_eq!(fwd, rev);
        assert_eq!(fwd[0].a, airport("VRA"));
    }

    #[test]
    fn same_zone_never_uses_zone_zone() {
        let t = rules("zone_zone,A,B,15\nintra_zone,A,A,10\n");
        let rule = select_rule(&t, zone(Zone::A), zone(Zone::A)).unwrap();
        assert_eq!(rule.rule_type, RuleType::IntraZone);
    }

    #[test]
    fn missing_intra_zone_rule_is_a_miss() {
        let t = rules("zone_zone,A,B,15\n");
        assert!(select_rule(&t, zone(Zone::A), zone(Zone::A)).is_none());
    }

    #[test]
    fn airport_pair_beats_everything() {
        let t = rules("airport_airport,VRA,HAV,140\nairport_zone,VRA,A,30\n");
        let rule = select_rule(&t, airport("HAV"), airport("VRA")).unwrap();
        assert_eq!(rule.price_usd, dec!(140));
    }

    #[test]
    fn same_airport_has_no_rule() {
        let t = RuleTable::builtin().unwrap();
        assert!(select_rule(&t, airport("VRA"), airport("VRA")).is_none());
    }

    #[test]
    fn resolve_endpoints_through_gazetteer() {
        let g = places("hotel,villa_cuba,Villa Cuba,A,\nairport,varadero_airport,Varadero,,VRA\n");
        let t = rules("airport_zone,VRA,A,30\n");
        let resolver = FareResolver::new(&g, &t);

        let r = resolver.resolve("hotel", Some("Villa Cuba"), "airport", Some("varadero_airport"));
        assert_eq!(r.from, Some(zone(Zone::A)));
        assert_eq!(r.to, Some(airport("VRA")));
        assert_eq!(r.rule.map(|r| r.price_usd), Some(dec!(30)));
    }

    #[test]
    fn unknown_kind_and_id_resolve_to_nothing() {
        let g = places("hotel,villa_cuba,Villa Cuba,A,\n");
        let t = rules("intra_zone,A,A,10\n");
        let resolver = FareResolver::new(&g, &t);

        assert_eq!(resolver.resolve_endpoint("boat", Some("villa_cuba")), None);
        assert_eq!(resolver.resolve_endpoint("hotel", Some("nowhere")), None);
        assert_eq!(resolver.resolve_endpoint("hotel", None), None);

        let r = resolver.resolve("hotel", Some("nowhere"), "hotel", Some("villa_cuba"));
        assert_eq!(r.rule, None);
    }

    #[test]
    fn missing_restaurant_id_uses_default_zone() {
        let g = places("hotel,villa_cuba,Villa Cuba,A,\n");
        let t = rules("intra_zone,A,A,10\n");
        let resolver = FareResolver::new(&g, &t);
        assert_eq!(resolver.resolve_endpoint("restaurant", None), Some(zone(Zone::B)));
    }

    #[test]
    fn coverage_gaps_lists_missing_pairs() {
        let g = places("hotel,h1,H1,A,\nhotel,h2,H2,C,\nairport,vra,Varadero,,VRA\n");
        // anchors: VRA, A, B (restaurant default), C
        let t = rules(
            "intra_zone,A,A,10\nintra_zone,B,B,10\nintra_zone,C,C,10\n\
             zone_zone,A,B,15\nzone_zone,B,C,15\nairport_zone,VRA,A,30\nairport_zone,VRA,B,30\n",
        );

        let gaps: Vec<String> = coverage_gaps(&g, &t).iter().map(|l| l.to_string()).collect();
        assert_eq!(gaps, ["airport_zone VRA<->C", "zone_zone A<->C"]);
    }

    #[test]
    fn builtin_catalog_has_no_gaps() {
        let g = Gazetteer::builtin().unwrap();
        let t = RuleTable::builtin().unwrap();
        assert!(coverage_gaps(&g, &t).is_empty());
    }
}
