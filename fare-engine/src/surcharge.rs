//! Surcharges applied on top of a base fare.
//!
//! Modifiers are additive and independent of each other. Each modifier
//! reports its own amount rounded to cents, but the total is computed from
//! the unrounded amounts and rounded once at the end. Arithmetic saturates
//! at the `Decimal` bounds rather than panicking.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::PricingConfig;
use crate::domain::{ClockWindow, PickupTime};

/// Free-form booking options, as stored by the conversation flow.
pub type Options = serde_json::Map<String, Value>;

/// Option key requesting a child seat.
pub const CHILD_SEAT_OPTION: &str = "child_seat";

/// Round a USD amount to cents, halves away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Which surcharge a modifier represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    /// Percentage of base for night pickups; `value` is the fraction.
    NightPct,
    /// Flat child-seat fee; `value` is the fee in USD.
    ChildSeatUsd,
}

/// One line of the surcharge breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    #[serde(rename = "type")]
    pub kind: ModifierKind,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_usd: Decimal,
}

/// Night and child-seat surcharge rules.
#[derive(Debug, Clone)]
pub struct SurchargePolicy {
    night: ClockWindow,
    night_pct: Decimal,
    child_seat_usd: Decimal,
}

impl SurchargePolicy {
    pub fn new(config: &PricingConfig) -> Self {
        Self {
            night: config.night_window(),
            night_pct: config.night_pct,
            child_seat_usd: config.child_seat_usd,
        }
    }

    /// Apply surcharges to `base_usd`, returning the total and the breakdown.
    ///
    /// A pickup of `now` or with no known time is never a night pickup.
    pub fn apply(
        &self,
        base_usd: Decimal,
        when: Option<PickupTime>,
        options: &Options,
    ) -> (Decimal, Vec<Modifier>) {
        let mut modifiers = Vec::new();
        let mut raw_sum = Decimal::ZERO;

        if when
            .and_then(|w| w.clock())
            .is_some_and(|t| self.night.contains(t))
        {
            let raw = base_usd.saturating_mul(self.night_pct);
            raw_sum = raw_sum.saturating_add(raw);
            modifiers.push(Modifier {
                kind: ModifierKind::NightPct,
                value: self.night_pct,
                amount_usd: round_cents(raw),
            });
        }

        if options.get(CHILD_SEAT_OPTION).is_some_and(is_truthy) {
            raw_sum = raw_sum.saturating_add(self.child_seat_usd);
            modifiers.push(Modifier {
                kind: ModifierKind::ChildSeatUsd,
                value: self.child_seat_usd,
                amount_usd: round_cents(self.child_seat_usd),
            });
        }

        (round_cents(base_usd.saturating_add(raw_sum)), modifiers)
    }
}

impl Default for SurchargePolicy {
    fn default() -> Self {
        Self::new(&PricingConfig::default())
    }
}

/// Whether an option value means "requested".
///
/// Accepts `true`, any non-zero number, and the strings `true`, `yes`
/// and `1` in any case. Everything else, including `null`, is "no".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("yes") || s == "1"
        }
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..50_000).prop_map(|c| Decimal::new(c, 2))
    }

    fn pickup() -> impl Strategy<Value = Option<PickupTime>> {
        prop_oneof![
            Just(None),
            Just(Some(PickupTime::Now)),
            (0u32..24, 0u32..60).prop_map(|(h, m)| {
                chrono::NaiveTime::from_hms_opt(h, m, 0).map(PickupTime::At)
            }),
        ]
    }

    proptest! {
        /// Adding a child seat adds exactly the fee to the rounded total
        #[test]
        fn child_seat_is_additive(base in cents(), when in pickup()) {
            let policy = SurchargePolicy::default();
            let mut with = Options::new();
            with.insert(CHILD_SEAT_OPTION.into(), json!(true));

            let (without_total, _) = policy.apply(base, when, &Options::new());
            let (with_total, _) = policy.apply(base, when, &with);
            prop_assert_eq!(with_total, round_cents(without_total + Decimal::new(500, 2)));
        }

        /// Surcharges never reduce the fare
        #[test]
        fn total_at_least_base(base in cents(), when in pickup()) {
            let (total, mods) = SurchargePolicy::default().apply(base, when, &Options::new());
            prop_assert!(total >= base);
            if mods.is_empty() {
                prop_assert_eq!(total, base);
            }
        }

        #[test]
        fn deterministic(base in cents(), when in pickup()) {
            let policy = SurchargePolicy::default();
            prop_assert_eq!(
                policy.apply(base, when, &Options::new()),
                policy.apply(base, when, &Options::new())
            );
        }
    }
}
