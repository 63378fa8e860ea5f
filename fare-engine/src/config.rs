//! Engine configuration.

use std::path::PathBuf;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::domain::{ClockWindow, Zone};
use crate::error::CatalogError;
use crate::gazetteer::DEFAULT_RESTAURANT_ZONE;
use crate::rules::{MAX_PRICE_USD, check_price};

/// Environment variable naming the places CSV.
pub const PLACES_ENV: &str = "FARE_PLACES_CSV";

/// Environment variable naming the fare rules CSV.
pub const RULES_ENV: &str = "FARE_RULES_CSV";

/// Highest night surcharge fraction accepted (ten times the base fare).
pub const MAX_NIGHT_PCT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Business constants for pricing.
///
/// Values built with [`PricingConfig::new`] or deserialized are not checked
/// until [`PricingConfig::validate`]; the engine runs it before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Base fare when no rule matches (USD).
    pub fallback_usd: Decimal,

    /// Start of the night surcharge window, inclusive.
    #[serde(with = "hhmm")]
    pub night_start: NaiveTime,

    /// End of the night surcharge window, exclusive.
    #[serde(with = "hhmm")]
    pub night_end: NaiveTime,

    /// Night surcharge as a fraction of the base fare.
    pub night_pct: Decimal,

    /// Flat child-seat fee (USD).
    pub child_seat_usd: Decimal,

    /// Zone assumed for restaurants missing from the catalog.
    pub default_restaurant_zone: Zone,
}

impl PricingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        fallback_usd: Decimal,
        night_start: NaiveTime,
        night_end: NaiveTime,
        night_pct: Decimal,
        child_seat_usd: Decimal,
        default_restaurant_zone: Zone,
    ) -> Self {
        Self {
            fallback_usd,
            night_start,
            night_end,
            night_pct,
            child_seat_usd,
            default_restaurant_zone,
        }
    }

    /// Check that every amount is usable.
    ///
    /// Money amounts must lie in `0..=MAX_PRICE_USD` and the night fraction
    /// in `0..=MAX_NIGHT_PCT`, so no quote can go negative or overflow.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let amounts = [
            ("fallback_usd", self.fallback_usd),
            ("child_seat_usd", self.child_seat_usd),
        ];
        for (field, amount) in amounts {
            check_price(amount)
                .map_err(|reason| CatalogError::Config(format!("{field}: {reason}")))?;
        }

        if self.night_pct.is_sign_negative() || self.night_pct > MAX_NIGHT_PCT {
            return Err(CatalogError::Config(format!(
                "night_pct: {} is outside 0..={MAX_NIGHT_PCT}",
                self.night_pct
            )));
        }
        Ok(())
    }

    /// Returns the night surcharge window.
    pub fn night_window(&self) -> ClockWindow {
        ClockWindow::new(self.night_start, self.night_end)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            fallback_usd: dec!(15.00),
            night_start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            night_end: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            night_pct: dec!(0.2),
            child_seat_usd: dec!(5.00),
            default_restaurant_zone: DEFAULT_RESTAURANT_ZONE,
        }
    }
}

/// Where the place catalog and fare rules come from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// The CSV files compiled into the crate.
    #[default]
    Builtin,
    /// CSV files on disk.
    Files { places: PathBuf, rules: PathBuf },
}

/// Everything needed to build a `QuoteEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub catalog: CatalogSource,
    pub pricing: PricingConfig,
}

impl EngineConfig {
    /// Read the catalog source from `FARE_PLACES_CSV` and `FARE_RULES_CSV`.
    ///
    /// Both unset means the builtin catalog. Setting only one is an error so
    /// a typo cannot silently fall back to builtin prices.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_vars(std::env::var(PLACES_ENV).ok(), std::env::var(RULES_ENV).ok())
    }

    fn from_vars(places: Option<String>, rules: Option<String>) -> Result<Self, CatalogError> {
        let places = places.filter(|s| !s.trim().is_empty());
        let rules = rules.filter(|s| !s.trim().is_empty());

        let catalog = match (places, rules) {
            (None, None) => CatalogSource::Builtin,
            (Some(places), Some(rules)) => CatalogSource::Files {
                places: PathBuf::from(places),
                rules: PathBuf::from(rules),
            },
            (Some(_), None) => {
                return Err(CatalogError::Config(format!(
                    "{PLACES_ENV} is set but {RULES_ENV} is not"
                )));
            }
            (None, Some(_)) => {
                return Err(CatalogError::Config(format!(
                    "{RULES_ENV} is set but {PLACES_ENV} is not"
                )));
            }
        };

        Ok(Self {
            catalog,
            pricing: PricingConfig::default(),
        })
    }
}

/// Serde helpers for "HH:MM" clock times.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::domain::parse_hhmm;

    pub fn serialize<S: Serializer>(t: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{:02}:{:02}", t.hour(), t.minute()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hhmm(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn default_config() {
        let config = PricingConfig::default();

        assert_eq!(config.fallback_usd, dec!(15.00));
        assert_eq!(config.night_start, hm(22, 0));
        assert_eq!(config.night_end, hm(6, 0));
        assert_eq!(config.night_pct, dec!(0.2));
        assert_eq!(config.child_seat_usd, dec!(5.00));
        assert_eq!(config.default_restaurant_zone, Zone::B);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(PricingConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let base = PricingConfig::default();

        let config = PricingConfig {
            fallback_usd: dec!(-15),
            ..base.clone()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
        assert_eq!(
            err.to_string(),
            "catalog configuration: fallback_usd: price -15 is negative"
        );

        let config = PricingConfig {
            child_seat_usd: dec!(-0.01),
            ..base.clone()
        };
        assert!(config.validate().is_err());

        let config = PricingConfig {
            night_pct: dec!(-0.2),
            ..base
        };
        assert!(config.validate().unwrap_err().to_string().contains("night_pct"));
    }

    #[test]
    fn validate_rejects_huge_amounts() {
        let base = PricingConfig::default();

        let config = PricingConfig {
            fallback_usd: Decimal::MAX,
            ..base.clone()
        };
        assert!(config.validate().is_err());
        let config = PricingConfig {
            child_seat_usd: MAX_PRICE_USD + dec!(0.01),
            ..base.clone()
        };
        assert!(config.validate().is_err());
        let config = PricingConfig {
            night_pct: dec!(10.5),
            ..base.clone()
        };
        assert!(config.validate().is_err());

        let config = PricingConfig {
            fallback_usd: MAX_PRICE_USD,
            child_seat_usd: Decimal::ZERO,
            night_pct: MAX_NIGHT_PCT,
            ..base
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserialized_negative_fallback_fails_validation() {
        let config: PricingConfig = serde_json::from_str(r#"{"fallback_usd": -15}"#).unwrap();
        assert_eq!(config.fallback_usd, dec!(-15));
        assert!(matches!(config.validate(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn night_window_wraps_midnight() {
        let window = PricingConfig::default().night_window();
        assert!(window.contains(hm(23, 0)));
        assert!(window.contains(hm(3, 0)));
        assert!(!window.contains(hm(12, 0)));
    }

    #[test]
    fn custom_config() {
        let config =
            PricingConfig::new(dec!(20), hm(23, 0), hm(5, 0), dec!(0.25), dec!(7.50), Zone::C);

        assert_eq!(config.fallback_usd, dec!(20));
        assert_eq!(config.night_start, hm(23, 0));
        assert_eq!(config.night_end, hm(5, 0));
        assert_eq!(config.night_pct, dec!(0.25));
        assert_eq!(config.child_seat_usd, dec!(7.50));
        assert_eq!(config.default_restaurant_zone, Zone::C);
    }

    #[test]
    fn deserialize_partial_json() {
        let config: PricingConfig =
            serde_json::from_str(r#"{"night_start": "21:30", "child_seat_usd": 6}"#).unwrap();

        assert_eq!(config.night_start, hm(21, 30));
        assert_eq!(config.night_end, hm(6, 0));
        assert_eq!(config.child_seat_usd, dec!(6));
        assert_eq!(config.fallback_usd, dec!(15.00));
    }

    #[test]
    fn deserialize_rejects_bad_time() {
        let result: Result<PricingConfig, _> = serde_json::from_str(r#"{"night_end": "6am"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serialize_times_as_hhmm() {
        let json = serde_json::to_value(PricingConfig::default()).unwrap();
        assert_eq!(json["night_start"], "22:00");
        assert_eq!(json["night_end"], "06:00");
    }

    #[test]
    fn engine_config_files_from_json() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"catalog": {"files": {"places": "/srv/places.csv", "rules": "/srv/rules.csv"}}}"#,
        )
        .unwrap();

        assert_eq!(
            config.catalog,
            CatalogSource::Files {
                places: PathBuf::from("/srv/places.csv"),
                rules: PathBuf::from("/srv/rules.csv"),
            }
        );
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn vars_unset_means_builtin() {
        let config = EngineConfig::from_vars(None, None).unwrap();
        assert_eq!(config.catalog, CatalogSource::Builtin);

        let config = EngineConfig::from_vars(Some(" ".into()), None).unwrap();
        assert_eq!(config.catalog, CatalogSource::Builtin);
    }

    #[test]
    fn vars_both_set_means_files() {
        let config =
            EngineConfig::from_vars(Some("p.csv".into()), Some("r.csv".into())).unwrap();
        assert_eq!(
            config.catalog,
            CatalogSource::Files {
                places: PathBuf::from("p.csv"),
                rules: PathBuf::from("r.csv"),
            }
        );
    }

    #[test]
    fn vars_half_set_is_error() {
        let err = EngineConfig::from_vars(Some("p.csv".into()), None).unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
        assert!(err.to_string().contains(RULES_ENV));

        let err = EngineConfig::from_vars(None, Some("r.csv".into())).unwrap_err();
        assert!(err.to_string().contains(PLACES_ENV));
    }
}
