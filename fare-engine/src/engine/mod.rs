//! The quoting entry point.
//!
//! A `QuoteEngine` owns the loaded catalogs and pricing settings. It is built
//! once at startup; loading fails fast on bad data. After that, quoting never
//! fails: misses degrade to the fallback price, and non-taxi services get a
//! not-applicable quote.
//!
//! The engine holds no mutable state, so one instance behind an `Arc` can
//! serve any number of threads.

mod quote;
mod request;


pub use quote::{Quote, RuleLabel};
pub use request::{EndpointRef, QuoteRequest};

use tracing::{debug, info, warn};

use crate::config::{CatalogSource, EngineConfig, PricingConfig};
use crate::domain::{PickupTime, Service};
use crate::error::CatalogError;
use crate::gazetteer::Gazetteer;
use crate::resolver::{self, FareResolver, RuleLookup};
use crate::rules::RuleTable;
use crate::surcharge::SurchargePolicy;

/// Prices taxi trips against immutable catalogs.
#[derive(Debug, Clone)]
pub struct QuoteEngine {
    gazetteer: Gazetteer,
    rules: RuleTable,
    pricing: PricingConfig,
    surcharges: SurchargePolicy,
}

impl QuoteEngine {
    /// Load catalogs as described by `config`.
    pub fn load(config: &EngineConfig) -> Result<Self, CatalogError> {
        let (gazetteer, rules) = match &config.catalog {
            CatalogSource::Builtin => (Gazetteer::builtin()?, RuleTable::builtin()?),
            CatalogSource::Files { places, rules } => {
                (Gazetteer::from_path(places)?, RuleTable::from_path(rules)?)
            }
        };

        let engine = Self::from_parts(gazetteer, rules, config.pricing.clone())?;
        info!(
            places = engine.gazetteer.len(),
            rules = engine.rules.len(),
            "quote engine ready"
        );
        Ok(engine)
    }

    /// Engine over the catalogs compiled into the crate, default pricing.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::load(&EngineConfig::default())
    }

    /// Assemble an engine from catalogs the caller already built.
    ///
    /// Fails if `pricing` does not pass [`PricingConfig::validate`].
    pub fn from_parts(
        gazetteer: Gazetteer,
        rules: RuleTable,
        pricing: PricingConfig,
    ) -> Result<Self, CatalogError> {
        pricing.validate()?;
        Ok(Self {
            gazetteer: gazetteer.with_restaurant_default(pricing.default_restaurant_zone),
            rules,
            surcharges: SurchargePolicy::new(&pricing),
            pricing,
        })
    }

    /// Price a trip.
    pub fn quote(&self, request: &QuoteRequest) -> Quote {
        let service = Service::parse(&request.service);
        if service.is_none_or(|s| !s.is_priced()) {
            debug!(service = %request.service, "service not priced");
            return Quote::not_applicable();
        }

        let resolution = self.resolver().resolve(
            &request.from.kind,
            request.from.id.as_deref(),
            &request.to.kind,
            request.to.id.as_deref(),
        );

        let (base_usd, rule_label) = match resolution.rule {
            Some(rule) => (rule.price_usd, RuleLabel::from(rule.rule_type)),
            None => {
                warn!(
                    from_kind = %request.from.kind,
                    from_id = ?request.from.id,
                    from_anchor = ?resolution.from,
                    to_kind = %request.to.kind,
                    to_id = ?request.to.id,
                    to_anchor = ?resolution.to,
                    fallback_usd = %self.pricing.fallback_usd,
                    "no fare rule, quoting fallback price"
                );
                (self.pricing.fallback_usd, RuleLabel::Fallback)
            }
        };

        let when = request.when.as_deref().and_then(parse_pickup);
        let (total_usd, modifiers) = self.surcharges.apply(base_usd, when, &request.options);

        Quote {
            base_usd,
            total_usd,
            modifiers,
            rule_label,
            from: resolution.from,
            to: resolution.to,
        }
    }

    pub fn resolver(&self) -> FareResolver<'_> {
        FareResolver::new(&self.gazetteer, &self.rules)
    }

    /// Trips the catalog can produce that would quote at the fallback price.
    pub fn coverage_gaps(&self) -> Vec<RuleLookup> {
        resolver::coverage_gaps(&self.gazetteer, &self.rules)
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }
}

/// An unparseable pickup time is treated as unknown, so no night surcharge.
fn parse_pickup(when: &str) -> Option<PickupTime> {
    match PickupTime::parse(when) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!(when, error = %e, "ignoring unparseable pickup time");
            None
        }
    }
}
