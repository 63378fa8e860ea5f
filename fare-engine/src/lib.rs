//! Taxi fare quoting engine.
//!
//! Answers "how much is a taxi from here to there?" for a Varadero booking
//! assistant. Places resolve to a zone or an airport, and a strict tier
//! search over a static rule table picks the base fare. Night and
//! child-seat surcharges are added on top.
//!
//! ```
//! use fare_engine::{EndpointRef, QuoteEngine, QuoteRequest, RuleLabel};
//!
//! let engine = QuoteEngine::builtin()?;
//! let quote = engine.quote(
//!     &QuoteRequest::taxi(
//!         EndpointRef::new("airport", "varadero_airport"),
//!         EndpointRef::new("hotel", "paradisus_varadero"),
//!     )
//!     .at("23:00"),
//! );
//!
//! assert_eq!(quote.rule_label, RuleLabel::AirportZone);
//! assert_eq!(quote.total_usd.to_string(), "48.00");
//! # Ok::<(), fare_engine::CatalogError>(())
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gazetteer;
pub mod resolver;
pub mod rules;
pub mod surcharge;

pub use config::{CatalogSource, EngineConfig, PricingConfig};
pub use engine::{EndpointRef, Quote, QuoteEngine, QuoteRequest, RuleLabel};
pub use error::CatalogError;
