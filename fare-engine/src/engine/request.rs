//! Quote request types.
//!
//! These mirror what the booking flow keeps in its order draft, so the
//! draft can be deserialized straight into a `QuoteRequest`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::surcharge::Options;

/// One end of a trip, as selected by the customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointRef {
    /// Place kind, e.g. `"hotel"` or `"airport"`.
    pub kind: String,
    /// Place id or display name. May be missing when the customer skipped it.
    #[serde(default)]
    pub id: Option<String>,
}

impl EndpointRef {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
        }
    }

    /// An endpoint whose kind is known but no place was picked.
    pub fn kind_only(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
        }
    }
}

/// Input to [`QuoteEngine::quote`](super::QuoteEngine::quote).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service: String,
    pub from: EndpointRef,
    pub to: EndpointRef,
    /// `"HH:MM"`, `"now"`, or absent.
    #[serde(default)]
    pub when: Option<String>,
    #[serde(default)]
    pub options: Options,
}

impl QuoteRequest {
    pub fn new(service: impl Into<String>, from: EndpointRef, to: EndpointRef) -> Self {
        Self {
            service: service.into(),
            from,
            to,
            when: None,
            options: Options::new(),
        }
    }

    /// A taxi request with no pickup time and no options.
    pub fn taxi(from: EndpointRef, to: EndpointRef) -> Self {
        Self::new("taxi", from, to)
    }

    /// Set the pickup time.
    pub fn at(mut self, when: impl Into<String>) -> Self {
        self.when = Some(when.into());
        self
    }

    /// Set a booking option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}
