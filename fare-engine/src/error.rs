//! Catalog loading errors.
//!
//! These are startup failures. Once a gazetteer and rule table have loaded,
//! quoting never fails.

use std::path::PathBuf;

/// Errors that can occur while loading the place catalog or the fare rules.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file missing or unreadable
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV framing or deserialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row parsed but its contents are invalid
    #[error("line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    /// A place violates the one-anchor-per-place rule
    #[error("place {kind}/{id}: {reason}")]
    InvalidPlace {
        kind: String,
        id: String,
        reason: &'static str,
    },

    /// The same id appears twice for one place kind
    #[error("duplicate place {kind}/{id}")]
    DuplicatePlace { kind: String, id: String },

    /// A rule's codes or price do not suit its type
    #[error("invalid fare rule: {0}")]
    InvalidRule(String),

    /// Two rules of the same type share an unordered code pair
    #[error("duplicate {rule_type} rule for {from}<->{to}")]
    DuplicateRule {
        rule_type: String,
        from: String,
        to: String,
    },

    /// The catalog parsed but contains nothing
    #[error("{0} catalog is empty")]
    Empty(&'static str),

    /// Catalog source or pricing settings are incomplete or out of range
    #[error("catalog configuration: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn invalid_row(line: u64, reason: impl Into<String>) -> Self {
        Self::InvalidRow {
            line,
            reason: reason.into(),
        }
    }
}
