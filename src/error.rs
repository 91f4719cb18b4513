//! Error types for the search engines

use thiserror::Error;

use crate::orchestrator::GameFamily;

/// Errors surfaced to callers before or around a search.
///
/// Running out of legal actions is not an error: engines return `None`.
/// Running out of time is not an error either: time-bounded engines
/// return the best complete answer found so far.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SearchError {
    #[error("unknown {family} algorithm '{name}'")]
    UnknownAlgorithm { family: GameFamily, name: String },

    #[error("unknown game family '{0}'")]
    UnknownFamily(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("contract violation: {algorithm} plays {expected} games but was given a {actual} state")]
    ContractViolation {
        algorithm: &'static str,
        expected: GameFamily,
        actual: GameFamily,
    },

    #[error("failed to read config file '{path}': {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SearchError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SearchError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
