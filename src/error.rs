//! Error types for the form engine.

use thiserror::Error;

/// Errors surfaced by the engine and its source adapters.
///
/// Option-lookup failures never reach callers of the engine: the resolver
/// converts them to empty cache entries so the rest of the form keeps
/// rendering. Validation failures are not errors either; they are data,
/// returned as a message list from submit.
#[derive(Debug, Error)]
pub enum FormError {
    /// The schema source does not recognize the form identifier.
    #[error("Form schema not found: {0}")]
    SchemaNotFound(String),

    /// The schema source failed before producing a schema.
    #[error("Schema fetch failed: {0}")]
    SchemaFetch(String),

    /// An options lookup failed (network error or non-success response).
    #[error("Option lookup failed for {endpoint}: {reason}")]
    OptionFetch { endpoint: String, reason: String },

    /// The submission sink rejected an otherwise valid value map.
    #[error("Submission rejected: {}", .messages.join("; "))]
    Submission { messages: Vec<String> },

    /// An operation was invoked in a state that cannot serve it.
    #[error("Engine not ready: {0}")]
    NotReady(String),
}

impl From<reqwest::Error> for FormError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        FormError::OptionFetch {
            endpoint,
            reason: err.to_string(),
        }
    }
}

/// Result alias for engine operations.
pub type FormResult<T> = Result<T, FormError>;
