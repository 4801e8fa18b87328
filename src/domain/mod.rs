//! Core domain: schema model, values, visibility, validation, and the ports
//! the engine consumes.
//!
//! The engine talks to the outside world through three ports: a schema
//! source, an options source, and a submission sink. Transport and encoding
//! are adapter concerns; the domain only fixes the contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod schema;
pub mod validation;
pub mod value;
pub mod visibility;

pub use schema::{DynamicOptions, FieldKind, FieldSpec, FormSchema, ValidationRule, VisibilityRule};
pub use validation::{validate, ValidationMessage};
pub use value::{FieldValue, ValueMap};
pub use visibility::is_visible;

use crate::error::FormResult;

/// Acknowledgement returned by a submission sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub submission_id: Uuid,
    pub form_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// Resolves a form identifier to its schema.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch the schema for `form_id`, or `FormError::SchemaNotFound` when
    /// the identifier is unrecognized.
    async fn fetch_schema(&self, form_id: &str) -> FormResult<FormSchema>;
}

/// Looks up dependent option lists.
#[async_trait]
pub trait OptionsSource: Send + Sync {
    /// Fetch the ordered option list from `endpoint`, parameterized by
    /// `depends_on=value`. Callers normalize failures to "no options
    /// available"; implementations should still report them as errors.
    async fn fetch_options(
        &self,
        endpoint: &str,
        depends_on: &str,
        value: &str,
    ) -> FormResult<Vec<String>>;
}

/// Accepts a validated value map.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, form_id: &str, values: ValueMap) -> FormResult<SubmissionReceipt>;
}
