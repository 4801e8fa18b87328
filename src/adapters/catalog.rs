//! Schema source backed by the loaded form catalog.

use async_trait::async_trait;

use crate::domain::schema::FormSchema;
use crate::domain::SchemaSource;
use crate::error::{FormError, FormResult};

/// Serves schemas from an in-memory catalog, typically the forms loaded by
/// [`Settings`](crate::config::Settings) from `config/forms/`. Lookup is
/// case-insensitive on the form id.
pub struct CatalogSchemaSource {
    forms: Vec<FormSchema>,
}

impl CatalogSchemaSource {
    pub fn new(forms: Vec<FormSchema>) -> Self {
        Self { forms }
    }

    pub fn forms(&self) -> &[FormSchema] {
        &self.forms
    }
}

#[async_trait]
impl SchemaSource for CatalogSchemaSource {
    async fn fetch_schema(&self, form_id: &str) -> FormResult<FormSchema> {
        self.forms
            .iter()
            .find(|f| f.form_id.eq_ignore_ascii_case(form_id))
            .cloned()
            .ok_or_else(|| FormError::SchemaNotFound(form_id.to_string()))
    }
}
