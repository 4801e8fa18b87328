//! Schema source backed by a remote HTTP catalog.

use async_trait::async_trait;

use crate::domain::schema::FormSchema;
use crate::domain::SchemaSource;
use crate::error::{FormError, FormResult};

/// Fetches the full form list from a single catalog URL and filters by form
/// id client-side. Schemas are JSON; unknown field shapes still parse.
pub struct HttpSchemaSource {
    client: reqwest::Client,
    catalog_url: String,
}

impl HttpSchemaSource {
    pub fn new(catalog_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            catalog_url: catalog_url.into(),
        }
    }
}

#[async_trait]
impl SchemaSource for HttpSchemaSource {
    async fn fetch_schema(&self, form_id: &str) -> FormResult<FormSchema> {
        let response = self
            .client
            .get(&self.catalog_url)
            .send()
            .await
            .map_err(|e| FormError::SchemaFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormError::SchemaFetch(format!(
                "{} returned {}",
                self.catalog_url, status
            )));
        }

        let forms: Vec<FormSchema> = response
            .json()
            .await
            .map_err(|e| FormError::SchemaFetch(format!("invalid catalog payload: {}", e)))?;

        forms
            .into_iter()
            .find(|f| f.form_id.eq_ignore_ascii_case(form_id))
            .ok_or_else(|| FormError::SchemaNotFound(form_id.to_string()))
    }
}
