//! Options source issuing `endpoint?dependsOn=value` lookups over HTTP.

use async_trait::async_trait;

use crate::domain::OptionsSource;
use crate::error::{FormError, FormResult};

/// Resolves dependent option lists over HTTP. Relative endpoints (the usual
/// form in schemas, e.g. `/api/options/states`) are joined onto `base_url`;
/// absolute endpoints are used as-is.
pub struct HttpOptionsSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOptionsSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn lookup_url(&self, endpoint: &str, depends_on: &str, value: &str) -> String {
        let target = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint)
        };
        format!(
            "{}?{}={}",
            target,
            urlencoding::encode(depends_on),
            urlencoding::encode(value)
        )
    }
}

#[async_trait]
impl OptionsSource for HttpOptionsSource {
    async fn fetch_options(
        &self,
        endpoint: &str,
        depends_on: &str,
        value: &str,
    ) -> FormResult<Vec<String>> {
        let url = self.lookup_url(endpoint, depends_on, value);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FormError::OptionFetch {
                endpoint: url,
                reason: format!("status {}", status),
            });
        }

        response.json().await.map_err(|e| FormError::OptionFetch {
            endpoint: url,
            reason: format!("invalid payload: {}", e),
        })
    }
}
