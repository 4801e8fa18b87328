//! Fixed in-memory options source for the demo server and tests.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::domain::OptionsSource;
use crate::error::FormResult;

/// US states served for `country=USA`, mirroring the demo options endpoint.
pub const US_STATES: [&str; 5] = ["California", "Texas", "New York", "Florida", "Illinois"];

/// Serves option lists from a fixed map keyed by the dependency value. An
/// unknown dependency value yields an empty list, not an error.
#[derive(Default)]
pub struct StaticOptionsSource {
    entries: HashMap<String, Vec<String>>,
}

impl StaticOptionsSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo catalog: five US states for `USA`, nothing for anyone else.
    pub fn states() -> Self {
        let mut source = Self::new();
        source.insert("USA", US_STATES.iter().map(|s| s.to_string()).collect());
        source
    }

    pub fn insert(&mut self, dependency_value: impl Into<String>, options: Vec<String>) {
        self.entries.insert(dependency_value.into(), options);
    }
}

#[async_trait]
impl OptionsSource for StaticOptionsSource {
    async fn fetch_options(
        &self,
        _endpoint: &str,
        _depends_on: &str,
        value: &str,
    ) -> FormResult<Vec<String>> {
        Ok(self.entries.get(value).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_states_catalog() {
        let source = StaticOptionsSource::states();
        let usa = source
            .fetch_options("/api/options/states", "country", "USA")
            .await
            .unwrap();
        assert_eq!(usa.len(), 5);

        let other = source
            .fetch_options("/api/options/states", "country", "Canada")
            .await
            .unwrap();
        assert!(other.is_empty());
    }
}
