//! Dependent option resolution.
//!
//! Fields carrying a `dynamicOptions` clause get their choices from an
//! external lookup keyed by the live value of another field. The resolver
//! keeps a cache of `field id -> option list` consistent with the value
//! map: an empty or falsy dependency resets the entry without a fetch, a
//! failed fetch resets it too, and a successful fetch replaces it.
//!
//! Lookups for the same field may overlap. Each entry carries a monotonic
//! sequence number; a response is committed only if its sequence still
//! matches the latest issued request, so a slow early response can never
//! clobber a newer one.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::schema::{FieldSpec, FormSchema};
use crate::domain::value::ValueMap;
use crate::domain::OptionsSource;

/// Snapshot type handed to render/validation: field id to effective options.
pub type OptionCache = HashMap<String, Vec<String>>;

/// `dependsOn field id -> ids of fields whose options depend on it`, built
/// once per schema so a value edit only refreshes its actual dependents
/// instead of rescanning the whole tree.
#[derive(Debug, Default, Clone)]
pub struct DependencyIndex {
    index: HashMap<String, Vec<String>>,
}

impl DependencyIndex {
    pub fn build(schema: &FormSchema) -> Self {
        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for field in schema.dynamic_fields() {
            if let Some(dyn_opts) = &field.dynamic_options {
                index
                    .entry(dyn_opts.depends_on.clone())
                    .or_default()
                    .push(field.id.clone());
            }
        }
        Self { index }
    }

    pub fn dependents_of(&self, field_id: &str) -> &[String] {
        self.index.get(field_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[derive(Default)]
struct ResolverState {
    cache: OptionCache,
    seq: HashMap<String, u64>,
}

/// Keeps the option cache consistent with the value map.
#[derive(Clone)]
pub struct OptionResolver {
    source: Arc<dyn OptionsSource>,
    state: Arc<RwLock<ResolverState>>,
}

impl OptionResolver {
    pub fn new(source: Arc<dyn OptionsSource>) -> Self {
        Self {
            source,
            state: Arc::new(RwLock::new(ResolverState::default())),
        }
    }

    /// Current cache contents. Entries are absent until first resolved.
    pub async fn snapshot(&self) -> OptionCache {
        self.state.read().await.cache.clone()
    }

    /// Resolve every dynamic field in the schema, visible or not; a hidden
    /// field may become visible later and must already have options.
    pub async fn resolve_all(&self, schema: &FormSchema, values: &ValueMap) {
        for field in schema.dynamic_fields() {
            self.resolve_field(field, values).await;
        }
    }

    /// Refresh only the fields whose dependency is `changed_id`.
    pub async fn resolve_dependents(
        &self,
        schema: &FormSchema,
        index: &DependencyIndex,
        changed_id: &str,
        values: &ValueMap,
    ) {
        for dependent_id in index.dependents_of(changed_id) {
            if let Some(field) = schema.find_leaf(dependent_id) {
                self.resolve_field(field, values).await;
            }
        }
    }

    async fn resolve_field(&self, field: &FieldSpec, values: &ValueMap) {
        let Some(dyn_opts) = &field.dynamic_options else {
            return;
        };

        let dependency = values
            .get(&dyn_opts.depends_on)
            .and_then(|v| v.as_query_value());

        let Some(dep_value) = dependency else {
            // Reset state: the governing field is empty. Bumping the
            // sequence fences out any fetch still in flight.
            self.reset(&field.id).await;
            return;
        };

        let token = self.begin(&field.id).await;
        let options = match self
            .source
            .fetch_options(&dyn_opts.endpoint, &dyn_opts.depends_on, &dep_value)
            .await
        {
            Ok(options) => options,
            Err(err) => {
                debug!(field = %field.id, %err, "option lookup failed, clearing entry");
                Vec::new()
            }
        };
        self.commit(&field.id, token, options).await;
    }

    async fn reset(&self, field_id: &str) {
        let mut state = self.state.write().await;
        *state.seq.entry(field_id.to_string()).or_insert(0) += 1;
        state.cache.insert(field_id.to_string(), Vec::new());
    }

    async fn begin(&self, field_id: &str) -> u64 {
        let mut state = self.state.write().await;
        let seq = state.seq.entry(field_id.to_string()).or_insert(0);
        *seq += 1;
        *seq
    }

    async fn commit(&self, field_id: &str, token: u64, options: Vec<String>) {
        let mut state = self.state.write().await;
        if state.seq.get(field_id) == Some(&token) {
            state.cache.insert(field_id.to_string(), options);
        } else {
            debug!(field = %field_id, "discarding stale option response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::FieldValue;
    use crate::error::{FormError, FormResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        response: FormResult<Vec<String>>,
    }

    impl CountingSource {
        fn returning(options: Vec<&str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(options.into_iter().map(String::from).collect()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(FormError::OptionFetch {
                    endpoint: "/opts".into(),
                    reason: "boom".into(),
                }),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OptionsSource for CountingSource {
        async fn fetch_options(
            &self,
            _endpoint: &str,
            _depends_on: &str,
            _value: &str,
        ) -> FormResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(options) => Ok(options.clone()),
                Err(_) => Err(FormError::OptionFetch {
                    endpoint: "/opts".into(),
                    reason: "boom".into(),
                }),
            }
        }
    }

    fn states_schema() -> FormSchema {
        serde_json::from_value(json!({
            "formId": "f",
            "title": "F",
            "fields": [
                { "id": "country", "label": "Country", "type": "select", "options": ["USA", "Canada"] },
                {
                    "id": "state",
                    "label": "State",
                    "type": "select",
                    "dynamicOptions": { "endpoint": "/opts", "dependsOn": "country" }
                }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_empty_dependency_resets_without_fetch() {
        let source = Arc::new(CountingSource::returning(vec!["California"]));
        let resolver = OptionResolver::new(source.clone());
        let schema = states_schema();
        let values = schema.seed_values();

        resolver.resolve_all(&schema, &values).await;

        assert_eq!(source.calls(), 0);
        assert_eq!(resolver.snapshot().await.get("state"), Some(&vec![]));
    }

    #[tokio::test]
    async fn test_fetch_populates_cache() {
        let source = Arc::new(CountingSource::returning(vec!["California", "Texas"]));
        let resolver = OptionResolver::new(source.clone());
        let schema = states_schema();
        let mut values = schema.seed_values();
        values.insert("country".into(), FieldValue::from("USA"));

        resolver.resolve_all(&schema, &values).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(
            resolver.snapshot().await.get("state"),
            Some(&vec!["California".to_string(), "Texas".to_string()])
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty_list() {
        let source = Arc::new(CountingSource::failing());
        let resolver = OptionResolver::new(source.clone());
        let schema = states_schema();
        let mut values = schema.seed_values();
        values.insert("country".into(), FieldValue::from("USA"));

        resolver.resolve_all(&schema, &values).await;

        assert_eq!(source.calls(), 1);
        assert_eq!(resolver.snapshot().await.get("state"), Some(&vec![]));
    }

    #[tokio::test]
    async fn test_dependency_index_targets_dependents_only() {
        let schema = states_schema();
        let index = DependencyIndex::build(&schema);

        assert_eq!(index.dependents_of("country"), &["state".to_string()]);
        assert!(index.dependents_of("state").is_empty());

        let source = Arc::new(CountingSource::returning(vec!["California"]));
        let resolver = OptionResolver::new(source.clone());
        let mut values = schema.seed_values();
        values.insert("country".into(), FieldValue::from("USA"));

        // Editing an unrelated field triggers no lookups.
        resolver
            .resolve_dependents(&schema, &index, "state", &values)
            .await;
        assert_eq!(source.calls(), 0);

        resolver
            .resolve_dependents(&schema, &index, "country", &values)
            .await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_response_discarded() {
        let source = Arc::new(CountingSource::returning(vec!["old"]));
        let resolver = OptionResolver::new(source);

        // A request begins, then the dependency changes (reset) before the
        // response lands: the commit must be dropped.
        let token = resolver.begin("state").await;
        resolver.reset("state").await;
        resolver.commit("state", token, vec!["stale".into()]).await;

        assert_eq!(resolver.snapshot().await.get("state"), Some(&vec![]));
    }

    #[tokio::test]
    async fn test_latest_request_wins() {
        let source = Arc::new(CountingSource::returning(vec![]));
        let resolver = OptionResolver::new(source);

        let first = resolver.begin("state").await;
        let second = resolver.begin("state").await;

        // The newer response lands first, then the older one arrives late.
        resolver
            .commit("state", second, vec!["Canada-opt".into()])
            .await;
        resolver.commit("state", first, vec!["USA-opt".into()]).await;

        assert_eq!(
            resolver.snapshot().await.get("state"),
            Some(&vec!["Canada-opt".to_string()])
        );
    }
}
