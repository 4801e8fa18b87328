//! The render/bind controller: owns the value map and option cache, reacts
//! to edits, and drives validation and submission.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::schema::FormSchema;
use crate::domain::validation::{validate, ValidationMessage};
use crate::domain::value::{FieldValue, ValueMap};
use crate::domain::{OptionsSource, SchemaSource, SubmissionReceipt, SubmissionSink};
use crate::engine::options::{DependencyIndex, OptionResolver};
use crate::engine::render::{render_tree, RenderedNode};
use crate::error::{FormError, FormResult};

/// Lifecycle of a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// No schema yet (nothing loaded, or a load is in progress/failed).
    Loading,
    /// Schema present, values seeded, editable.
    Ready,
    /// A submit is in flight.
    Submitting,
}

/// Result of a submit attempt that did not fail outright.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Validation passed and the sink accepted the values.
    Accepted(SubmissionReceipt),
    /// Validation failed; no sink call was made and the form stays editable.
    Rejected(Vec<ValidationMessage>),
}

/// Orchestrates one form: schema fetch, value state, visibility and option
/// re-derivation on change, validation, and submission.
///
/// All mutation goes through the controller; the value map and option cache
/// are not shared with any other component.
pub struct FormController {
    schemas: Arc<dyn SchemaSource>,
    sink: Arc<dyn SubmissionSink>,
    resolver: OptionResolver,
    state: FormState,
    form_id: Option<String>,
    schema: Option<FormSchema>,
    index: DependencyIndex,
    values: ValueMap,
    errors: Vec<ValidationMessage>,
}

impl FormController {
    pub fn new(
        schemas: Arc<dyn SchemaSource>,
        options: Arc<dyn OptionsSource>,
        sink: Arc<dyn SubmissionSink>,
    ) -> Self {
        Self {
            schemas,
            sink,
            resolver: OptionResolver::new(options),
            state: FormState::Loading,
            form_id: None,
            schema: None,
            index: DependencyIndex::default(),
            values: ValueMap::new(),
            errors: Vec::new(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// Messages from the last rejected submit, kept for display until the
    /// next attempt.
    pub fn errors(&self) -> &[ValidationMessage] {
        &self.errors
    }

    /// Fetch the schema for `form_id`, seed values, and resolve initial
    /// options. A no-op when the same identifier is already loaded; a new
    /// identifier returns the controller to `Loading` and starts over.
    pub async fn load(&mut self, form_id: &str) -> FormResult<()> {
        if self.schema.is_some() && self.form_id.as_deref() == Some(form_id) {
            return Ok(());
        }

        self.state = FormState::Loading;
        self.schema = None;
        self.values.clear();
        self.errors.clear();

        let schema = self.schemas.fetch_schema(form_id).await?;
        info!(form_id, title = %schema.title, "form schema loaded");

        self.values = schema.seed_values();
        self.index = DependencyIndex::build(&schema);
        self.resolver.resolve_all(&schema, &self.values).await;

        self.form_id = Some(form_id.to_string());
        self.schema = Some(schema);
        self.state = FormState::Ready;
        Ok(())
    }

    /// Replace a field's value (full key replacement, last write wins) and
    /// refresh the option entries that depend on it.
    pub async fn set_value(&mut self, field_id: &str, value: FieldValue) {
        let Some(schema) = &self.schema else {
            warn!(field_id, "set_value before a schema is loaded, ignoring");
            return;
        };
        if !self.values.contains_key(field_id) {
            debug!(field_id, "setting value for id not present in the schema");
        }
        self.values.insert(field_id.to_string(), value);
        self.resolver
            .resolve_dependents(schema, &self.index, field_id, &self.values)
            .await;
    }

    /// Toggle membership of `option` in a checkbox field's list value.
    pub async fn toggle_choice(&mut self, field_id: &str, option: &str) {
        let mut selected = match self.values.get(field_id) {
            Some(FieldValue::Many(items)) => items.clone(),
            _ => Vec::new(),
        };
        match selected.iter().position(|o| o == option) {
            Some(pos) => {
                selected.remove(pos);
            }
            None => selected.push(option.to_string()),
        }
        self.set_value(field_id, FieldValue::Many(selected)).await;
    }

    /// Derive the displayable field tree from the current schema, values,
    /// and option cache snapshot.
    pub async fn render(&self) -> Vec<RenderedNode> {
        let Some(schema) = &self.schema else {
            return Vec::new();
        };
        let cache = self.resolver.snapshot().await;
        render_tree(&schema.fields, &self.values, &cache)
    }

    /// Validate and, if clean, hand the unchanged value map to the sink.
    ///
    /// Validation failure aborts before any sink call and retains the
    /// messages for display. Sink rejection surfaces as an error with all
    /// values preserved so the user can retry without re-entering data.
    pub async fn submit(&mut self) -> FormResult<SubmitOutcome> {
        let (schema, form_id) = match (&self.schema, &self.form_id) {
            (Some(schema), Some(form_id)) => (schema, form_id.clone()),
            _ => return Err(FormError::NotReady("no form loaded".to_string())),
        };

        self.state = FormState::Submitting;
        let errors = validate(schema, &self.values);
        if !errors.is_empty() {
            debug!(form_id, count = errors.len(), "submit blocked by validation");
            self.errors = errors.clone();
            self.state = FormState::Ready;
            return Ok(SubmitOutcome::Rejected(errors));
        }

        match self.sink.submit(&form_id, self.values.clone()).await {
            Ok(receipt) => {
                info!(form_id, submission_id = %receipt.submission_id, "form submitted");
                self.errors.clear();
                self.state = FormState::Ready;
                Ok(SubmitOutcome::Accepted(receipt))
            }
            Err(err) => {
                self.state = FormState::Ready;
                Err(err)
            }
        }
    }
}
