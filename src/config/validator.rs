use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::Settings;
use crate::domain::schema::{FieldSpec, FormSchema};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

/// Startup validation of the loaded form catalog. Catches schema mistakes
/// that would otherwise surface as silent engine misbehavior: duplicate
/// leaf ids (the value map is a flat namespace), childless groups,
/// half-specified dynamic-option or visibility clauses, and patterns that
/// do not compile.
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut seen_form_ids = HashMap::new();

        for (idx, form) in settings.forms.iter().enumerate() {
            if form.form_id.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "forms[{}].formId",
                    idx
                )));
            } else if let Some(prev_idx) = seen_form_ids.insert(&form.form_id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Form id '{}' appears at indices {} and {}",
                    form.form_id, prev_idx, idx
                )));
            }

            Self::validate_form(form, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_form(form: &FormSchema, errors: &mut Vec<ValidationError>) {
        // Leaf ids share one flat namespace across the whole tree.
        let mut seen_leaf_ids: HashMap<&str, ()> = HashMap::new();
        form.for_each_leaf(&mut |leaf| {
            if leaf.id.is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "{}: field id",
                    form.form_id
                )));
            } else if seen_leaf_ids.insert(leaf.id.as_str(), ()).is_some() {
                errors.push(ValidationError::Duplicate(format!(
                    "{}: leaf field id '{}'",
                    form.form_id, leaf.id
                )));
            }
        });

        Self::validate_fields(&form.form_id, &form.fields, errors);
    }

    fn validate_fields(form_id: &str, fields: &[FieldSpec], errors: &mut Vec<ValidationError>) {
        for field in fields {
            let at = format!("{}.{}", form_id, field.id);

            if field.is_group() {
                if field.fields.is_empty() {
                    errors.push(ValidationError::InvalidValue {
                        field: at,
                        reason: "group has no child fields".to_string(),
                    });
                } else {
                    Self::validate_fields(form_id, &field.fields, errors);
                }
                continue;
            }

            if let Some(dyn_opts) = &field.dynamic_options {
                if dyn_opts.endpoint.is_empty() {
                    errors.push(ValidationError::MissingField(format!(
                        "{}.dynamicOptions.endpoint",
                        at
                    )));
                }
                if dyn_opts.depends_on.is_empty() {
                    errors.push(ValidationError::MissingField(format!(
                        "{}.dynamicOptions.dependsOn",
                        at
                    )));
                }
            }

            if let Some(rule) = &field.visibility {
                if rule.depends_on.is_empty() {
                    errors.push(ValidationError::MissingField(format!(
                        "{}.visibility.dependsOn",
                        at
                    )));
                }
            }

            if let Some(rule) = &field.validation {
                if let Some(pattern) = &rule.pattern {
                    if let Err(err) = Regex::new(pattern) {
                        errors.push(ValidationError::InvalidValue {
                            field: format!("{}.validation.pattern", at),
                            reason: err.to_string(),
                        });
                    }
                }
                if let (Some(min), Some(max)) = (rule.min, rule.max) {
                    if min > max {
                        errors.push(ValidationError::InvalidValue {
                            field: format!("{}.validation", at),
                            reason: format!("min {} exceeds max {}", min, max),
                        });
                    }
                }
            }
        }
    }
}
