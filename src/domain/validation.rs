//! Recursive validation of a value map against a form schema.
//!
//! Validation walks the tree in schema order, skipping fields that are
//! currently hidden and leaves with unrecognized types. It never mutates
//! values: numeric and date coercion happen only for comparison. The result
//! is built fresh on every call, so repeated validation of the same inputs
//! yields the same messages in the same order.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::domain::schema::{FieldKind, FieldSpec, FormSchema};
use crate::domain::value::{format_number, FieldValue, ValueMap};
use crate::domain::visibility::is_visible;

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMessage {
    pub field_id: String,
    pub label: String,
    pub message: String,
}

impl ValidationMessage {
    fn new(field: &FieldSpec, message: String) -> Self {
        Self {
            field_id: field.id.clone(),
            label: field.label.clone(),
            message,
        }
    }
}

/// Validate every visible leaf field, producing an ordered error list.
/// An empty list means the value map is ready for submission as-is.
pub fn validate(schema: &FormSchema, values: &ValueMap) -> Vec<ValidationMessage> {
    let mut errors = Vec::new();
    validate_fields(&schema.fields, values, &mut errors);
    errors
}

fn validate_fields(fields: &[FieldSpec], values: &ValueMap, errors: &mut Vec<ValidationMessage>) {
    for field in fields {
        if field.is_group() {
            validate_fields(&field.fields, values, errors);
        } else {
            validate_leaf(field, values, errors);
        }
    }
}

fn validate_leaf(field: &FieldSpec, values: &ValueMap, errors: &mut Vec<ValidationMessage>) {
    let kind = field.kind();
    // Unknown types render as nothing, so the user can never fill them in.
    if kind == FieldKind::Unknown {
        return;
    }
    if !is_visible(field, values) {
        return;
    }

    let value = values.get(&field.id);

    // Required is enforced uniformly for every type with an empty notion:
    // absent key, empty string, or empty list.
    if field.required && value.map_or(true, FieldValue::is_empty) {
        errors.push(ValidationMessage::new(
            field,
            format!("{} is required.", field.label),
        ));
    }

    let Some(rule) = &field.validation else {
        return;
    };

    if let Some(pattern) = &rule.pattern {
        if let Some(text) = value.and_then(FieldValue::as_text) {
            if !text.is_empty() {
                // Malformed patterns are rejected by the schema validator at
                // load time; one slipping through skips the check rather than
                // failing every value.
                match Regex::new(pattern) {
                    Ok(re) => {
                        if !re.is_match(text) {
                            errors.push(ValidationMessage::new(
                                field,
                                format!("{} is invalid.", field.label),
                            ));
                        }
                    }
                    Err(err) => {
                        tracing::warn!(field = %field.id, %err, "skipping unparseable pattern");
                    }
                }
            }
        }
    }

    if matches!(kind, FieldKind::Number | FieldKind::Date) {
        if let Some(n) = value.and_then(|v| comparable_value(kind, v)) {
            if let Some(min) = rule.min {
                if n < min {
                    errors.push(ValidationMessage::new(
                        field,
                        format!("{} must be at least {}.", field.label, format_number(min)),
                    ));
                }
            }
            if let Some(max) = rule.max {
                if n > max {
                    errors.push(ValidationMessage::new(
                        field,
                        format!("{} must be at most {}.", field.label, format_number(max)),
                    ));
                }
            }
        }
    }
}

/// Coerce a value for bounds comparison only. Numbers parse as f64; dates
/// parse as `YYYY-MM-DD` and compare as epoch milliseconds. Empty or
/// unparseable values yield `None` and skip the bounds check.
fn comparable_value(kind: FieldKind, value: &FieldValue) -> Option<f64> {
    match (kind, value) {
        (_, FieldValue::Number(n)) => Some(*n),
        (FieldKind::Number, FieldValue::Text(s)) if !s.is_empty() => s.parse().ok(),
        (FieldKind::Date, FieldValue::Text(s)) if !s.is_empty() => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
            let millis = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
            Some(millis as f64)
        }
        _ => None,
    }
}
