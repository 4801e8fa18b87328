//! Field values and the flat value map.
//!
//! Every leaf field contributes exactly one entry to the [`ValueMap`], keyed
//! by its id regardless of how deeply the field is nested. Values are seeded
//! to the empty string at schema load so reads never hit an absent key.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single field's value.
///
/// The wire representation is untagged: strings, numbers, booleans, and
/// string arrays (checkbox multi-select) round-trip as plain JSON values.
/// Equality is strict across variants: `Text("5")` never equals
/// `Number(5.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Many(Vec<String>),
}

/// Mapping from leaf field id to current value.
pub type ValueMap = HashMap<String, FieldValue>;

impl FieldValue {
    /// Empty per the engine's required-field policy: empty string or empty
    /// list. Numbers and booleans always count as filled.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Many(items) => items.is_empty(),
            FieldValue::Number(_) | FieldValue::Bool(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Stringify for use as a dependency lookup parameter. `None` means the
    /// value is empty/falsy and the dependent option list must reset instead
    /// of fetching: empty string, zero, `false`, or an empty list.
    pub fn as_query_value(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) if s.is_empty() => None,
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) if *n == 0.0 => None,
            FieldValue::Number(n) => Some(format_number(*n)),
            FieldValue::Bool(false) => None,
            FieldValue::Bool(true) => Some("true".to_string()),
            FieldValue::Many(items) if items.is_empty() => None,
            FieldValue::Many(items) => Some(items.join(",")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// Render a float without a trailing `.0` when it is integral.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_equality_across_variants() {
        assert_ne!(FieldValue::Text("5".into()), FieldValue::Number(5.0));
        assert_ne!(FieldValue::Text("true".into()), FieldValue::Bool(true));
        assert_eq!(FieldValue::Text("Yes".into()), FieldValue::from("Yes"));
    }

    #[test]
    fn test_empty_notion() {
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::Many(vec![]).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
    }

    #[test]
    fn test_query_value_falsiness() {
        assert_eq!(FieldValue::Text(String::new()).as_query_value(), None);
        assert_eq!(FieldValue::Number(0.0).as_query_value(), None);
        assert_eq!(FieldValue::Bool(false).as_query_value(), None);
        assert_eq!(FieldValue::Many(vec![]).as_query_value(), None);
        assert_eq!(
            FieldValue::Text("USA".into()).as_query_value(),
            Some("USA".to_string())
        );
        assert_eq!(
            FieldValue::Number(42.0).as_query_value(),
            Some("42".to_string())
        );
        assert_eq!(
            FieldValue::Many(vec!["a".into(), "b".into()]).as_query_value(),
            Some("a,b".to_string())
        );
    }

    #[test]
    fn test_untagged_wire_format() {
        let v: FieldValue = serde_json::from_str("\"Yes\"").unwrap();
        assert_eq!(v, FieldValue::Text("Yes".into()));
        let v: FieldValue = serde_json::from_str("17").unwrap();
        assert_eq!(v, FieldValue::Number(17.0));
        let v: FieldValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(v, FieldValue::Many(vec!["a".into(), "b".into()]));
    }
}
