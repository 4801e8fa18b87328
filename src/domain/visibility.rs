//! Conditional visibility evaluation.

use crate::domain::schema::FieldSpec;
use crate::domain::value::ValueMap;

/// Decide whether a field is currently shown.
///
/// No visibility clause means always visible. The `equals` condition
/// compares the governing field's current value against the rule value with
/// strict equality (no string/number coercion); an absent key never matches.
/// Any other condition token is treated as always visible, a documented
/// gap in the schema format, not something to guess at.
///
/// Pure over `(field, values)`: no side effects, safe to call before any
/// dynamic options have resolved.
pub fn is_visible(field: &FieldSpec, values: &ValueMap) -> bool {
    let Some(rule) = &field.visibility else {
        return true;
    };
    if rule.condition != "equals" {
        return true;
    }
    values.get(&rule.depends_on) == Some(&rule.value)
}
