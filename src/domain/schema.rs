//! Form schema model.
//!
//! A form schema is a recursive tree of [`FieldSpec`] nodes fetched at
//! runtime. The wire format is untyped: `type` is a free-form string and
//! unrecognized properties are ignored, so a schema with field shapes this
//! engine does not know about still parses; unknown leaves simply render
//! as nothing.

use serde::{Deserialize, Serialize};

use crate::domain::value::{FieldValue, ValueMap};

/// Dependent option clause: the field's choices are fetched from `endpoint`
/// parameterized by the live value of `depends_on`. When present, the
/// effective option list always comes from the option cache, never from the
/// static `options` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicOptions {
    pub endpoint: String,
    pub depends_on: String,
}

/// Conditional visibility clause. Only the `equals` condition is defined;
/// any other token means the field is always visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    pub depends_on: String,
    pub condition: String,
    pub value: FieldValue,
}

/// Per-field validation constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Interpreted field type. The wire carries an arbitrary string; anything
/// not recognized becomes [`FieldKind::Unknown`] rather than a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Date,
    Number,
    Select,
    Radio,
    Checkbox,
    Textarea,
    Group,
    Unknown,
}

/// One node of the form tree: either a leaf input or a group of children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Stable identifier, unique across the whole tree for leaves; the
    /// value-map key.
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Raw type token from the wire.
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    /// Static option list for select/radio/checkbox fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_options: Option<DynamicOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
    /// Children; meaningful only when this node is a group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldSpec>,
}

impl FieldSpec {
    pub fn kind(&self) -> FieldKind {
        match self.field_type.as_str() {
            "text" => FieldKind::Text,
            "date" => FieldKind::Date,
            "number" => FieldKind::Number,
            "select" => FieldKind::Select,
            "radio" => FieldKind::Radio,
            "checkbox" => FieldKind::Checkbox,
            "textarea" => FieldKind::Textarea,
            // Both tokens appear in the wild for container nodes.
            "group" | "section" => FieldKind::Group,
            _ => FieldKind::Unknown,
        }
    }

    pub fn is_group(&self) -> bool {
        self.kind() == FieldKind::Group
    }
}

/// A complete form description, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub form_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    /// Visit every leaf field (any non-group node, including unknown types)
    /// in schema order, descending through groups.
    pub fn for_each_leaf<'a, F: FnMut(&'a FieldSpec)>(&'a self, f: &mut F) {
        walk_leaves(&self.fields, f);
    }

    /// Seed the initial value map: one empty-string entry per leaf, no
    /// entries for groups.
    pub fn seed_values(&self) -> ValueMap {
        let mut values = ValueMap::new();
        self.for_each_leaf(&mut |field| {
            values.insert(field.id.clone(), FieldValue::Text(String::new()));
        });
        values
    }

    /// Every field carrying a `dynamicOptions` clause, regardless of its
    /// current visibility: a hidden field may become visible later and must
    /// already have options resolving.
    pub fn dynamic_fields(&self) -> Vec<&FieldSpec> {
        let mut found = Vec::new();
        self.for_each_leaf(&mut |field| {
            if field.dynamic_options.is_some() {
                found.push(field);
            }
        });
        found
    }

    /// All leaf ids in schema order.
    pub fn leaf_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.for_each_leaf(&mut |field| ids.push(field.id.as_str()));
        ids
    }

    /// Find a leaf by id anywhere in the tree.
    pub fn find_leaf(&self, id: &str) -> Option<&FieldSpec> {
        let mut found = None;
        self.for_each_leaf(&mut |field| {
            if found.is_none() && field.id == id {
                found = Some(field);
            }
        });
        found
    }
}

fn walk_leaves<'a, F: FnMut(&'a FieldSpec)>(fields: &'a [FieldSpec], f: &mut F) {
    for field in fields {
        if field.is_group() {
            walk_leaves(&field.fields, f);
        } else {
            f(field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_schema() -> FormSchema {
        serde_json::from_value(json!({
            "formId": "home_insurance",
            "title": "Home Insurance",
            "fields": [
                {
                    "id": "address",
                    "label": "Address",
                    "type": "section",
                    "fields": [
                        { "id": "street", "label": "Street", "type": "text", "required": true },
                        {
                            "id": "state",
                            "label": "State",
                            "type": "select",
                            "dynamicOptions": { "endpoint": "/api/options/states", "dependsOn": "country" }
                        }
                    ]
                },
                { "id": "country", "label": "Country", "type": "select", "options": ["USA", "Canada"] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_seed_values_covers_leaves_only() {
        let schema = nested_schema();
        let values = schema.seed_values();

        assert_eq!(values.len(), 3);
        for id in ["street", "state", "country"] {
            assert_eq!(values.get(id), Some(&FieldValue::Text(String::new())));
        }
        assert!(!values.contains_key("address"));
    }

    #[test]
    fn test_dynamic_fields_found_through_groups() {
        let schema = nested_schema();
        let dynamic = schema.dynamic_fields();
        assert_eq!(dynamic.len(), 1);
        assert_eq!(dynamic[0].id, "state");
    }

    #[test]
    fn test_unknown_type_and_extra_properties_tolerated() {
        let schema: FormSchema = serde_json::from_value(json!({
            "formId": "f",
            "title": "t",
            "fields": [
                { "id": "sig", "label": "Signature", "type": "signature-pad", "widget": "fancy" }
            ]
        }))
        .unwrap();

        assert_eq!(schema.fields[0].kind(), FieldKind::Unknown);
        // Unknown leaves still get a value-map slot.
        assert!(schema.seed_values().contains_key("sig"));
    }

    #[test]
    fn test_group_and_section_both_mean_group() {
        for token in ["group", "section"] {
            let field: FieldSpec = serde_json::from_value(json!({
                "id": "g", "label": "G", "type": token,
                "fields": [{ "id": "inner", "label": "I", "type": "text" }]
            }))
            .unwrap();
            assert!(field.is_group());
        }
    }

    #[test]
    fn test_leaf_ids_in_schema_order() {
        let schema = nested_schema();
        assert_eq!(schema.leaf_ids(), vec!["street", "state", "country"]);
    }
}
