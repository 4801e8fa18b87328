//! Derivation of the displayable field tree.
//!
//! Rendering is a pure function of the schema, the current values, and a
//! cache snapshot, never of prior UI state. Hidden leaves and leaves with
//! unrecognized types are omitted; groups always render and recurse.

use serde::Serialize;

use crate::domain::schema::{FieldKind, FieldSpec};
use crate::domain::value::{FieldValue, ValueMap};
use crate::domain::visibility::is_visible;
use crate::engine::options::OptionCache;

/// A node of the rendered tree, ready for a host UI to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum RenderedNode {
    #[serde(rename_all = "camelCase")]
    Group {
        id: String,
        label: String,
        children: Vec<RenderedNode>,
    },
    #[serde(rename_all = "camelCase")]
    Input {
        id: String,
        label: String,
        kind: FieldKind,
        required: bool,
        value: FieldValue,
        /// Effective choices: the cache entry for dynamic fields (absent
        /// entry renders as no options yet), the static list otherwise.
        options: Vec<String>,
    },
}

/// Produce the ordered tree of currently displayable fields.
pub fn render_tree(
    fields: &[FieldSpec],
    values: &ValueMap,
    cache: &OptionCache,
) -> Vec<RenderedNode> {
    let mut nodes = Vec::new();
    for field in fields {
        if field.is_group() {
            nodes.push(RenderedNode::Group {
                id: field.id.clone(),
                label: field.label.clone(),
                children: render_tree(&field.fields, values, cache),
            });
            continue;
        }
        if field.kind() == FieldKind::Unknown {
            continue;
        }
        if !is_visible(field, values) {
            continue;
        }
        nodes.push(RenderedNode::Input {
            id: field.id.clone(),
            label: field.label.clone(),
            kind: field.kind(),
            required: field.required,
            value: values
                .get(&field.id)
                .cloned()
                .unwrap_or_else(|| FieldValue::Text(String::new())),
            options: effective_options(field, cache),
        });
    }
    nodes
}

fn effective_options(field: &FieldSpec, cache: &OptionCache) -> Vec<String> {
    if field.dynamic_options.is_some() {
        cache.get(&field.id).cloned().unwrap_or_default()
    } else {
        field.options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::FormSchema;
    use serde_json::json;

    fn schema() -> FormSchema {
        serde_json::from_value(json!({
            "formId": "f",
            "title": "F",
            "fields": [
                { "id": "hasPet", "label": "Has Pet", "type": "radio", "options": ["Yes", "No"] },
                {
                    "id": "petType",
                    "label": "Pet Type",
                    "type": "text",
                    "visibility": { "dependsOn": "hasPet", "condition": "equals", "value": "Yes" }
                },
                {
                    "id": "details",
                    "label": "Details",
                    "type": "group",
                    "fields": [
                        {
                            "id": "state",
                            "label": "State",
                            "type": "select",
                            "dynamicOptions": { "endpoint": "/opts", "dependsOn": "country" }
                        },
                        { "id": "sig", "label": "Signature", "type": "signature-pad" }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_hidden_and_unknown_leaves_omitted() {
        let schema = schema();
        let values = schema.seed_values();
        let nodes = render_tree(&schema.fields, &values, &OptionCache::new());

        // hasPet visible, petType hidden, group rendered with one child
        // (unknown signature-pad dropped).
        assert_eq!(nodes.len(), 2);
        match &nodes[1] {
            RenderedNode::Group { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_dynamic_options_come_from_cache_only() {
        let schema = schema();
        let values = schema.seed_values();

        let mut cache = OptionCache::new();
        cache.insert("state".into(), vec!["California".into()]);

        let nodes = render_tree(&schema.fields, &values, &cache);
        let RenderedNode::Group { children, .. } = &nodes[1] else {
            panic!("expected group");
        };
        let RenderedNode::Input { options, .. } = &children[0] else {
            panic!("expected input");
        };
        assert_eq!(options, &vec!["California".to_string()]);

        // Without a cache entry the list is empty even if the schema had a
        // static list alongside.
        let nodes = render_tree(&schema.fields, &values, &OptionCache::new());
        let RenderedNode::Group { children, .. } = &nodes[1] else {
            panic!("expected group");
        };
        let RenderedNode::Input { options, .. } = &children[0] else {
            panic!("expected input");
        };
        assert!(options.is_empty());
    }

    #[test]
    fn test_visibility_reacts_to_values() {
        let schema = schema();
        let mut values = schema.seed_values();
        values.insert("hasPet".into(), FieldValue::from("Yes"));

        let nodes = render_tree(&schema.fields, &values, &OptionCache::new());
        assert_eq!(nodes.len(), 3);
        match &nodes[1] {
            RenderedNode::Input { id, .. } => assert_eq!(id, "petType"),
            other => panic!("expected petType input, got {:?}", other),
        }
    }
}
