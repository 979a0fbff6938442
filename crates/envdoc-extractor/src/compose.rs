//! Composition of child nodes under a parent field
//!
//! Three ways a child node is re-addressed:
//! - nested under a struct field: key `parent_child`, path `parent.child`,
//!   env rebuilt from the prefix and the composed key
//! - as an array element: names kept, env dropped
//! - as a plugin config field: key and env kept, path moved under the plugin

use envdoc_schema::{ElementField, HeaderNode, LeafVariable, VariableNode};

use crate::classifier::DeclaredType;
use crate::fields::FieldDescriptor;
use crate::naming;
use crate::plugins::PLACEHOLDER;

/// Names a struct field contributes to its children
#[derive(Debug, Clone)]
pub(crate) struct ParentNames<'t> {
    key: String,
    env_stem: String,
    json: String,
    map: Option<&'t str>,
}

impl<'t> ParentNames<'t> {
    pub(crate) fn new(field: &FieldDescriptor, declared: &DeclaredType<'t>) -> Self {
        Self {
            key: field.name.clone(),
            env_stem: naming::env_segment(&field.name),
            json: field.serialization_key.clone(),
            map: declared.map,
        }
    }

    /// Names for the plugin collection field: the placeholder takes the place
    /// of the plugin name and the map declarator is dropped
    pub(crate) fn templated(field: &FieldDescriptor) -> Self {
        Self {
            key: format!("{}.{}", field.name, PLACEHOLDER),
            env_stem: format!("{}_{}", naming::env_segment(&field.name), PLACEHOLDER),
            json: format!("{}.{}", field.serialization_key, PLACEHOLDER),
            map: None,
        }
    }

    fn typed(&self, type_name: &str) -> String {
        match self.map {
            Some(map) => format!("{}{}", map, type_name),
            None => type_name.to_string(),
        }
    }
}

/// Header node announcing the expansion of `field`
pub(crate) fn header(field: &FieldDescriptor, type_name: &str) -> VariableNode {
    VariableNode::Header(HeaderNode {
        description: field.description.clone(),
        key: field.name.clone(),
        json: field.serialization_key.clone(),
        type_name: type_name.to_string(),
        required: field.required(),
    })
}

/// Leaf node for a scalar or array field
pub(crate) fn leaf(field: &FieldDescriptor, prefix: &str, type_name: String) -> LeafVariable {
    LeafVariable {
        description: field.description.clone(),
        key: field.name.clone(),
        json: field.serialization_key.clone(),
        env: naming::env_name(prefix, &field.name),
        type_name,
        required: field.required(),
        nested: None,
    }
}

/// Re-address `child` under `parent`
pub(crate) fn nested(parent: &ParentNames<'_>, prefix: &str, child: VariableNode) -> VariableNode {
    match child {
        VariableNode::Header(h) => VariableNode::Header(HeaderNode {
            description: h.description,
            key: format!("{}_{}", parent.key, h.key),
            json: format!("{}.{}", parent.json, h.json),
            type_name: parent.typed(&h.type_name),
            required: h.required,
        }),
        VariableNode::Variable(v) => VariableNode::Variable(LeafVariable {
            env: format!(
                "{}_{}_{}",
                prefix,
                parent.env_stem,
                naming::env_segment(&v.key)
            ),
            key: format!("{}_{}", parent.key, v.key),
            json: format!("{}.{}", parent.json, v.json),
            type_name: parent.typed(&v.type_name),
            description: v.description,
            required: v.required,
            nested: v.nested,
        }),
    }
}

/// Turn `child` into an array element field
pub(crate) fn element(declared: &DeclaredType<'_>, child: VariableNode) -> ElementField {
    let mut element = ElementField::from(child);
    element.type_name = declared.with_map(&element.type_name);
    element
}

/// Move `child` under a plugin's serialization path
pub(crate) fn plugin(json_prefix: &str, child: VariableNode) -> VariableNode {
    match child {
        VariableNode::Header(mut h) => {
            h.json = format!("{}.{}", json_prefix, h.json);
            VariableNode::Header(h)
        }
        VariableNode::Variable(mut v) => {
            v.json = format!("{}.{}", json_prefix, v.json);
            VariableNode::Variable(v)
        }
    }
}
