//! Flattened configuration variable model
//!
//! A configuration surface is an ordered list of [`VariableNode`]s. A composite
//! field that was expanded into children is announced by a header node and
//! followed by those children; every other field is a leaf variable. Leaves of
//! array flavour carry their element fields in `nested`, without environment
//! names, since elements of one array share a single variable.

use serde::{Deserialize, Serialize};

// =============================================================================
// NODES
// =============================================================================

/// One entry of a flattened configuration surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flavour", rename_all = "lowercase")]
pub enum VariableNode {
    /// Start of a composite field; its children follow in declaration order
    Header(HeaderNode),
    /// A leaf configuration variable
    Variable(LeafVariable),
}

/// Marks the start of a composite field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub key: String,
    pub json: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
}

/// A leaf configuration variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub key: String,
    pub json: String,
    pub env: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    /// Element fields for array-typed leaves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Vec<ElementField>>,
}

/// A field of an array element. Not addressable by environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub key: String,
    pub json: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested: Option<Vec<ElementField>>,
}

impl VariableNode {
    pub fn key(&self) -> &str {
        match self {
            VariableNode::Header(h) => &h.key,
            VariableNode::Variable(v) => &v.key,
        }
    }

    pub fn json(&self) -> &str {
        match self {
            VariableNode::Header(h) => &h.json,
            VariableNode::Variable(v) => &v.json,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            VariableNode::Header(h) => &h.type_name,
            VariableNode::Variable(v) => &v.type_name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            VariableNode::Header(h) => h.description.as_deref(),
            VariableNode::Variable(v) => v.description.as_deref(),
        }
    }

    pub fn required(&self) -> bool {
        match self {
            VariableNode::Header(h) => h.required,
            VariableNode::Variable(v) => v.required,
        }
    }

    /// Environment variable name; headers have none
    pub fn env(&self) -> Option<&str> {
        match self {
            VariableNode::Header(_) => None,
            VariableNode::Variable(v) => Some(&v.env),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, VariableNode::Header(_))
    }

    /// Check whether `token` occurs in any of the node's names
    pub fn mentions(&self, token: &str) -> bool {
        self.key().contains(token)
            || self.json().contains(token)
            || self.env().is_some_and(|env| env.contains(token))
    }
}

impl From<VariableNode> for ElementField {
    fn from(node: VariableNode) -> Self {
        match node {
            VariableNode::Header(h) => ElementField {
                description: h.description,
                key: h.key,
                json: h.json,
                type_name: h.type_name,
                required: h.required,
                nested: None,
            },
            VariableNode::Variable(v) => ElementField {
                description: v.description,
                key: v.key,
                json: v.json,
                type_name: v.type_name,
                required: v.required,
                nested: v.nested,
            },
        }
    }
}

/// Number of leaf variables in a flattened surface
pub fn count_leaves(nodes: &[VariableNode]) -> usize {
    nodes.iter().filter(|n| !n.is_header()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str, env: &str) -> VariableNode {
        VariableNode::Variable(LeafVariable {
            description: None,
            key: key.to_string(),
            json: key.to_lowercase(),
            env: env.to_string(),
            type_name: "string".to_string(),
            required: true,
            nested: None,
        })
    }

    #[test]
    fn test_flavour_tag_serialization() -> Result<(), serde_json::Error> {
        let node = leaf("Port", "GW_PORT");
        let value = serde_json::to_value(&node)?;
        assert_eq!(value["flavour"], "variable");
        assert_eq!(value["env"], "GW_PORT");
        assert_eq!(value["type"], "string");
        assert!(value.get("nested").is_none());
        assert!(value.get("description").is_none());

        let header = VariableNode::Header(HeaderNode {
            description: Some("Listener".to_string()),
            key: "Listen".to_string(),
            json: "listen".to_string(),
            type_name: "ListenConfig".to_string(),
            required: false,
        });
        let value = serde_json::to_value(&header)?;
        assert_eq!(value["flavour"], "header");
        assert!(value.get("env").is_none());
        Ok(())
    }

    #[test]
    fn test_deserialize_tagged_nodes() -> Result<(), serde_json::Error> {
        let raw = r#"[
            {"flavour": "header", "key": "Listen", "json": "listen", "type": "ListenConfig", "required": true},
            {"flavour": "variable", "key": "Listen_Port", "json": "listen.port", "env": "GW_LISTEN_PORT", "type": "int", "required": true}
        ]"#;
        let nodes: Vec<VariableNode> = serde_json::from_str(raw)?;
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].is_header());
        assert_eq!(nodes[1].env(), Some("GW_LISTEN_PORT"));
        assert_eq!(count_leaves(&nodes), 1);
        Ok(())
    }

    #[test]
    fn test_mentions_checks_all_names() {
        let node = leaf("Pumps.{X}_Name", "TYK_PMP_PUMPS_{X}_NAME");
        assert!(node.mentions("{X}"));
        assert!(!leaf("Name", "TYK_PMP_NAME").mentions("{X}"));
    }

    #[test]
    fn test_element_from_header_drops_flavour() {
        let header = VariableNode::Header(HeaderNode {
            description: None,
            key: "TLS".to_string(),
            json: "tls".to_string(),
            type_name: "TLSConfig".to_string(),
            required: true,
        });
        let element = ElementField::from(header);
        assert_eq!(element.key, "TLS");
        assert!(element.nested.is_none());
    }
}
