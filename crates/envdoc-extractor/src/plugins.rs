//! Plugin collection expansion
//!
//! A product may declare a collection field (e.g. `Pumps`) whose entries are
//! configured per plugin kind. Fields of the collection's element struct are
//! composed with [`PLACEHOLDER`] standing for the plugin name and kept aside as
//! templates. When the element struct's meta field is reached, every plugin
//! module replays the templates with its own kind substituted and then
//! contributes the fields of its own configuration struct.

use envdoc_schema::VariableNode;

use crate::naming;
use crate::patterns;
use crate::source::SourceBlob;

/// Stand-in for the plugin name in templated keys, paths and env names
pub const PLACEHOLDER: &str = "{PLUGIN_NAME}";

/// Names tying the plugin collection to the root struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSettings {
    /// Root-level field holding the plugin collection
    pub collection_field: String,
    /// Field of the collection's element struct that holds plugin config
    pub meta_field: String,
    /// First serialization path segment of plugin config fields
    pub serialization_root: String,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            collection_field: "Pumps".to_string(),
            meta_field: "Meta".to_string(),
            serialization_root: "pumps".to_string(),
        }
    }
}

impl PluginSettings {
    pub fn is_meta_field(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.meta_field)
    }

    /// Env prefix of plugin `kind`'s own fields, e.g. `TYK_PMP_PUMPS_KAFKA_META`
    pub fn env_prefix(&self, root_prefix: &str, kind: &str) -> String {
        format!(
            "{}_{}_{}_{}",
            root_prefix,
            naming::env_segment(&self.collection_field),
            kind.to_uppercase(),
            naming::env_segment(&self.meta_field)
        )
    }

    /// Serialization path prefix of plugin `kind`'s fields, e.g. `pumps.kafka.meta`
    pub fn json_prefix(&self, kind: &str) -> String {
        format!(
            "{}.{}.{}",
            self.serialization_root,
            kind.to_lowercase(),
            self.meta_field.to_lowercase()
        )
    }
}

/// A plugin configuration module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginModule {
    kind: String,
    struct_name: String,
    blob: SourceBlob,
}

impl PluginModule {
    /// Read the plugin declaration out of `blob`, if it has one
    pub fn discover(blob: SourceBlob) -> Option<Self> {
        let caps = patterns::PLUGIN_DECLARATION.captures(blob.text())?;
        let kind = caps.name("kind")?.as_str().to_string();
        let struct_name = caps.name("name")?.as_str().to_string();
        Some(Self {
            kind,
            struct_name,
            blob,
        })
    }

    /// Plugin kind as declared, e.g. `Kafka`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn struct_name(&self) -> &str {
        &self.struct_name
    }

    pub fn blob(&self) -> &SourceBlob {
        &self.blob
    }
}

/// Templated nodes shared by every plugin kind
#[derive(Debug, Clone, Default)]
pub struct CommonPluginFields {
    templates: Vec<VariableNode>,
}

impl CommonPluginFields {
    pub fn push(&mut self, template: VariableNode) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Instantiate every template for plugin `kind`
    ///
    /// The key takes the kind as declared, the env name its upper-case form
    /// and the serialization path its lower-case form.
    pub fn replay(&self, kind: &str) -> Vec<VariableNode> {
        let upper = kind.to_uppercase();
        let lower = kind.to_lowercase();
        self.templates
            .iter()
            .cloned()
            .map(|template| match template {
                VariableNode::Header(mut header) => {
                    header.key = header.key.replace(PLACEHOLDER, kind);
                    header.json = header.json.replace(PLACEHOLDER, &lower);
                    VariableNode::Header(header)
                }
                VariableNode::Variable(mut leaf) => {
                    leaf.key = leaf.key.replace(PLACEHOLDER, kind);
                    leaf.env = leaf.env.replace(PLACEHOLDER, &upper);
                    leaf.json = leaf.json.replace(PLACEHOLDER, &lower);
                    VariableNode::Variable(leaf)
                }
            })
            .collect()
    }
}
