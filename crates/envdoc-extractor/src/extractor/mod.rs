//! Recursive extraction of a struct tree into flattened variables
//!
//! For every struct reached, the pipeline is:
//! locate -> inline nested structs -> expand directives -> resolve fields -> classify
//!
//! Classification decides whether a field recurses (same-blob struct, slice of
//! struct, dependency struct) or becomes a leaf. One [`Extraction`] value
//! carries the per-run state: the recursion stack and the plugin templates.

mod expand;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tracing::{debug, info, warn};

use envdoc_schema::{count_leaves, LeafVariable, VariableNode};

use crate::classifier::{self, DeclaredType, TypeClass};
use crate::compose::{self, ParentNames};
use crate::errors::ExtractError;
use crate::fields::{self, FieldDescriptor};
use crate::inliner;
use crate::plugins::{CommonPluginFields, PluginSettings, PLACEHOLDER};
use crate::source::{DependencyMap, SourceBlob};

/// Result of classifying one field
#[derive(Debug, Clone)]
pub(crate) enum Resolved {
    Node(VariableNode),
    /// The plugin meta field of the collection's element struct
    PluginMeta(LeafVariable),
}

impl Resolved {
    fn into_node(self) -> VariableNode {
        match self {
            Resolved::Node(node) => node,
            Resolved::PluginMeta(leaf) => VariableNode::Variable(leaf),
        }
    }
}

/// One extraction run over a product's entry struct
pub struct Extraction<'a> {
    deps: &'a DependencyMap,
    root_prefix: String,
    plugins: Option<PluginSettings>,
    templates: CommonPluginFields,
    active: Vec<(Arc<str>, String)>,
}

impl<'a> Extraction<'a> {
    pub fn new(deps: &'a DependencyMap, prefix: impl Into<String>) -> Self {
        Self {
            deps,
            root_prefix: prefix.into(),
            plugins: None,
            templates: CommonPluginFields::default(),
            active: Vec::new(),
        }
    }

    /// Enable plugin collection expansion
    pub fn with_plugins(mut self, settings: PluginSettings) -> Self {
        self.plugins = Some(settings);
        self
    }

    /// Extract struct `entry` from `blob` into a flattened variable list
    pub fn run(mut self, entry: &str, blob: &SourceBlob) -> Result<Vec<VariableNode>, ExtractError> {
        info!(
            "Extracting '{}' from {} (prefix {})",
            entry,
            blob.name(),
            self.root_prefix
        );

        let prefix = self.root_prefix.clone();
        let nodes = self.extract_nodes(entry, blob, &prefix)?;

        if let Some(node) = nodes.iter().find(|node| node.mentions(PLACEHOLDER)) {
            return Err(ExtractError::ResidualPlaceholder(node.key().to_string()));
        }

        info!(
            "Extracted {} variables ({} nodes) from '{}'",
            count_leaves(&nodes),
            nodes.len(),
            entry
        );
        Ok(nodes)
    }

    pub(crate) fn extract_nodes(
        &mut self,
        name: &str,
        blob: &SourceBlob,
        prefix: &str,
    ) -> Result<Vec<VariableNode>, ExtractError> {
        Ok(self
            .extract_struct(name, blob, prefix)?
            .into_iter()
            .map(Resolved::into_node)
            .collect())
    }

    fn extract_struct(
        &mut self,
        name: &str,
        blob: &SourceBlob,
        prefix: &str,
    ) -> Result<Vec<Resolved>, ExtractError> {
        let Some(span) = blob.declaration(name) else {
            warn!(
                "{} in {}",
                ExtractError::StructNotFound(name.to_string()),
                blob.name()
            );
            return Ok(Vec::new());
        };

        let frame = (blob.name_arc(), name.to_string());
        if self.active.contains(&frame) {
            warn!(
                "Struct '{}' in {} refers to itself, not expanding it again",
                name,
                blob.name()
            );
            return Ok(Vec::new());
        }

        self.active.push(frame);
        let result = self.extract_span(name, span, blob, prefix);
        self.active.pop();
        result
    }

    fn extract_span(
        &mut self,
        name: &str,
        span: &str,
        blob: &SourceBlob,
        prefix: &str,
    ) -> Result<Vec<Resolved>, ExtractError> {
        debug!("Processing struct '{}' from {}", name, blob.name());

        let inlined = inliner::inline_nested_structs(span)?;
        let expanded = self.expand_directives(inlined, prefix)?;
        let fields = fields::resolve_fields(&expanded);
        if fields.is_empty() {
            warn!("{}", ExtractError::NoFieldsFound(name.to_string()));
            return Ok(Vec::new());
        }

        let mut resolved = Vec::new();
        for field in &fields {
            self.classify_field(field, blob, prefix, &mut resolved)?;
        }
        Ok(resolved)
    }

    fn classify_field(
        &mut self,
        field: &FieldDescriptor,
        blob: &SourceBlob,
        prefix: &str,
        out: &mut Vec<Resolved>,
    ) -> Result<(), ExtractError> {
        let deps = self.deps;
        let declared = classifier::split_map_declarator(&field.raw_type);

        match classifier::classify(&declared, blob, deps) {
            TypeClass::Struct { name } => {
                let children = self.extract_struct(&name, blob, prefix)?;
                self.push_struct(field, &declared, children, prefix, out)?;
            }
            TypeClass::SliceOfStruct { name } => {
                let elements = self
                    .extract_nodes(&name, blob, prefix)?
                    .into_iter()
                    .map(|child| compose::element(&declared, child))
                    .collect();
                let mut leaf = compose::leaf(field, prefix, declared.element.to_string());
                leaf.nested = Some(elements);
                out.push(Resolved::Node(VariableNode::Variable(leaf)));
            }
            TypeClass::External {
                blob: dependency,
                name,
            } => {
                debug!(
                    "Following '{}' into dependency {}",
                    field.raw_type,
                    dependency.name()
                );
                let children = self.extract_nodes(&name, dependency, prefix)?;
                let parent = ParentNames::new(field, &declared);
                out.push(Resolved::Node(compose::header(field, declared.element)));
                out.extend(
                    children
                        .into_iter()
                        .map(|child| Resolved::Node(compose::nested(&parent, prefix, child))),
                );
            }
            TypeClass::Scalar { type_name } => {
                let leaf = compose::leaf(field, prefix, type_name);
                if self.is_plugin_meta(field, prefix) {
                    debug!("Plugin meta field '{}' reached", field.name);
                    out.push(Resolved::PluginMeta(leaf));
                } else {
                    out.push(Resolved::Node(VariableNode::Variable(leaf)));
                }
            }
        }
        Ok(())
    }

    // Header plus composed children of a same-blob struct field
    fn push_struct(
        &mut self,
        field: &FieldDescriptor,
        declared: &DeclaredType<'_>,
        children: Vec<Resolved>,
        prefix: &str,
        out: &mut Vec<Resolved>,
    ) -> Result<(), ExtractError> {
        let parent = if self.is_collection_field(field, prefix) {
            debug!("Collecting plugin templates from '{}'", field.name);
            ParentNames::templated(field)
        } else {
            ParentNames::new(field, declared)
        };

        let mut nodes = Vec::with_capacity(children.len());
        let mut sentinel_at = None;
        for child in children {
            match child {
                Resolved::PluginMeta(_) => {
                    if sentinel_at.is_none() {
                        sentinel_at = Some(nodes.len());
                    }
                }
                Resolved::Node(child) => {
                    let composed = compose::nested(&parent, prefix, child);
                    if composed.mentions(PLACEHOLDER) {
                        self.templates.push(composed);
                    } else {
                        nodes.push(composed);
                    }
                }
            }
        }

        if let Some(position) = sentinel_at {
            let expanded = self.expand_plugins()?;
            nodes.splice(position..position, expanded);
        }

        out.push(Resolved::Node(compose::header(field, declared.element)));
        out.extend(nodes.into_iter().map(Resolved::Node));
        Ok(())
    }

    fn expand_plugins(&mut self) -> Result<Vec<VariableNode>, ExtractError> {
        let Some(settings) = self.plugins.clone() else {
            return Ok(Vec::new());
        };
        let deps = self.deps;

        let mut nodes = Vec::new();
        for module in deps.plugin_modules() {
            debug!(
                "Expanding plugin '{}' from {} ({} templates)",
                module.kind(),
                module.blob().name(),
                self.templates.len()
            );
            nodes.extend(self.templates.replay(module.kind()));

            let env_prefix = settings.env_prefix(&self.root_prefix, module.kind());
            let json_prefix = settings.json_prefix(module.kind());
            let own = self.extract_nodes(module.struct_name(), module.blob(), &env_prefix)?;
            nodes.extend(own.into_iter().map(|child| compose::plugin(&json_prefix, child)));
        }

        info!(
            "Expanded {} plugin modules into {} nodes",
            deps.plugin_modules().len(),
            nodes.len()
        );
        Ok(nodes)
    }

    fn is_collection_field(&self, field: &FieldDescriptor, prefix: &str) -> bool {
        prefix == self.root_prefix
            && self
                .plugins
                .as_ref()
                .is_some_and(|settings| settings.collection_field == field.name)
    }

    fn is_plugin_meta(&self, field: &FieldDescriptor, prefix: &str) -> bool {
        prefix == self.root_prefix
            && self
                .plugins
                .as_ref()
                .is_some_and(|settings| settings.is_meta_field(&field.name))
    }
}

/// Extract `entry` from `blob` without plugin expansion
pub fn extract(
    entry: &str,
    blob: &SourceBlob,
    prefix: &str,
    deps: &DependencyMap,
) -> Result<Vec<VariableNode>, ExtractError> {
    Extraction::new(deps, prefix).run(entry, blob)
}
