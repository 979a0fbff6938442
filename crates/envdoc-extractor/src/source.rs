//! Source blobs and the dependency map
//!
//! A [`SourceBlob`] is the text of one source module, concatenated from its
//! files, together with a label used in log messages. Blobs are immutable and
//! cheap to clone so that the same dependency can be shared by every struct
//! that references it. Line endings are normalized to `\n` and the struct
//! declarations are indexed once when the blob is created.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::locator::StructIndex;
use crate::plugins::PluginModule;

/// Text of one source module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlob {
    name: Arc<str>,
    text: Arc<str>,
    structs: Arc<StructIndex>,
}

impl SourceBlob {
    pub fn new(name: impl Into<Arc<str>>, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text = if text.contains('\r') {
            Arc::from(text.replace("\r\n", "\n"))
        } else {
            text
        };
        Self {
            name: name.into(),
            structs: Arc::new(StructIndex::build(&text)),
            text,
        }
    }

    /// Label of the blob (usually the repository path it was read from)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Declaration of struct `name`, header to closing brace
    pub fn declaration(&self, name: &str) -> Option<&str> {
        self.structs.span(name).and_then(|span| self.text.get(span))
    }

    /// Whether this blob declares a struct called `name`
    pub fn declares(&self, name: &str) -> bool {
        self.structs.contains(name)
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

/// Dependency blobs keyed by the qualified type name that references them,
/// plus the ordered list of plugin modules
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    modules: HashMap<String, SourceBlob>,
    plugins: Vec<PluginModule>,
}

impl DependencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `blob` under the qualified type name `key` (e.g. `apidef.AuthConfig`)
    pub fn insert(&mut self, key: impl Into<String>, blob: SourceBlob) {
        let key = key.into();
        debug!("Registered dependency '{}' from {}", key, blob.name());
        self.modules.insert(key, blob);
    }

    pub fn get(&self, key: &str) -> Option<&SourceBlob> {
        self.modules.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.modules.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.plugins.is_empty()
    }

    /// Register a plugin module if `blob` carries a plugin declaration
    ///
    /// Returns `false` when the blob declares no plugin; such files are
    /// helpers of the plugin directory and are skipped.
    pub fn add_plugin_module(&mut self, blob: SourceBlob) -> bool {
        match PluginModule::discover(blob) {
            Some(module) => {
                debug!(
                    "Registered plugin '{}' ({}) from {}",
                    module.kind(),
                    module.struct_name(),
                    module.blob().name()
                );
                self.plugins.push(module);
                true
            }
            None => false,
        }
    }

    /// Plugin modules in registration order
    pub fn plugin_modules(&self) -> &[PluginModule] {
        &self.plugins
    }
}
