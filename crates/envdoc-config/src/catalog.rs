//! Product catalog
//!
//! Each product names the entry struct to document, the environment variable
//! prefix, the dependency files referenced from the entry struct, where its
//! documents are written and, for products with a plugin collection, where the
//! plugin modules live. A built-in catalog ships with the crate; a user file
//! can add products or replace built-in ones by name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;

const BUILTIN_CATALOG: &str = include_str!("../defaults/products.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    products: BTreeMap<String, ProductSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSpec {
    /// Environment variable prefix, e.g. `TYK_GW`
    pub prefix: String,
    /// Repository directory relative to the source root
    pub repository: String,
    pub entrypoint: Entrypoint,
    /// Qualified type name -> file path within the repository
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    pub output: OutputSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginDiscovery>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub path: String,
    #[serde(rename = "struct")]
    pub struct_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Directory stem; the branch name is appended to it
    pub dir: String,
    /// File stem for the `.json` and `.md` documents
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PluginDiscovery {
    /// Directory scanned for plugin modules, relative to the repository
    pub directory: String,
    #[serde(default = "default_collection_field")]
    pub collection_field: String,
    #[serde(default = "default_meta_field")]
    pub meta_field: String,
    #[serde(default = "default_serialization_root")]
    pub serialization_root: String,
}

fn default_collection_field() -> String {
    "Pumps".to_string()
}

fn default_meta_field() -> String {
    "Meta".to_string()
}

fn default_serialization_root() -> String {
    "pumps".to_string()
}

impl Catalog {
    /// The catalog shipped with envdoc
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(BUILTIN_CATALOG, "built-in catalog")
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Built-in catalog with the products of `user_file` merged over it
    pub fn load(user_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut catalog = Self::builtin()?;
        if let Some(path) = user_file {
            catalog.merge(Self::load_file(path)?);
        }
        Ok(catalog)
    }

    /// Add `other`'s products, replacing products with the same name
    pub fn merge(&mut self, other: Catalog) {
        self.products.extend(other.products);
    }

    pub fn get(&self, name: &str) -> Option<&ProductSpec> {
        self.products.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.products.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProductSpec)> {
        self.products.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl ProductSpec {
    /// Directory receiving this product's documents for `branch`
    pub fn output_dir(&self, output_root: &Path, branch: &str) -> PathBuf {
        output_root.join(format!("{}{}", self.output.dir, branch))
    }

    pub fn json_path(&self, output_root: &Path, branch: &str) -> PathBuf {
        self.output_dir(output_root, branch)
            .join(format!("{}.json", self.output.file))
    }

    pub fn markdown_path(&self, output_root: &Path, branch: &str) -> PathBuf {
        self.output_dir(output_root, branch)
            .join(format!("{}.md", self.output.file))
    }

    /// Markdown title, falling back to the product name
    pub fn title(&self, name: &str) -> String {
        self.output
            .title
            .clone()
            .unwrap_or_else(|| format!("{} configuration", name))
    }
}
