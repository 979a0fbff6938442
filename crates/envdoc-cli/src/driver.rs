//! Per-product extraction runs
//!
//! A run fetches the product's entry file, its dependency files and plugin
//! modules through a [`SourceProvider`], hands them to the extractor and
//! writes the resulting documents. Missing dependencies and plugin modules
//! only cost their own variables; a missing entry file fails the product.

use clap::ValueEnum;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use envdoc_config::{Catalog, PluginDiscovery, ProductSelector, ProductSpec};
use envdoc_extractor::{DependencyMap, Extraction, PluginSettings, SourceBlob};
use envdoc_logger as logger;
use envdoc_schema::{count_leaves, write_json, write_markdown, VariableNode};

use crate::errors::DriverError;
use crate::sources::SourceProvider;

/// Documents written by `generate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    #[default]
    All,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::All)
    }

    fn markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::All)
    }
}

/// Look the selected product up, listing the known ones when it is missing
pub fn resolve_product<'c>(
    catalog: &'c Catalog,
    selector: &ProductSelector,
) -> Result<&'c ProductSpec, DriverError> {
    catalog
        .get(&selector.name)
        .ok_or_else(|| DriverError::UnknownProduct {
            name: selector.name.clone(),
            available: catalog.names().into_iter().map(str::to_string).collect(),
        })
}

pub fn plugin_settings(discovery: &PluginDiscovery) -> PluginSettings {
    PluginSettings {
        collection_field: discovery.collection_field.clone(),
        meta_field: discovery.meta_field.clone(),
        serialization_root: discovery.serialization_root.clone(),
    }
}

/// Fetch every dependency file and plugin module of `spec` on `branch`
///
/// Fetches run in parallel; failures are reported and skipped.
pub fn load_dependencies(
    spec: &ProductSpec,
    branch: &str,
    source: &dyn SourceProvider,
) -> DependencyMap {
    let mut deps = DependencyMap::new();

    let fetched: Vec<_> = spec
        .dependencies
        .par_iter()
        .map(|(key, path)| (key, path, source.fetch_source(path, branch)))
        .collect();

    for (key, path, result) in fetched {
        match result {
            Ok(text) => {
                logger::debug(&format!("Loaded dependency {} from {}", key, path));
                deps.insert(key.clone(), SourceBlob::new(path.as_str(), text));
            }
            Err(e) => logger::warn(&format!("Skipping dependency {}: {}", key, e)),
        }
    }

    if let Some(discovery) = &spec.plugins {
        load_plugin_modules(&mut deps, discovery, branch, source);
    }

    deps
}

fn load_plugin_modules(
    deps: &mut DependencyMap,
    discovery: &PluginDiscovery,
    branch: &str,
    source: &dyn SourceProvider,
) {
    let paths = match source.list_plugin_modules(&discovery.directory, branch) {
        Ok(paths) => paths,
        Err(e) => {
            logger::warn(&format!(
                "Could not list plugin modules in {}: {}",
                discovery.directory, e
            ));
            return;
        }
    };

    let fetched: Vec<_> = paths
        .par_iter()
        .map(|path| (path, source.fetch_source(path, branch)))
        .collect();

    for (path, result) in fetched {
        match result {
            Ok(text) => {
                if deps.add_plugin_module(SourceBlob::new(path.as_str(), text)) {
                    logger::debug(&format!("Found plugin module {}", path));
                } else {
                    logger::step(&format!("{} declares no plugin config", path));
                }
            }
            Err(e) => logger::warn(&format!("Skipping plugin module {}: {}", path, e)),
        }
    }

    logger::info(&format!(
        "{} plugin modules in {}",
        deps.plugin_modules().len(),
        discovery.directory
    ));
}

/// Flatten the entry struct of `spec` as found on `branch`
pub fn extract_product(
    spec: &ProductSpec,
    branch: &str,
    source: &dyn SourceProvider,
) -> Result<Vec<VariableNode>, DriverError> {
    let entry_path = spec.entrypoint.path.as_str();
    let entry = SourceBlob::new(entry_path, source.fetch_source(entry_path, branch)?);
    let deps = load_dependencies(spec, branch, source);

    let mut extraction = Extraction::new(&deps, spec.prefix.as_str());
    if let Some(discovery) = &spec.plugins {
        extraction = extraction.with_plugins(plugin_settings(discovery));
    }

    Ok(extraction.run(&spec.entrypoint.struct_name, &entry)?)
}

/// Write the documents of one product, returning the paths written
pub fn write_documents(
    nodes: &[VariableNode],
    name: &str,
    spec: &ProductSpec,
    output_root: &Path,
    branch: &str,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, DriverError> {
    let mut written = Vec::new();

    if format.json() {
        let path = spec.json_path(output_root, branch);
        write_json(nodes, &path)?;
        written.push(path);
    }

    if format.markdown() {
        let path = spec.markdown_path(output_root, branch);
        write_markdown(nodes, &spec.title(name), &path)?;
        written.push(path);
    }

    Ok(written)
}

/// Extract and write one product
pub fn generate_product(
    name: &str,
    spec: &ProductSpec,
    branch: &str,
    source: &dyn SourceProvider,
    output_root: &Path,
    format: OutputFormat,
) -> Result<Vec<PathBuf>, DriverError> {
    let nodes = extract_product(spec, branch, source)?;
    logger::info(&format!(
        "{}:{} has {} variables",
        name,
        branch,
        count_leaves(&nodes)
    ));
    write_documents(&nodes, name, spec, output_root, branch, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory repository keyed by path
    struct MemorySource {
        files: HashMap<&'static str, &'static str>,
    }

    impl SourceProvider for MemorySource {
        fn fetch_source(&self, path: &str, _branch: &str) -> Result<String, DriverError> {
            self.files
                .get(path)
                .map(|text| (*text).to_string())
                .ok_or_else(|| DriverError::Source {
                    path: path.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
        }

        fn list_plugin_modules(
            &self,
            directory: &str,
            _branch: &str,
        ) -> Result<Vec<String>, DriverError> {
            let mut paths: Vec<String> = self
                .files
                .keys()
                .filter(|path| path.starts_with(directory))
                .map(|path| (*path).to_string())
                .collect();
            paths.sort();
            Ok(paths)
        }
    }

    const CATALOG: &str = r#"
[products.gw]
prefix = "GW"
repository = "gw"

[products.gw.entrypoint]
path = "config.go"
struct = "Config"

[products.gw.dependencies]
"auth.Settings" = "auth/settings.go"
"cache.Settings" = "cache/settings.go"

[products.gw.output]
dir = "gw/"
file = "gw"
"#;

    const CONFIG: &str = "type Config struct {
\t// Port to listen on
\tPort int `json:\"port\"`
\tAuth auth.Settings `json:\"auth\"`
\tCache cache.Settings `json:\"cache\"`
}
";

    const AUTH: &str = "type Settings struct {
\tSecret string `json:\"secret\"`
}
";

    fn catalog() -> Result<Catalog, DriverError> {
        Ok(Catalog::from_toml_str(CATALOG, "test")?)
    }

    #[test]
    fn test_unknown_product() -> Result<(), DriverError> {
        let catalog = catalog()?;
        let selector: ProductSelector = "dashboard".parse()?;
        let result = resolve_product(&catalog, &selector);
        assert!(matches!(
            result,
            Err(DriverError::UnknownProduct { ref available, .. }) if available == &vec!["gw".to_string()]
        ));
        Ok(())
    }

    #[test]
    fn test_missing_dependency_is_skipped() -> Result<(), DriverError> {
        let catalog = catalog()?;
        let selector: ProductSelector = "gw".parse()?;
        let spec = resolve_product(&catalog, &selector)?;
        let source = MemorySource {
            files: HashMap::from([("config.go", CONFIG), ("auth/settings.go", AUTH)]),
        };

        let deps = load_dependencies(spec, "master", &source);
        assert_eq!(deps.len(), 1);
        assert!(deps.contains("auth.Settings"));

        let nodes = extract_product(spec, "master", &source)?;
        let envs: Vec<Option<&str>> = nodes.iter().map(VariableNode::env).collect();
        assert_eq!(
            envs,
            vec![Some("GW_PORT"), None, Some("GW_AUTH_SECRET"), Some("GW_CACHE")]
        );
        assert_eq!(nodes[3].type_name(), "cache.Settings");
        Ok(())
    }

    #[test]
    fn test_missing_entry_file_fails() -> Result<(), DriverError> {
        let catalog = catalog()?;
        let selector: ProductSelector = "gw".parse()?;
        let spec = resolve_product(&catalog, &selector)?;
        let source = MemorySource {
            files: HashMap::new(),
        };
        assert!(matches!(
            extract_product(spec, "master", &source),
            Err(DriverError::Source { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_output_format_selection() {
        assert!(OutputFormat::All.json() && OutputFormat::All.markdown());
        assert!(OutputFormat::Json.json() && !OutputFormat::Json.markdown());
        assert!(!OutputFormat::Markdown.json() && OutputFormat::Markdown.markdown());
    }
}
