//! Settings and product catalog for envdoc
//!
//! - [`Settings`]: user settings stored as TOML under `~/.config/envdoc/`
//! - [`Catalog`]: the products envdoc knows how to document
//! - [`ProductSelector`]: `name[:branch]` selection of a product

pub mod catalog;
pub mod errors;
pub mod selector;
pub mod settings;

pub use catalog::{Catalog, Entrypoint, OutputSpec, PluginDiscovery, ProductSpec};
pub use errors::ConfigError;
pub use selector::{parse_selectors, ProductSelector, DEFAULT_BRANCH};
pub use settings::{Settings, CONFIG_ENV};
