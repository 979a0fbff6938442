//! Error types for the envdoc driver

use std::io;
use thiserror::Error;

use envdoc_config::ConfigError;
use envdoc_extractor::ExtractError;
use envdoc_schema::SchemaError;

/// Errors that end the run of a single product
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("Failed to read '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("git {command} failed (exit {status:?}): {stderr}")]
    Git {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Failed to write documents: {0}")]
    Schema(#[from] SchemaError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown product '{name}'. Available products: {}", .available.join(", "))]
    UnknownProduct {
        name: String,
        available: Vec<String>,
    },
}
