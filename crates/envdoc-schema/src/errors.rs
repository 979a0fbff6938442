use std::io;
use thiserror::Error;

/// Errors that can occur while writing or reading flattened variables
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode variables as JSON: {0}")]
    Json(#[from] serde_json::Error),
}
