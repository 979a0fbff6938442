//! envdoc schema model
//!
//! This crate holds the output side of envdoc: the flattened [`VariableNode`]
//! list produced by the extractor, and the two renderers consuming it (pretty
//! JSON and markdown documentation).

pub mod errors;
pub mod markdown;
pub mod types;
pub mod writer;

pub use errors::SchemaError;
pub use types::{count_leaves, ElementField, HeaderNode, LeafVariable, VariableNode};
pub use writer::{read_json, to_json_string, write_json, write_markdown};
