//! Configuration schema extraction from struct declarations
//!
//! This crate turns the text of struct declarations into a flattened list of
//! configuration variables by:
//! 1. Locating the entry struct in a source blob
//! 2. Inlining anonymous nested structs into dotted field lines
//! 3. Expanding directive-marked fields from dependency blobs
//! 4. Resolving each field's name, type, serialization key and description
//! 5. Classifying field types and recursing into referenced structs
//! 6. Replaying plugin templates once per discovered plugin module
//!
//! Everything works on plain text with regular expressions; no parser for the
//! source language is involved. Missing structs or dependencies degrade to a
//! warning and an empty contribution rather than failing the run.

pub mod classifier;
mod compose;
pub mod errors;
pub mod extractor;
pub mod fields;
pub mod inliner;
pub mod locator;
pub mod naming;
pub mod patterns;
pub mod plugins;
pub mod source;

pub use classifier::{classify, split_map_declarator, DeclaredType, TypeAlias, TypeClass};
pub use errors::ExtractError;
pub use extractor::{extract, Extraction};
pub use fields::{resolve_fields, FieldDescriptor};
pub use inliner::{inline_nested_structs, TagMode};
pub use locator::{locate, StructIndex};
pub use plugins::{CommonPluginFields, PluginModule, PluginSettings, PLACEHOLDER};
pub use source::{DependencyMap, SourceBlob};
