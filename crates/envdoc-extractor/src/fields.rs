//! Field resolution for a single struct span
//!
//! Runs two passes over the span: one for tagged fields, then one for untagged
//! fields over the remainder (tagged lines and the struct's opening and closing
//! lines masked out). Masking keeps byte offsets stable, so the result can be
//! ordered by where each field name appears in the span.

use regex::Captures;
use std::ops::Range;

use crate::naming;
use crate::patterns;

/// One field of a struct as written in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub description: Option<String>,
    /// Identifier; dotted when produced by nested struct inlining
    pub name: String,
    /// Declared type text, e.g. `*Config`, `[]Endpoint`, `map[string]string`
    pub raw_type: String,
    pub serialization_key: String,
    pub omit_empty: bool,
    /// Byte offset of the field name within its span
    pub source_order: usize,
}

impl FieldDescriptor {
    pub fn required(&self) -> bool {
        !self.omit_empty
    }
}

/// Resolve the fields declared in `span`, in source order
pub fn resolve_fields(span: &str) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();
    let mut remainder = span.to_string();

    for caps in patterns::FIELD_WITH_TAG.captures_iter(span) {
        if let Some(field) = descriptor_from(&caps) {
            fields.push(field);
        }
        if let Some(whole) = caps.get(0) {
            mask(&mut remainder, whole.range());
        }
    }

    // Opening and closing lines of the span are never fields
    match span.find('\n') {
        Some(end) => mask(&mut remainder, 0..end),
        None => mask(&mut remainder, 0..span.len()),
    }
    if let Some(start) = span.rfind('\n') {
        mask(&mut remainder, start + 1..span.len());
    }

    for caps in patterns::FIELD_WITHOUT_TAG.captures_iter(&remainder) {
        if let Some(field) = descriptor_from(&caps) {
            fields.push(field);
        }
    }

    fields.sort_by_key(|field| field.source_order);
    fields
}

fn descriptor_from(caps: &Captures<'_>) -> Option<FieldDescriptor> {
    let name = caps.name("name")?;
    let raw_type = caps.name("type")?;

    let serialization_key = caps.name("tag").map_or_else(
        || naming::default_serialization_key(name.as_str()),
        |tag| tag.as_str().to_string(),
    );

    Some(FieldDescriptor {
        description: caps
            .name("doc")
            .and_then(|doc| naming::reflow_description(doc.as_str())),
        name: name.as_str().to_string(),
        raw_type: raw_type.as_str().to_string(),
        serialization_key,
        omit_empty: caps.name("omitempty").is_some(),
        source_order: name.start(),
    })
}

// Overwrite with newlines; the length is unchanged so offsets stay valid
fn mask(text: &mut String, range: Range<usize>) {
    let filler = "\n".repeat(range.len());
    text.replace_range(range, &filler);
}
