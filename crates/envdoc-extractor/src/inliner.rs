//! Nested anonymous struct inlining
//!
//! An anonymous struct field such as
//!
//! ```text
//! Listen struct {
//!     Port int `json:"port"`
//! } `json:"listen"`
//! ```
//!
//! is rewritten into plain field lines with dotted names (`Listen.Port`) and,
//! when the closing brace carries a tag, dotted serialization keys
//! (`listen.port`). Blocks are rewritten innermost first, so arbitrarily deep
//! nesting collapses in one pass per block.

use std::ops::Range;
use tracing::{debug, warn};

use crate::errors::ExtractError;
use crate::fields::{resolve_fields, FieldDescriptor};
use crate::naming;
use crate::patterns;

/// How the synthesized fields of a nested block are tagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMode {
    /// The closing brace carried `json:"tag"`; inner keys become `tag.inner`
    Tagged { tag: String },
    /// No tag on the closing brace; synthesized lines carry none either
    Untagged,
}

#[derive(Debug)]
struct NestedBlock {
    name: String,
    indent: String,
    /// From the first doc line to the end of the closing line
    replaced: Range<usize>,
    /// From the header line to the end of the closing line
    body: Range<usize>,
    mode: TagMode,
}

/// Rewrite every nested anonymous struct in `span` into dotted field lines
pub fn inline_nested_structs(span: &str) -> Result<String, ExtractError> {
    let mut text = span.to_string();
    let mut remaining = patterns::NESTED_STRUCT.find_iter(&text).count();

    while remaining > 0 {
        let Some(block) = innermost_block(&text)? else {
            break;
        };

        let fields = resolve_fields(&text[block.body.clone()]);
        if fields.is_empty() {
            warn!("{}", ExtractError::NoFieldsFound(block.name.clone()));
        }
        debug!(
            "Inlining nested struct '{}' ({} fields, {:?})",
            block.name,
            fields.len(),
            block.mode
        );

        let replacement = synthesize(&block, &fields);
        text.replace_range(block.replaced.clone(), &replacement);

        let after = patterns::NESTED_STRUCT.find_iter(&text).count();
        if after >= remaining {
            return Err(ExtractError::NoProgress {
                stage: "Nested struct inlining",
                name: block.name,
            });
        }
        remaining = after;
    }

    Ok(text)
}

// The last header in the text cannot contain another header
fn innermost_block(text: &str) -> Result<Option<NestedBlock>, ExtractError> {
    let Some(caps) = patterns::NESTED_STRUCT.captures_iter(text).last() else {
        return Ok(None);
    };
    let (Some(whole), Some(indent), Some(name)) =
        (caps.get(0), caps.name("indent"), caps.name("name"))
    else {
        return Ok(None);
    };

    let closing = format!("\n{}}}", indent.as_str());
    let Some(offset) = text[whole.end()..].find(&closing) else {
        return Err(ExtractError::UnterminatedBlock(name.as_str().to_string()));
    };
    let close_start = whole.end() + offset + 1;
    let close_end = text[close_start..]
        .find('\n')
        .map_or(text.len(), |i| close_start + i);

    let after_brace = &text[close_start + indent.as_str().len() + 1..close_end];
    let mode = match patterns::NESTED_CLOSE_TAG.captures(after_brace) {
        Some(tag) => TagMode::Tagged {
            tag: tag["tag"].to_string(),
        },
        None => TagMode::Untagged,
    };

    Ok(Some(NestedBlock {
        name: name.as_str().to_string(),
        indent: indent.as_str().to_string(),
        replaced: whole.start()..close_end,
        body: indent.start()..close_end,
        mode,
    }))
}

fn synthesize(block: &NestedBlock, fields: &[FieldDescriptor]) -> String {
    let mut lines = String::new();
    for field in fields {
        if let Some(description) = &field.description {
            lines.push_str(&naming::comment_block(description, &block.indent));
        }
        lines.push_str(&format!(
            "{}{}.{} {}",
            block.indent, block.name, field.name, field.raw_type
        ));
        if let TagMode::Tagged { tag } = &block.mode {
            let omit = if field.omit_empty { ",omitempty" } else { "" };
            lines.push_str(&format!(
                " `json:\"{}.{}{}\"`",
                tag, field.serialization_key, omit
            ));
        }
        lines.push('\n');
    }
    // The replaced range stops before the closing line's newline
    lines.pop();
    lines
}
