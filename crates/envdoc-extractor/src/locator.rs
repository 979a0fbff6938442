//! Struct lookup within a source blob

use std::collections::HashMap;
use std::ops::Range;

use crate::patterns;

/// Struct declarations of one blob, keyed by struct name
///
/// Built with a single scan; when a name is declared twice the first
/// declaration wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructIndex {
    spans: HashMap<String, Range<usize>>,
}

impl StructIndex {
    pub fn build(text: &str) -> Self {
        let mut spans = HashMap::new();
        for (name, span) in declarations(text) {
            spans.entry(name.to_string()).or_insert(span);
        }
        Self { spans }
    }

    /// Byte range of the declaration of `name`, header to closing brace
    pub fn span(&self, name: &str) -> Option<Range<usize>> {
        self.spans.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.spans.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// Return the declaration of struct `name` in `blob`, header to closing brace
///
/// Names are matched exactly: looking up `Config` never returns `MyConfig`.
pub fn locate<'a>(name: &str, blob: &'a str) -> Option<&'a str> {
    if name.is_empty() {
        return None;
    }
    declarations(blob)
        .find(|(found, _)| *found == name)
        .and_then(|(_, span)| blob.get(span))
}

/// Whether `blob` declares a struct called `name`
pub fn is_declared(name: &str, blob: &str) -> bool {
    locate(name, blob).is_some()
}

fn declarations(text: &str) -> impl Iterator<Item = (&str, Range<usize>)> + '_ {
    patterns::STRUCT_HEADER
        .captures_iter(text)
        .filter_map(move |caps| {
            let header = caps.get(0)?;
            let name = caps.name("name")?;
            let end = declaration_end(text, header.end())?;
            Some((name.as_str(), header.start()..end))
        })
}

// A header without a column-zero closing brace declares nothing
fn declaration_end(text: &str, body: usize) -> Option<usize> {
    let rest = text.get(body..)?;
    if rest.starts_with('}') {
        return Some(body + 1);
    }
    rest.find("\n}").map(|offset| body + offset + 2)
}
