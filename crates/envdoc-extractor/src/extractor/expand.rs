//! Expand directives
//!
//! A field line preceded by the expand marker comment is replaced by the leaf
//! variables of the referenced dependency struct, written back as tagged field
//! lines so that the field resolver picks them up as if declared in place.

use tracing::{debug, warn};

use envdoc_schema::VariableNode;

use super::Extraction;
use crate::errors::ExtractError;
use crate::naming;
use crate::patterns;

impl Extraction<'_> {
    /// Replace every expand directive in `span` with the referenced fields
    pub(crate) fn expand_directives(
        &mut self,
        span: String,
        prefix: &str,
    ) -> Result<String, ExtractError> {
        let mut text = span;
        let mut remaining = patterns::EXPAND_DIRECTIVE.find_iter(&text).count();

        while remaining > 0 {
            let Some((range, target)) = patterns::EXPAND_DIRECTIVE
                .captures(&text)
                .and_then(|caps| Some((caps.get(0)?.range(), caps.name("target")?.as_str().to_string())))
            else {
                break;
            };

            let deps = self.deps;
            let replacement = match deps.get(&target) {
                Some(dependency) => {
                    debug!("Expanding '{}' from {}", target, dependency.name());
                    let nodes =
                        self.extract_nodes(naming::last_segment(&target), dependency, prefix)?;
                    field_lines(&nodes)
                }
                None => {
                    warn!("{}", ExtractError::UnresolvedDependency(target.clone()));
                    String::new()
                }
            };
            text.replace_range(range, &replacement);

            let after = patterns::EXPAND_DIRECTIVE.find_iter(&text).count();
            if after >= remaining {
                return Err(ExtractError::NoProgress {
                    stage: "Directive expansion",
                    name: target,
                });
            }
            remaining = after;
        }

        Ok(text)
    }
}

// Headers are skipped; their leaves already carry the composed names
fn field_lines(nodes: &[VariableNode]) -> String {
    let mut lines = String::new();
    for node in nodes {
        let VariableNode::Variable(leaf) = node else {
            continue;
        };
        if let Some(description) = &leaf.description {
            lines.push_str(&naming::comment_block(description, "\t"));
        }
        let omit = if leaf.required { "" } else { ",omitempty" };
        lines.push_str(&format!(
            "\t{} {} `json:\"{}{}\"`\n",
            leaf.key, leaf.type_name, leaf.json, omit
        ));
    }
    lines
}
