//! Writers for flattened variable lists
//!
//! JSON output is the pretty-printed node array (two-space indentation, no
//! trailing metadata) so that re-running an unchanged extraction produces a
//! byte-identical file.

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::SchemaError;
use crate::markdown;
use crate::types::{count_leaves, VariableNode};

/// Encode nodes as pretty JSON
pub fn to_json_string(nodes: &[VariableNode]) -> Result<String, SchemaError> {
    let mut json = serde_json::to_string_pretty(nodes)?;
    json.push('\n');
    Ok(json)
}

/// Write nodes as pretty JSON to `output_path`
pub fn write_json(nodes: &[VariableNode], output_path: &Path) -> Result<(), SchemaError> {
    debug!("Writing variables to: {:?}", output_path);

    ensure_parent(output_path)?;
    fs::write(output_path, to_json_string(nodes)?)?;

    info!(
        "Wrote {} variables ({} nodes) to {:?}",
        count_leaves(nodes),
        nodes.len(),
        output_path
    );
    Ok(())
}

/// Read nodes back from a JSON file written by [`write_json`]
pub fn read_json(input_path: &Path) -> Result<Vec<VariableNode>, SchemaError> {
    debug!("Reading variables from: {:?}", input_path);

    let content = fs::read_to_string(input_path)?;
    let nodes: Vec<VariableNode> = serde_json::from_str(&content)?;
    Ok(nodes)
}

/// Render nodes as markdown documentation and write them to `output_path`
pub fn write_markdown(
    nodes: &[VariableNode],
    title: &str,
    output_path: &Path,
) -> Result<(), SchemaError> {
    debug!("Writing markdown to: {:?}", output_path);

    ensure_parent(output_path)?;
    fs::write(output_path, markdown::render(nodes, title))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), SchemaError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
