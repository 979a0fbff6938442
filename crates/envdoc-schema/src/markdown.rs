//! Markdown rendering of a flattened configuration surface

use crate::types::{ElementField, VariableNode};

/// Render nodes as a markdown document titled `title`
///
/// Headers become second-level sections, leaves become third-level entries
/// keyed by their JSON path with environment name, type and required flag
/// listed underneath. Array element fields are rendered as a table.
pub fn render(nodes: &[VariableNode], title: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n", title));

    for node in nodes {
        output.push('\n');
        match node {
            VariableNode::Header(header) => {
                output.push_str(&format!("## {}\n", header.json));
                if let Some(description) = &header.description {
                    output.push('\n');
                    output.push_str(description);
                    output.push('\n');
                }
            }
            VariableNode::Variable(variable) => {
                output.push_str(&format!("### {}\n", variable.json));
                output.push_str(&format!("ENV: <b>{}</b><br />\n", variable.env));
                output.push_str(&format!("Type: `{}`<br />\n", variable.type_name));
                output.push_str(&format!("Required: `{}`<br />\n", variable.required));
                if let Some(description) = &variable.description {
                    output.push('\n');
                    output.push_str(description);
                    output.push('\n');
                }
                if let Some(nested) = &variable.nested {
                    output.push('\n');
                    render_elements(&mut output, nested);
                }
            }
        }
    }

    output
}

fn render_elements(output: &mut String, elements: &[ElementField]) {
    output.push_str("| Key | JSON | Type | Required |\n");
    output.push_str("|---|---|---|---|\n");
    for element in elements {
        output.push_str(&format!(
            "| {} | {} | `{}` | {} |\n",
            element.key,
            element.json,
            escape_cell(&element.type_name),
            element.required
        ));
    }
}

// Pipes would split the table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
