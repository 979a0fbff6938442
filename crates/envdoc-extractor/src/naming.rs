//! Naming utilities shared by the extraction stages
//!
//! Field identifiers, serialization keys and environment variable names are
//! all derived from one another:
//! - `Listen_Port` -> env segment `LISTEN_PORT`
//! - `max_conn` -> default serialization key `max.conn`
//! - `Pumps.{PLUGIN_NAME}` -> env segment `PUMPS_{PLUGIN_NAME}`

/// Convert a key to its environment variable segment
///
/// Upper-cases the key and turns dots into underscores.
pub fn env_segment(key: &str) -> String {
    key.to_uppercase().replace('.', "_")
}

/// Full environment variable name for `key` under `prefix`
pub fn env_name(prefix: &str, key: &str) -> String {
    format!("{}_{}", prefix, env_segment(key))
}

/// Serialization key used when a field carries no tag
///
/// Only the first underscore becomes a dot: `max_conn_idle` -> `max.conn_idle`.
pub fn default_serialization_key(name: &str) -> String {
    name.replacen('_', ".", 1)
}

/// Last dot-separated segment of a qualified type name
///
/// `apidef.AuthConfig` -> `AuthConfig`, `Config` -> `Config`
pub fn last_segment(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// Turn a captured comment block into a description
///
/// Strips leading tabs, the `//` marker and one following space from every
/// line. Returns `None` when nothing but whitespace remains.
pub fn reflow_description(doc: &str) -> Option<String> {
    let lines: Vec<&str> = doc
        .lines()
        .map(|line| {
            let line = line.trim_start_matches('\t');
            let line = line.strip_prefix("//").unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect();

    let description = lines.join("\n");
    if description.trim().is_empty() {
        None
    } else {
        Some(description)
    }
}

/// Render a description back into comment lines at `indent`
///
/// Inverse of [`reflow_description`]; every line ends with a newline.
pub fn comment_block(description: &str, indent: &str) -> String {
    let mut block = String::new();
    for line in description.lines() {
        if line.is_empty() {
            block.push_str(&format!("{}//\n", indent));
        } else {
            block.push_str(&format!("{}// {}\n", indent, line));
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_segment() {
        assert_eq!(env_segment("Listen_Port"), "LISTEN_PORT");
        assert_eq!(env_segment("Listen.Port"), "LISTEN_PORT");
        assert_eq!(env_segment("Pumps.{PLUGIN_NAME}"), "PUMPS_{PLUGIN_NAME}");
        assert_eq!(env_name("GW", "ListenPort"), "GW_LISTENPORT");
    }

    #[test]
    fn test_default_serialization_key_replaces_first_underscore() {
        assert_eq!(default_serialization_key("max_conn"), "max.conn");
        assert_eq!(default_serialization_key("max_conn_idle"), "max.conn_idle");
        assert_eq!(default_serialization_key("Port"), "Port");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("apidef.AuthConfig"), "AuthConfig");
        assert_eq!(last_segment("a.b.C"), "C");
        assert_eq!(last_segment("Config"), "Config");
    }

    #[test]
    fn test_reflow_description() {
        assert_eq!(
            reflow_description("\t// Port to bind.\n\t// Defaults to 8080\n"),
            Some("Port to bind.\nDefaults to 8080".to_string())
        );
        assert_eq!(
            reflow_description("\t\t//  indented\n"),
            Some(" indented".to_string())
        );
        assert_eq!(reflow_description(""), None);
        assert_eq!(reflow_description("\t//\n"), None);
    }

    #[test]
    fn test_comment_block_reflows_back() {
        let description = "First line\n\nThird line";
        let block = comment_block(description, "\t\t");
        assert_eq!(block, "\t\t// First line\n\t\t//\n\t\t// Third line\n");
        assert_eq!(reflow_description(&block).as_deref(), Some(description));
    }
}
