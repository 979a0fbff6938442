use std::path::PathBuf;

/// Error type for settings and catalog handling
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing a file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A TOML document could not be parsed
    Parse { origin: String, message: String },
    /// Settings could not be encoded as TOML
    Serialize(String),
    /// Settings key not recognized
    UnknownKey(String),
    /// A product selector could not be parsed
    InvalidSelector(String),
    /// A required executable is not on PATH
    ToolNotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path.display(), source)
            }
            ConfigError::Parse { origin, message } => {
                write!(f, "Failed to parse {}: {}", origin, message)
            }
            ConfigError::Serialize(msg) => write!(f, "Failed to serialize settings: {}", msg),
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown settings key '{}' (expected one of: {})",
                key,
                crate::settings::KEYS.join(", ")
            ),
            ConfigError::InvalidSelector(selector) => {
                write!(f, "Invalid product selector '{}', expected name[:branch]", selector)
            }
            ConfigError::ToolNotFound(tool) => write!(f, "{} is not installed or not on PATH", tool),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
