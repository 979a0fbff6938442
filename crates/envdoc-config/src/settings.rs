use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use which::which;

use crate::errors::ConfigError;

/// Environment variable overriding the settings file location
pub const CONFIG_ENV: &str = "ENVDOC_CONFIG";

/// Keys accepted by [`Settings::get`] and [`Settings::set`]
pub const KEYS: [&str; 4] = ["source-root", "output-dir", "catalog-path", "git-path"];

const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Directory holding the product repositories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Root directory for generated documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Product catalog merged over the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_path: Option<String>,
}

impl Settings {
    /// Directory for envdoc's settings and log file
    pub fn config_dir() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.unwrap_or_else(|| PathBuf::from(".")).join("envdoc")
    }

    pub fn path() -> PathBuf {
        // Explicit override for tests and isolated runs
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        // A pointer file next to the default location may redirect it
        if let Some(redirect) = Self::pointer_target() {
            return redirect;
        }

        Self::config_dir().join("envdoc.toml")
    }

    /// File whose content, when present, redirects the settings location
    pub fn pointer_path() -> PathBuf {
        Self::config_dir().join(".envdoc_config_path")
    }

    /// Location named by the pointer file, if any
    pub fn pointer_target() -> Option<PathBuf> {
        let contents = fs::read_to_string(Self::pointer_path()).ok()?;
        let trimmed = contents.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    /// Load settings from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "source-root" => self.source_root.clone(),
            "output-dir" => self.output_dir.clone(),
            "catalog-path" => self.catalog_path.clone(),
            "git-path" => self.git_path.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "source-root" => self.source_root = Some(value),
            "output-dir" => self.output_dir = Some(value),
            "catalog-path" => self.catalog_path = Some(value),
            "git-path" => self.git_path = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.source_root.is_none()
            && self.output_dir.is_none()
            && self.catalog_path.is_none()
            && self.git_path.is_none()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    /// Source root, defaulting to the current directory
    pub fn source_root(&self) -> PathBuf {
        self.source_root
            .as_deref()
            .map_or_else(|| PathBuf::from("."), PathBuf::from)
    }

    /// Output root, defaulting to `./output`
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog_path.as_deref().map(PathBuf::from)
    }

    /// Resolve the git executable, remembering it in the settings file
    pub fn ensure_git_path(&mut self) -> Result<String, ConfigError> {
        if let Some(ref path) = self.git_path {
            if Path::new(path).exists() {
                return Ok(path.clone());
            }
            self.git_path = None;
        }

        match which("git") {
            Ok(path) => {
                let path_str = path.to_string_lossy().trim().to_string();
                self.git_path = Some(path_str.clone());
                self.save()?;
                Ok(path_str)
            }
            Err(_) => Err(ConfigError::ToolNotFound("git".to_string())),
        }
    }
}
