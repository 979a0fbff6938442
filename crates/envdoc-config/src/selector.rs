use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Branch used when a selector names none
pub const DEFAULT_BRANCH: &str = "master";

/// A product to document, optionally pinned to a branch: `gateway:release-5.3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSelector {
    pub name: String,
    pub branch: String,
}

impl FromStr for ProductSelector {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, branch) = match s.split_once(':') {
            Some((name, branch)) => (name.trim(), branch.trim()),
            None => (s.trim(), ""),
        };

        if name.is_empty() || branch.contains(':') {
            return Err(ConfigError::InvalidSelector(s.to_string()));
        }

        Ok(ProductSelector {
            name: name.to_string(),
            branch: if branch.is_empty() {
                DEFAULT_BRANCH.to_string()
            } else {
                branch.to_string()
            },
        })
    }
}

impl fmt::Display for ProductSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.branch)
    }
}

/// Parse a comma-separated selector list, e.g. `gateway,pump:develop`
pub fn parse_selectors(arg: &str) -> Result<Vec<ProductSelector>, ConfigError> {
    arg.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::parse)
        .collect()
}
