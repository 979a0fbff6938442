//! Where product source files come from
//!
//! [`GitSource`] reads files as committed on a branch of a local clone, so
//! several branches can be documented without checking them out.
//! [`WorktreeSource`] reads whatever is on disk and ignores the branch.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::DriverError;
use envdoc_logger as logger;

const MODULE_EXTENSION: &str = ".go";
const TEST_SUFFIX: &str = "_test.go";

/// Read access to one product repository
pub trait SourceProvider: Send + Sync {
    /// Text of `path` (relative to the repository) on `branch`
    fn fetch_source(&self, path: &str, branch: &str) -> Result<String, DriverError>;

    /// Module files directly inside `directory` on `branch`, as repository
    /// relative paths in name order
    fn list_plugin_modules(&self, directory: &str, branch: &str)
        -> Result<Vec<String>, DriverError>;
}

fn is_module_file(name: &str) -> bool {
    name.ends_with(MODULE_EXTENSION) && !name.ends_with(TEST_SUFFIX)
}

/// Files from a branch of a local git clone
#[derive(Debug, Clone)]
pub struct GitSource {
    git: String,
    repository: PathBuf,
}

impl GitSource {
    pub fn new(git: impl Into<String>, repository: impl Into<PathBuf>) -> Self {
        Self {
            git: git.into(),
            repository: repository.into(),
        }
    }

    pub fn repository(&self) -> &Path {
        &self.repository
    }

    fn run(&self, args: &[&str]) -> Result<String, DriverError> {
        let command = args.join(" ");
        logger::step(&format!(
            "Running: {} -C {} {}",
            self.git,
            self.repository.display(),
            command
        ));

        let output = Command::new(&self.git)
            .arg("-C")
            .arg(&self.repository)
            .args(args)
            .output()
            .map_err(|source| DriverError::Source {
                path: self.repository.display().to_string(),
                source,
            })?;

        logger::capture_output(&format!("git {}", command), &output);

        if !output.status.success() {
            return Err(DriverError::Git {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SourceProvider for GitSource {
    fn fetch_source(&self, path: &str, branch: &str) -> Result<String, DriverError> {
        self.run(&["show", &format!("{}:{}", branch, path)])
    }

    fn list_plugin_modules(
        &self,
        directory: &str,
        branch: &str,
    ) -> Result<Vec<String>, DriverError> {
        let directory = format!("{}/", directory.trim_end_matches('/'));
        let listing = self.run(&["ls-tree", "--name-only", branch, &directory])?;

        let mut modules: Vec<String> = listing
            .lines()
            .map(str::trim)
            .filter(|line| is_module_file(line))
            .map(str::to_string)
            .collect();
        modules.sort();
        Ok(modules)
    }
}

/// Files as they are on disk
#[derive(Debug, Clone)]
pub struct WorktreeSource {
    root: PathBuf,
}

impl WorktreeSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SourceProvider for WorktreeSource {
    fn fetch_source(&self, path: &str, branch: &str) -> Result<String, DriverError> {
        debug!(
            "Reading {} from the working tree, branch '{}' ignored",
            path, branch
        );
        let full_path = self.root.join(path);
        fs::read_to_string(&full_path).map_err(|source| DriverError::Source {
            path: full_path.display().to_string(),
            source,
        })
    }

    fn list_plugin_modules(
        &self,
        directory: &str,
        branch: &str,
    ) -> Result<Vec<String>, DriverError> {
        debug!(
            "Listing {} in the working tree, branch '{}' ignored",
            directory, branch
        );
        let directory = directory.trim_end_matches('/');
        let full_path = self.root.join(directory);
        if !full_path.is_dir() {
            return Err(DriverError::Source {
                path: full_path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let modules = WalkDir::new(&full_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| is_module_file(name))
            .map(|name| format!("{}/{}", directory, name))
            .collect();
        Ok(modules)
    }
}
