use std::path::{Path, PathBuf};

use envdoc_config::{Catalog, ProductSpec, Settings};
use envdoc_logger as logger;

use crate::errors::DriverError;
use crate::sources::{GitSource, SourceProvider, WorktreeSource};

pub mod config;
pub mod generate;
pub mod list;
pub mod show;

/// Settings and catalog resolved for one invocation
pub struct Workspace {
    pub settings: Settings,
    pub catalog: Catalog,
    pub source_root: PathBuf,
}

impl Workspace {
    /// Load settings and the catalog; command line paths win over settings
    pub fn load(
        catalog_path: Option<&Path>,
        source_root: Option<PathBuf>,
    ) -> Result<Self, DriverError> {
        let settings = Settings::load()?;
        let catalog_path = catalog_path
            .map(Path::to_path_buf)
            .or_else(|| settings.catalog_path());
        if let Some(path) = &catalog_path {
            logger::debug(&format!("Merging catalog from {}", path.display()));
        }
        let catalog = Catalog::load(catalog_path.as_deref())?;
        let source_root = source_root.unwrap_or_else(|| settings.source_root());

        Ok(Self {
            settings,
            catalog,
            source_root,
        })
    }

    /// Source reader for `spec`'s repository
    pub fn source_for(
        &mut self,
        spec: &ProductSpec,
        worktree: bool,
    ) -> Result<Box<dyn SourceProvider>, DriverError> {
        let repository = self.source_root.join(&spec.repository);
        if worktree {
            return Ok(Box::new(WorktreeSource::new(repository)));
        }
        let git = self.settings.ensure_git_path()?;
        Ok(Box::new(GitSource::new(git, repository)))
    }
}
