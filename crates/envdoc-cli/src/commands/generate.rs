use anyhow::bail;
use clap::Args;
use std::path::PathBuf;

use envdoc_config::parse_selectors;
use envdoc_logger as logger;

use crate::commands::Workspace;
use crate::driver::{self, OutputFormat};
use crate::GlobalOpts;

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
    /// Products to document, comma separated: `gateway,pump:release-1.8`
    pub selectors: String,
    /// Product catalog merged over the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Directory holding the product repositories
    #[arg(long)]
    pub source_root: Option<PathBuf>,
    /// Root directory for the generated documents
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::All)]
    pub format: OutputFormat,
    /// Read files from the working tree instead of the selected branch
    #[arg(long)]
    pub worktree: bool,
}

pub fn handle_generate(cmd: GenerateCommand, _opts: &GlobalOpts) -> anyhow::Result<()> {
    let selectors = parse_selectors(&cmd.selectors)?;
    if selectors.is_empty() {
        bail!("No products selected");
    }

    let mut workspace = Workspace::load(cmd.catalog.as_deref(), cmd.source_root)?;
    let output_root = cmd
        .output
        .unwrap_or_else(|| workspace.settings.output_dir());

    let mut failed = Vec::new();
    for selector in &selectors {
        logger::set_current_product(Some(selector.to_string()));
        logger::spinner_start(&format!("Documenting {}", selector));

        let result = driver::resolve_product(&workspace.catalog, selector)
            .cloned()
            .and_then(|spec| {
                let source = workspace.source_for(&spec, cmd.worktree)?;
                driver::generate_product(
                    &selector.name,
                    &spec,
                    &selector.branch,
                    source.as_ref(),
                    &output_root,
                    cmd.format,
                )
            });

        match result {
            Ok(paths) => {
                let listed: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                logger::spinner_success(&format!("{} -> {}", selector, listed.join(", ")));
            }
            Err(e) => {
                logger::spinner_error(&format!("{}: {}", selector, e));
                failed.push(selector.to_string());
            }
        }
    }
    logger::set_current_product(None);

    if !failed.is_empty() {
        bail!(
            "{} of {} products failed: {}",
            failed.len(),
            selectors.len(),
            failed.join(", ")
        );
    }
    Ok(())
}
