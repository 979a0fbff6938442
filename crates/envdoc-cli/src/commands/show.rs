use clap::Args;
use std::path::PathBuf;

use envdoc_config::ProductSelector;
use envdoc_logger as logger;
use envdoc_schema::to_json_string;

use crate::commands::Workspace;
use crate::driver;
use crate::GlobalOpts;

#[derive(Args, Debug, Clone)]
pub struct ShowCommand {
    /// Product to print: `name[:branch]`
    pub selector: ProductSelector,
    /// Product catalog merged over the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,
    /// Directory holding the product repositories
    #[arg(long)]
    pub source_root: Option<PathBuf>,
    /// Read files from the working tree instead of the selected branch
    #[arg(long)]
    pub worktree: bool,
}

/// Print the flattened variables of one product as JSON without writing files
pub fn handle_show(cmd: ShowCommand, _opts: &GlobalOpts) -> anyhow::Result<()> {
    let mut workspace = Workspace::load(cmd.catalog.as_deref(), cmd.source_root)?;
    let selector = cmd.selector;
    logger::set_current_product(Some(selector.to_string()));

    let spec = driver::resolve_product(&workspace.catalog, &selector)?.clone();
    let source = workspace.source_for(&spec, cmd.worktree)?;
    let nodes = driver::extract_product(&spec, &selector.branch, source.as_ref())?;

    print!("{}", to_json_string(&nodes)?);
    logger::set_current_product(None);
    Ok(())
}
