use colored::Colorize;
use std::path::Path;

use crate::commands::Workspace;
use crate::GlobalOpts;

pub fn list_products(opts: &GlobalOpts, catalog_path: Option<&Path>) -> anyhow::Result<()> {
    let workspace = Workspace::load(catalog_path, None)?;
    let catalog = &workspace.catalog;

    if catalog.is_empty() {
        println!("No products configured.");
        return Ok(());
    }

    println!("{}", "Products:".bold().green());
    for (name, spec) in catalog.iter() {
        println!(
            "  {} {} {}",
            name.bold().blue(),
            spec.prefix.cyan(),
            format!("({} in {})", spec.entrypoint.struct_name, spec.entrypoint.path).dimmed()
        );
        if opts.verbosity_level() > 0 {
            println!("    repository: {}", spec.repository);
            for (key, path) in &spec.dependencies {
                println!("    {} -> {}", key, path);
            }
            if let Some(plugins) = &spec.plugins {
                println!(
                    "    plugins: {}/ ({})",
                    plugins.directory, plugins.collection_field
                );
            }
        }
    }
    Ok(())
}
