use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use std::fs;

use envdoc_config::settings::KEYS;
use envdoc_config::{ConfigError, Settings};
use envdoc_logger as logger;

use crate::GlobalOpts;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    Show,
    Set {
        key: String,
        value: String,
    },
    /// Get or set the path to the settings file.
    /// If `new_path` is provided, later runs read settings from that file.
    /// If omitted, the CLI prints the current settings file path.
    Path {
        /// Optional new settings path to set
        new_path: Option<String>,
    },
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> anyhow::Result<()> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => show_settings(opts),
        ConfigAction::Set { key, value } => set_value(&key, value),
        ConfigAction::Path { new_path } => match new_path {
            Some(path) => set_path(&path),
            None => {
                show_path();
                Ok(())
            }
        },
    }
}

fn show_settings(opts: &GlobalOpts) -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load config")?;
    println!("{}", "Configuration:".bold().green());
    if settings.is_empty() {
        if opts.verbosity_level() > 0 {
            println!("  {}", "(empty)".yellow());
        }
    } else {
        for (key, value) in settings.values_iter() {
            println!("  {}: {}", key.cyan(), value);
        }
    }
    Ok(())
}

fn set_value(key: &str, value: String) -> anyhow::Result<()> {
    let mut settings = Settings::load().context("Failed to load config")?;
    match settings.set(key, value.clone()) {
        Ok(()) => {}
        Err(ConfigError::UnknownKey(key)) => anyhow::bail!(
            "Unknown config key: {}. Supported keys: {}",
            key,
            KEYS.join(", ")
        ),
        Err(e) => return Err(e.into()),
    }
    settings.save().context("Failed to save config")?;
    logger::success(&format!("Set {} = {}", key, value));
    Ok(())
}

fn set_path(new_path: &str) -> anyhow::Result<()> {
    let pointer_path = Settings::pointer_path();
    logger::debug(&format!("Writing pointer file {}", pointer_path.display()));

    if let Some(parent) = pointer_path.parent() {
        fs::create_dir_all(parent).context("Failed to set config path")?;
    }
    fs::write(&pointer_path, new_path.as_bytes()).context("Failed to set config path")?;

    logger::success(&format!("Config path set to {}", new_path));
    Ok(())
}

fn show_path() {
    let config_path = Settings::path();
    println!("{}", config_path.display());

    if let Some(target) = Settings::pointer_target() {
        println!("{} {}", "overridden-by".cyan(), target.display());
    }
}
