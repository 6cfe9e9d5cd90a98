//! `issue-flow config` command - Configuration inspection

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{load_config, print_record};
use crate::cli::GlobalOpts;
use crate::core::{Config, Store};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show paths to the config file and database
    Path,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;

    if print_record(&config, global.format)? {
        return Ok(());
    }

    let settings = &config.settings;
    println!("{}", style("Configuration").bold());
    println!("{}", style("─".repeat(40)).dim());
    println!("  database:         {}", display_database(global, &config)?);
    println!("  editor:           {}", settings.editor);
    println!("  opencode_enabled: {}", settings.opencode_enabled);
    println!(
        "  worktree_base:    {}",
        settings
            .worktree_base
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  verbose:          {}", settings.verbose || global.verbose);

    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let config_path = global.config.clone().or_else(Config::default_path);

    match config_path {
        Some(path) => {
            let marker = if path.exists() {
                style("(exists)").green()
            } else {
                style("(not created)").dim()
            };
            println!("Config:   {} {}", path.display(), marker);
        }
        None => println!("Config:   {}", style("(no home directory)").dim()),
    }
    println!("Database: {}", display_database(global, &config)?);

    Ok(())
}

fn display_database(global: &GlobalOpts, config: &Config) -> Result<String> {
    let path = match global.db.as_ref().or(config.database.as_ref()) {
        Some(path) => path.clone(),
        None => Store::default_path().into_diagnostic()?,
    };
    Ok(path.display().to_string())
}
