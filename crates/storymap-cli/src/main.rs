//! Storymap CLI
//!
//! Command-line interface for the story content pipeline.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use storymap_cli::config_handlers::handle_config_command;
use storymap_cli::{Cli, Command, StorymapConfig, commands};
use storymap_core::ConfigManager;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let report = match cli.command {
        Command::Config { action } => {
            handle_config_command(config_path, action)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Validate { no_strict } => {
            let config = load_config(config_path)?;
            let strict = config.build.strict && !no_strict;
            commands::validate(&config, strict)?
        }
        Command::Lint => commands::lint(&load_config(config_path)?)?,
        Command::List { json } => commands::list(&load_config(config_path)?, json)?,
        Command::Show { id, json } => commands::show(&load_config(config_path)?, &id, json)?,
    };

    report.emit();
    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(config_path: Option<&str>) -> Result<StorymapConfig> {
    let config = StorymapConfig::load(config_path)?;
    tracing::info!(content_dir = %config.content_dir().display(), "Loaded configuration");
    Ok(config)
}
