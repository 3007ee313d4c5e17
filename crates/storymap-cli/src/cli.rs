//! Command-line argument definitions.

use clap::{Parser, Subcommand};

/// Validate, lint, and browse Storymap story content.
#[derive(Parser, Debug)]
#[command(name = "storymap", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Default log filter for the requested verbosity. `RUST_LOG` wins
    /// over this when set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the collection as a release gate
    Validate {
        /// Report invalid documents without failing
        #[arg(long)]
        no_strict: bool,
    },
    /// Report schema problems, missing images, and authoring warnings
    Lint,
    /// List stories in display order
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one story's metadata and body
    Show {
        /// Story id
        id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print a value by dotted key (e.g. `content.dir`)
    Get { key: String },
    /// Set a value by dotted key in the config file
    Set { key: String, value: String },
    /// Write a default config file
    Init {
        /// Target file (defaults to the platform config path)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=VALUE` for docker
        #[arg(long)]
        docker_env: bool,
    },
}
