//! # storymap-cli
//!
//! The `storymap` command-line tool:
//! - `validate`: strict release gate over the story collection
//! - `lint`: authoring checks (schema, images, alt text, legacy paths)
//! - `list` / `show`: browse the ordered collection
//! - `config`: inspect and edit `storymap.toml`

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;

pub use cli::{Cli, Command, ConfigAction};
pub use commands::CommandReport;
pub use config::StorymapConfig;
