//! Storymap Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all Storymap crates.
//! It has no internal Storymap dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`validation`]: Per-document validation reports
//! - [`traits`]: Configuration management trait
//! - [`util`]: ID and path utilities

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod util;
pub mod validation;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigManager;
pub use validation::{FieldIssue, ValidationError};

// Convenience re-exports from util
pub use util::ids::id_from_key;
