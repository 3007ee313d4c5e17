//! Utility modules for ID computation and path handling.
//!
//! # Modules
//!
//! - [`ids`]: Story ID derivation from storage keys
//! - [`paths`]: Tilde expansion

pub mod ids;
pub mod paths;
