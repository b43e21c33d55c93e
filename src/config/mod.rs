//! Configuration module for pagecheck
//!
//! Provides types and parsing for `pagecheck.toml` configuration.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
