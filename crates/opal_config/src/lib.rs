//! Parsing and validation of `opal.toml` diagnostic configuration.
//!
//! This crate reads the `[diagnostics]` configuration and produces a
//! strongly-typed [`DiagnosticConfig`] controlling severity overrides,
//! error limits, and suppression mappings for the diagnostics engine.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{DiagnosticConfig, OpalConfig};
