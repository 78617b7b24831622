//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::OpalConfig;
use std::path::Path;

/// Loads and validates an `opal.toml` configuration from a project directory.
///
/// Reads `<project_dir>/opal.toml`, parses it, and validates the diagnostic
/// settings.
pub fn load_config(project_dir: &Path) -> Result<OpalConfig, ConfigError> {
    let config_path = project_dir.join("opal.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `opal.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<OpalConfig, ConfigError> {
    let config: OpalConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
fn validate_config(config: &OpalConfig) -> Result<(), ConfigError> {
    let diag = &config.diagnostics;
    for group in diag.ignore.iter().chain(diag.deny.iter()) {
        if group.is_empty() {
            return Err(ConfigError::ValidationError(
                "diagnostic group names must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
