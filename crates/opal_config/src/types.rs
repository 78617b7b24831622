//! Configuration types deserialized from `opal.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level configuration parsed from `opal.toml`.
#[derive(Debug, Deserialize)]
pub struct OpalConfig {
    /// Diagnostic behavior settings.
    #[serde(default)]
    pub diagnostics: DiagnosticConfig,
}

/// Settings controlling how the diagnostics engine classifies and limits
/// messages.
///
/// Group names refer to user-controllable diagnostic groups from the
/// catalog (the same names accepted by `-W`-style flags).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiagnosticConfig {
    /// Stop after this many errors by emitting a single fatal diagnostic.
    /// `0` (the default) means no limit.
    #[serde(default)]
    pub error_limit: usize,

    /// Suppress all warning-severity diagnostics (`-w`).
    #[serde(default)]
    pub no_warnings: bool,

    /// Promote every warning to an error (`-Werror`).
    #[serde(default)]
    pub warnings_as_errors: bool,

    /// Promote every error to a fatal error (`-Wfatal-errors`).
    #[serde(default)]
    pub errors_as_fatal: bool,

    /// Diagnostic groups to silence entirely.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Diagnostic groups to promote to errors.
    #[serde(default)]
    pub deny: Vec<String>,

    /// Path to a warning suppression mapping file.
    #[serde(default)]
    pub suppression_mappings: Option<PathBuf>,

    /// Elide common type components when rendering type differences.
    #[serde(default = "default_true")]
    pub elide_type: bool,

    /// Render a structural tree when diagnosing type differences.
    #[serde(default)]
    pub print_type_tree: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            error_limit: 0,
            no_warnings: false,
            warnings_as_errors: false,
            errors_as_fatal: false,
            ignore: Vec::new(),
            deny: Vec::new(),
            suppression_mappings: None,
            elide_type: true,
            print_type_tree: false,
        }
    }
}
