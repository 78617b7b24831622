//! The resolved severity policy for one diagnostic ID at one override point.

use crate::severity::Severity;

/// The effective mapping for a single diagnostic ID within one
/// [`DiagState`](crate::state::DiagState).
///
/// A mapping records both the severity and where that severity came from:
/// `is_user` distinguishes an explicit request from the catalog default,
/// `is_pragma` marks a location-bearing (source pragma) request. The
/// `no_warning_as_error` / `no_error_as_fatal` flags record an explicit
/// opt-out from escalation and stay sticky across later updates until
/// cleared by another explicit opt-out-removal call.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DiagnosticMapping {
    /// The severity this mapping resolves to.
    pub severity: Severity,
    /// `true` if the severity was requested by the user rather than defaulted.
    pub is_user: bool,
    /// `true` if the request carried a source location (pragma-scoped).
    pub is_pragma: bool,
    /// Sticky opt-out from warnings-as-errors escalation.
    pub no_warning_as_error: bool,
    /// Sticky opt-out from errors-as-fatal escalation.
    pub no_error_as_fatal: bool,
    /// Set when a location-less Warning request was overruled because the
    /// diagnostic was already promoted to Error or Fatal.
    pub upgraded_from_warning: bool,
}

impl DiagnosticMapping {
    /// Creates a default (catalog-derived) mapping with the given severity.
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            is_user: false,
            is_pragma: false,
            no_warning_as_error: false,
            no_error_as_fatal: false,
            upgraded_from_warning: false,
        }
    }

    /// Creates a user-requested mapping. `is_pragma` is `true` when the
    /// request carried a source location.
    pub fn user(severity: Severity, is_pragma: bool) -> Self {
        Self {
            severity,
            is_user: true,
            is_pragma,
            no_warning_as_error: false,
            no_error_as_fatal: false,
            upgraded_from_warning: false,
        }
    }
}
