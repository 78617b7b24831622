//! Where finished diagnostics go.

use crate::diagnostic::Diagnostic;
use crate::format::FormatContext;
use crate::severity::Severity;

/// Receives diagnostics the engine decided to emit.
///
/// The engine resolves severity, applies suppression, and enforces the error
/// limit before a consumer ever sees a diagnostic; `level` is the final
/// presentation severity and is never `Ignored`. Message text is not
/// pre-rendered: call [`FormatContext::format_diagnostic`] if it is needed.
pub trait DiagnosticConsumer {
    /// Handles one emitted diagnostic.
    fn handle_diagnostic(&mut self, level: Severity, diag: &Diagnostic, ctx: &FormatContext);

    /// Whether diagnostics seen by this consumer count toward the engine's
    /// error and warning totals. Defaults to `true`.
    fn include_in_counts(&self) -> bool {
        true
    }

    /// Called when the engine resets. Consumers buffering state may drop it.
    fn clear(&mut self) {}
}

/// Discards every diagnostic. The diagnostics still count toward the
/// engine's totals, so error-dependent control flow keeps working.
pub struct IgnoringConsumer;

impl DiagnosticConsumer for IgnoringConsumer {
    fn handle_diagnostic(&mut self, _level: Severity, _diag: &Diagnostic, _ctx: &FormatContext) {}
}

/// Forwards diagnostics to another consumer without counting them itself.
///
/// Useful when replaying through a second engine that already counted the
/// diagnostics once.
pub struct ForwardingConsumer {
    target: Box<dyn DiagnosticConsumer>,
}

impl ForwardingConsumer {
    /// Wraps `target`.
    pub fn new(target: Box<dyn DiagnosticConsumer>) -> Self {
        Self { target }
    }
}

impl DiagnosticConsumer for ForwardingConsumer {
    fn handle_diagnostic(&mut self, level: Severity, diag: &Diagnostic, ctx: &FormatContext) {
        self.target.handle_diagnostic(level, diag, ctx);
    }

    fn include_in_counts(&self) -> bool {
        false
    }

    fn clear(&mut self) {
        self.target.clear();
    }
}
