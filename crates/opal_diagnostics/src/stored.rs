//! Serializable diagnostics detached from the engine.
//!
//! A [`StoredDiagnostic`] captures everything needed to replay a diagnostic
//! later: the final level, the catalog ID, the rendered message, and the
//! source attachments. Template arguments are not kept; the message is
//! rendered at capture time, so stored diagnostics survive across sessions
//! that do not share an interner or renderer.

use crate::catalog::DiagnosticId;
use crate::diagnostic::Diagnostic;
use crate::fixit::FixItHint;
use crate::format::FormatContext;
use crate::severity::Severity;
use opal_source::Span;
use serde::{Deserialize, Serialize};

/// A diagnostic flattened for storage or transport.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct StoredDiagnostic {
    /// The severity it was emitted at.
    pub level: Severity,
    /// Its catalog ID.
    pub id: DiagnosticId,
    /// The fully rendered message text.
    pub message: String,
    /// The primary source location.
    pub span: Span,
    /// Highlighted source ranges.
    pub ranges: Vec<Span>,
    /// Suggested edits.
    pub fixits: Vec<FixItHint>,
}

impl StoredDiagnostic {
    /// Captures an emitted diagnostic, rendering its message now.
    pub fn capture(level: Severity, diag: &Diagnostic, ctx: &FormatContext) -> Self {
        let mut message = String::new();
        ctx.format_diagnostic(diag, &mut message);
        Self {
            level,
            id: diag.id(),
            message,
            span: diag.span(),
            ranges: diag.ranges().to_vec(),
            fixits: diag.fixits().to_vec(),
        }
    }
}
