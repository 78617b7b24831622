//! The in-flight diagnostic handed to consumers.

use crate::arg::DiagArg;
use crate::catalog::DiagnosticId;
use crate::fixit::FixItHint;
use crate::storage::DiagnosticStorage;
use opal_source::Span;

/// A fully built diagnostic: its identity, location, and payload.
///
/// Consumers receive a borrowed `Diagnostic` together with a
/// [`FormatContext`](crate::format::FormatContext) they can use to render the
/// message text.
pub struct Diagnostic {
    id: DiagnosticId,
    span: Span,
    storage: DiagnosticStorage,
    /// Pre-formatted message text, set when replaying stored diagnostics.
    /// When present it bypasses template interpretation entirely.
    message: Option<String>,
}

impl Diagnostic {
    /// Builds a diagnostic whose message comes from the catalog template.
    pub fn new(id: DiagnosticId, span: Span, storage: DiagnosticStorage) -> Self {
        Self {
            id,
            span,
            storage,
            message: None,
        }
    }

    /// Builds a diagnostic carrying already-formatted message text.
    pub fn with_message(
        id: DiagnosticId,
        span: Span,
        storage: DiagnosticStorage,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            span,
            storage,
            message: Some(message.into()),
        }
    }

    /// The diagnostic's catalog ID.
    pub fn id(&self) -> DiagnosticId {
        self.id
    }

    /// The primary source location.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The template arguments, in `%N` order.
    pub fn args(&self) -> &[DiagArg] {
        &self.storage.args
    }

    /// Highlighted source ranges.
    pub fn ranges(&self) -> &[Span] {
        &self.storage.ranges
    }

    /// Suggested edits.
    pub fn fixits(&self) -> &[FixItHint] {
        &self.storage.fixits
    }

    /// Pre-formatted message text, if this diagnostic carries one.
    pub fn preformatted(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Consumes the diagnostic, releasing its storage for reuse.
    pub fn into_storage(self) -> DiagnosticStorage {
        self.storage
    }
}
