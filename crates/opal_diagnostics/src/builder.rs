//! Fluent construction of in-flight diagnostics.

use crate::arg::DiagArg;
use crate::catalog::DiagnosticId;
use crate::diagnostic::Diagnostic;
use crate::engine::DiagnosticsEngine;
use crate::fixit::FixItHint;
use crate::storage::DiagnosticStorage;
use opal_source::{SourceDb, Span};

/// Accumulates the payload of one diagnostic and hands it to the engine.
///
/// Obtained from [`DiagnosticsEngine::report`]. The diagnostic is issued
/// when [`emit`](DiagnosticBuilder::emit) is called, or on drop if the
/// builder is discarded without emitting.
#[must_use = "the diagnostic is issued when the builder is emitted or dropped"]
pub struct DiagnosticBuilder<'a> {
    engine: &'a mut DiagnosticsEngine,
    db: &'a SourceDb,
    id: DiagnosticId,
    span: Span,
    storage: Option<DiagnosticStorage>,
    force_emit: bool,
    emitted: bool,
}

impl<'a> DiagnosticBuilder<'a> {
    pub(crate) fn new(
        engine: &'a mut DiagnosticsEngine,
        db: &'a SourceDb,
        id: DiagnosticId,
        span: Span,
        storage: DiagnosticStorage,
    ) -> Self {
        Self {
            engine,
            db,
            id,
            span,
            storage: Some(storage),
            force_emit: false,
            emitted: false,
        }
    }

    /// Appends a template argument. Arguments bind to `%N` directives in
    /// the order they are added.
    pub fn arg(mut self, arg: impl Into<DiagArg>) -> Self {
        if let Some(storage) = &mut self.storage {
            storage.args.push(arg.into());
        }
        self
    }

    /// Attaches a source range to highlight.
    pub fn range(mut self, span: Span) -> Self {
        if let Some(storage) = &mut self.storage {
            storage.ranges.push(span);
        }
        self
    }

    /// Attaches a suggested edit.
    pub fn fixit(mut self, hint: FixItHint) -> Self {
        if let Some(storage) = &mut self.storage {
            storage.fixits.push(hint);
        }
        self
    }

    /// Bypasses fatal-error silencing and the error limit. The diagnostic
    /// is still subject to severity resolution: an ignored diagnostic stays
    /// ignored.
    pub fn force(mut self) -> Self {
        self.force_emit = true;
        self
    }

    /// Issues the diagnostic now, returning `true` if it reached the
    /// consumer.
    pub fn emit(mut self) -> bool {
        self.finish()
    }

    fn finish(&mut self) -> bool {
        if self.emitted {
            return false;
        }
        self.emitted = true;
        let storage = match self.storage.take() {
            Some(storage) => storage,
            None => return false,
        };
        let diag = Diagnostic::new(self.id, self.span, storage);
        self.engine.emit_diagnostic(self.db, diag, self.force_emit)
    }
}

impl Drop for DiagnosticBuilder<'_> {
    fn drop(&mut self) {
        if !self.emitted && !std::thread::panicking() {
            self.finish();
        }
    }
}
