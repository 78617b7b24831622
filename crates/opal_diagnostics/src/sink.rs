//! A thread-safe collecting consumer.

use crate::consumer::DiagnosticConsumer;
use crate::diagnostic::Diagnostic;
use crate::format::FormatContext;
use crate::severity::Severity;
use crate::stored::StoredDiagnostic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Collects emitted diagnostics as [`StoredDiagnostic`]s.
///
/// The sink is shared: install an `Arc<DiagnosticSink>` as the engine's
/// consumer and keep a clone to inspect afterwards. The error count is
/// readable without locking.
#[derive(Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<StoredDiagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one diagnostic.
    pub fn push(&self, diag: StoredDiagnostic) {
        if diag.level.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        if let Ok(mut diagnostics) = self.diagnostics.lock() {
            diagnostics.push(diag);
        }
    }

    /// `true` if any collected diagnostic was an error or fatal error.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of collected errors and fatal errors.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of the collected diagnostics.
    pub fn diagnostics(&self) -> Vec<StoredDiagnostic> {
        self.diagnostics
            .lock()
            .map(|diagnostics| diagnostics.clone())
            .unwrap_or_default()
    }

    /// Drains the collected diagnostics, resetting the error count.
    pub fn take_all(&self) -> Vec<StoredDiagnostic> {
        self.error_count.store(0, Ordering::Relaxed);
        self.diagnostics
            .lock()
            .map(|mut diagnostics| std::mem::take(&mut *diagnostics))
            .unwrap_or_default()
    }
}

impl DiagnosticConsumer for Arc<DiagnosticSink> {
    fn handle_diagnostic(&mut self, level: Severity, diag: &Diagnostic, ctx: &FormatContext) {
        self.push(StoredDiagnostic::capture(level, diag, ctx));
    }

    fn clear(&mut self) {
        self.take_all();
    }
}
