//! The diagnostics engine.
//!
//! [`DiagnosticsEngine`] is the hub every compiler phase reports through.
//! It resolves each diagnostic's effective severity from the catalog default
//! plus any command-line or pragma overrides active at the report location,
//! applies file-based suppression, enforces the error limit, silences
//! everything after a fatal error, counts what the consumer counts, and
//! finally hands surviving diagnostics to the installed consumer.

use crate::arg::{ArgRenderer, DummyArgRenderer};
use crate::builder::DiagnosticBuilder;
use crate::catalog::{builtin, Catalog, DiagnosticId, Flavor};
use crate::consumer::DiagnosticConsumer;
use crate::diagnostic::Diagnostic;
use crate::format::FormatContext;
use crate::mapping::DiagnosticMapping;
use crate::severity::Severity;
use crate::state::{DiagState, DiagStateId, DiagStateMap};
use crate::storage::StoragePool;
use crate::stored::StoredDiagnostic;
use crate::suppression::{parse_suppressions, SuppressionMapping};
use opal_common::Interner;
use opal_config::DiagnosticConfig;
use opal_source::{SourceDb, Span};
use std::path::Path;
use std::sync::Arc;

/// Central dispatch point for compiler diagnostics.
pub struct DiagnosticsEngine {
    catalog: Arc<Catalog>,
    interner: Arc<Interner>,
    client: Box<dyn DiagnosticConsumer>,
    renderer: Box<dyn ArgRenderer>,
    state_map: DiagStateMap,
    push_stack: Vec<DiagStateId>,
    suppressions: Option<SuppressionMapping>,
    pool: StoragePool,

    error_limit: usize,
    suppress_all_diagnostics: bool,
    elide_type: bool,
    print_type_tree: bool,

    num_warnings: usize,
    num_errors: usize,
    trap_num_errors: usize,
    trap_num_unrecoverable: usize,
    error_occurred: bool,
    uncompilable_error_occurred: bool,
    fatal_error_occurred: bool,
    unrecoverable_error_occurred: bool,
    /// Severity of the last non-note diagnostic that went through
    /// processing; notes inherit their visibility from it.
    last_diag_level: Severity,
}

impl DiagnosticsEngine {
    /// Creates an engine reporting to `client`.
    pub fn new(
        catalog: Arc<Catalog>,
        interner: Arc<Interner>,
        client: Box<dyn DiagnosticConsumer>,
    ) -> Self {
        Self {
            catalog,
            interner,
            client,
            renderer: Box::new(DummyArgRenderer),
            state_map: DiagStateMap::new(DiagState::default()),
            push_stack: Vec::new(),
            suppressions: None,
            pool: StoragePool::default(),
            error_limit: 0,
            suppress_all_diagnostics: false,
            elide_type: true,
            print_type_tree: false,
            num_warnings: 0,
            num_errors: 0,
            trap_num_errors: 0,
            trap_num_unrecoverable: 0,
            error_occurred: false,
            uncompilable_error_occurred: false,
            fatal_error_occurred: false,
            unrecoverable_error_occurred: false,
            last_diag_level: Severity::Ignored,
        }
    }

    /// The catalog this engine resolves diagnostics against.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Replaces the consumer, returning the previous one.
    pub fn set_client(&mut self, client: Box<dyn DiagnosticConsumer>) -> Box<dyn DiagnosticConsumer> {
        std::mem::replace(&mut self.client, client)
    }

    /// Installs the renderer used for opaque type arguments.
    pub fn set_renderer(&mut self, renderer: Box<dyn ArgRenderer>) {
        self.renderer = renderer;
    }

    /// Caps emitted errors; once exceeded, a fatal diagnostic is issued and
    /// everything after it is silenced. Zero means no limit.
    pub fn set_error_limit(&mut self, limit: usize) {
        self.error_limit = limit;
    }

    /// Suppresses all diagnostics. They still update error flags and trap
    /// counters.
    pub fn set_suppress_all_diagnostics(&mut self, value: bool) {
        self.suppress_all_diagnostics = value;
    }

    /// Controls eliding of common structure when printing type pairs.
    pub fn set_elide_type(&mut self, value: bool) {
        self.elide_type = value;
    }

    /// Controls tree-style printing of type diffs.
    pub fn set_print_type_tree(&mut self, value: bool) {
        self.print_type_tree = value;
    }

    /// Demotes all warnings to ignored from here on.
    pub fn set_ignore_all_warnings(&mut self, value: bool) {
        let cur = self.state_map.cur();
        self.state_map.state_mut(cur).ignore_all_warnings = value;
    }

    /// Promotes warnings to errors from here on, unless individually opted
    /// out.
    pub fn set_warnings_as_errors(&mut self, value: bool) {
        let cur = self.state_map.cur();
        self.state_map.state_mut(cur).warnings_as_errors = value;
    }

    /// Promotes errors to fatal errors from here on, unless individually
    /// opted out.
    pub fn set_errors_as_fatal(&mut self, value: bool) {
        let cur = self.state_map.cur();
        self.state_map.state_mut(cur).errors_as_fatal = value;
    }

    /// Applies the `[diagnostics]` section of the project configuration.
    pub fn apply_config(&mut self, db: &SourceDb, config: &DiagnosticConfig) {
        self.error_limit = config.error_limit;
        self.elide_type = config.elide_type;
        self.print_type_tree = config.print_type_tree;
        self.set_ignore_all_warnings(config.no_warnings);
        self.set_warnings_as_errors(config.warnings_as_errors);
        self.set_errors_as_fatal(config.errors_as_fatal);
        for group in &config.ignore {
            if !self.set_severity_for_group(db, Flavor::WarningOrError, group, Severity::Ignored, None) {
                self.report_unknown_group(db, Flavor::WarningOrError, group);
            }
        }
        for group in &config.deny {
            if !self.set_severity_for_group(db, Flavor::WarningOrError, group, Severity::Error, None) {
                self.report_unknown_group(db, Flavor::WarningOrError, group);
            }
        }
        if let Some(path) = &config.suppression_mappings {
            self.load_suppression_mappings(db, path);
        }
    }

    /// Overrides the severity of one diagnostic.
    ///
    /// With a location the override takes effect from that point onward in
    /// the containing file; without one it applies globally. A request to
    /// demote to `Warning` never undoes an existing promotion to `Error` or
    /// `Fatal`; the promotion is kept and recorded on the mapping. Sticky
    /// escalation opt-outs survive the update.
    pub fn set_severity(
        &mut self,
        db: &SourceDb,
        id: DiagnosticId,
        severity: Severity,
        loc: Option<Span>,
    ) {
        debug_assert!(
            self.catalog.is_warning_or_extension(id) || severity >= Severity::Error,
            "error-class diagnostics can only be remapped to error or fatal"
        );
        let catalog = Arc::clone(&self.catalog);
        let cur = self.state_map.cur();
        let existing = *self.state_map.state_mut(cur).get_or_add(&catalog, id);

        let mut severity = severity;
        let mut upgraded = false;
        if severity == Severity::Warning && existing.severity >= Severity::Error {
            severity = existing.severity;
            upgraded = true;
        }
        let mut mapping = DiagnosticMapping::user(severity, loc.is_some());
        mapping.upgraded_from_warning = upgraded;
        mapping.no_warning_as_error = existing.no_warning_as_error;
        mapping.no_error_as_fatal = existing.no_error_as_fatal;

        match loc {
            Some(l) if !l.is_dummy() && l != self.state_map.cur_loc() => {
                let next = self.state_map.clone_cur();
                self.state_map.state_mut(next).set_mapping(id, mapping);
                self.state_map.append(db, l, next);
            }
            _ => self.state_map.state_mut(cur).set_mapping(id, mapping),
        }
    }

    /// Overrides the severity of every member of a group. Returns `false`
    /// if the group name is unknown.
    pub fn set_severity_for_group(
        &mut self,
        db: &SourceDb,
        flavor: Flavor,
        group: &str,
        severity: Severity,
        loc: Option<Span>,
    ) -> bool {
        let members = match self.catalog.group_members(flavor, group) {
            Some(members) => members,
            None => return false,
        };
        for id in members {
            self.set_severity(db, id, severity, loc);
        }
        true
    }

    /// Overrides the severity of every user-controllable diagnostic.
    pub fn set_severity_for_all(
        &mut self,
        db: &SourceDb,
        flavor: Flavor,
        severity: Severity,
        loc: Option<Span>,
    ) {
        for id in self.catalog.all_diagnostics(flavor) {
            if self.catalog.is_warning_or_extension(id) {
                self.set_severity(db, id, severity, loc);
            }
        }
    }

    /// Enables or disables warnings-as-errors for one group. Disabling also
    /// demotes members currently mapped to `Error` back to `Warning` and
    /// sets their sticky opt-out, so a later blanket promotion skips them.
    /// Returns `false` if the group name is unknown.
    pub fn set_group_warnings_as_errors(
        &mut self,
        db: &SourceDb,
        group: &str,
        enabled: bool,
    ) -> bool {
        if enabled {
            return self.set_severity_for_group(
                db,
                Flavor::WarningOrError,
                group,
                Severity::Error,
                None,
            );
        }
        let members = match self.catalog.group_members(Flavor::WarningOrError, group) {
            Some(members) => members,
            None => return false,
        };
        let catalog = Arc::clone(&self.catalog);
        let cur = self.state_map.cur();
        for id in members {
            let info = self.state_map.state_mut(cur).get_or_add(&catalog, id);
            if info.severity == Severity::Error {
                info.severity = Severity::Warning;
            }
            info.no_warning_as_error = true;
        }
        true
    }

    /// Enables or disables errors-as-fatal for one group, mirroring
    /// [`set_group_warnings_as_errors`](Self::set_group_warnings_as_errors)
    /// one tier up.
    pub fn set_group_errors_as_fatal(&mut self, db: &SourceDb, group: &str, enabled: bool) -> bool {
        if enabled {
            return self.set_severity_for_group(
                db,
                Flavor::WarningOrError,
                group,
                Severity::Fatal,
                None,
            );
        }
        let members = match self.catalog.group_members(Flavor::WarningOrError, group) {
            Some(members) => members,
            None => return false,
        };
        let catalog = Arc::clone(&self.catalog);
        let cur = self.state_map.cur();
        for id in members {
            let info = self.state_map.state_mut(cur).get_or_add(&catalog, id);
            if info.severity == Severity::Fatal {
                info.severity = Severity::Error;
            }
            info.no_error_as_fatal = true;
        }
        true
    }

    /// Saves the current severity state for a later
    /// [`pop_mappings`](Self::pop_mappings).
    pub fn push_mappings(&mut self) {
        self.push_stack.push(self.state_map.cur());
    }

    /// Restores the most recently pushed severity state, taking effect at
    /// `loc` (or immediately for a dummy location). Returns `false` if
    /// nothing was pushed.
    pub fn pop_mappings(&mut self, db: &SourceDb, loc: Span) -> bool {
        let popped = match self.push_stack.pop() {
            Some(state) => state,
            None => return false,
        };
        if popped != self.state_map.cur() {
            if loc.is_dummy() {
                self.state_map.set_cur(popped);
            } else {
                self.state_map.append(db, loc, popped);
            }
        }
        true
    }

    /// Loads a suppression mapping file from disk. Read and parse failures
    /// are reported through the engine itself.
    pub fn load_suppression_mappings(&mut self, db: &SourceDb, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(text) => self.install_suppression_mappings(db, path, &text),
            Err(err) => {
                self.report(db, builtin::MALFORMED_SUPPRESSION_MAPPING, Span::DUMMY)
                    .arg(path.display().to_string())
                    .arg(err.to_string())
                    .emit();
            }
        }
    }

    /// Installs suppression rules from already-loaded text. `origin` names
    /// the source of the text in error messages.
    pub fn install_suppression_mappings(&mut self, db: &SourceDb, origin: &Path, text: &str) {
        let parsed = match parse_suppressions(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.report(db, builtin::MALFORMED_SUPPRESSION_MAPPING, Span::DUMMY)
                    .arg(origin.display().to_string())
                    .arg(err.to_string())
                    .emit();
                return;
            }
        };
        let catalog = Arc::clone(&self.catalog);
        let (mapping, unknown) = parsed.resolve(&catalog);
        for name in unknown {
            self.report_unknown_group(db, Flavor::WarningOrError, &name);
        }
        self.suppressions = Some(mapping);
    }

    fn report_unknown_group(&mut self, db: &SourceDb, flavor: Flavor, name: &str) {
        let catalog = Arc::clone(&self.catalog);
        let suggestion = catalog.nearest_group(flavor, name).map(str::to_string);
        let has_suggestion = suggestion.is_some() as u64;
        self.report(db, builtin::UNKNOWN_DIAG_OPTION, Span::DUMMY)
            .arg(flavor.index())
            .arg(name)
            .arg(has_suggestion)
            .arg(suggestion.unwrap_or_default())
            .emit();
    }

    /// Starts a diagnostic at `span`. Use [`Span::DUMMY`] for diagnostics
    /// with no source location.
    pub fn report<'a>(
        &'a mut self,
        db: &'a SourceDb,
        id: DiagnosticId,
        span: Span,
    ) -> DiagnosticBuilder<'a> {
        let storage = self.pool.alloc();
        DiagnosticBuilder::new(self, db, id, span, storage)
    }

    /// Replays a stored diagnostic to the consumer, bypassing severity
    /// resolution: the stored level is authoritative.
    pub fn report_stored(&mut self, stored: &StoredDiagnostic) {
        debug_assert!(stored.level != Severity::Ignored);
        let mut storage = self.pool.alloc();
        storage.ranges.extend_from_slice(&stored.ranges);
        storage.fixits.extend_from_slice(&stored.fixits);
        let diag =
            Diagnostic::with_message(stored.id, stored.span, storage, stored.message.clone());
        self.emit_to_client(stored.level, &diag);
        if self.client.include_in_counts() && stored.level == Severity::Warning {
            self.num_warnings += 1;
        }
        self.release(diag);
    }

    /// Resolves the severity `id` would be emitted at when reported at
    /// `span` right now.
    pub fn diagnostic_severity(&mut self, db: &SourceDb, id: DiagnosticId, span: Span) -> Severity {
        let catalog = Arc::clone(&self.catalog);
        if catalog.is_note(id) {
            return Severity::Note;
        }

        let state_id = if span.is_dummy() {
            self.state_map.cur()
        } else {
            self.state_map.lookup(db, span)
        };
        let state = self.state_map.state(state_id);
        let mapping = state.mapping_for(&catalog, id);
        let mut result = mapping.severity;
        if result == Severity::Ignored {
            return result;
        }

        if state.ignore_all_warnings
            && matches!(result, Severity::Remark | Severity::Warning)
            && !catalog.is_default_error(id)
        {
            return Severity::Ignored;
        }
        if result == Severity::Warning && state.warnings_as_errors && !mapping.no_warning_as_error {
            result = Severity::Error;
        }
        if result == Severity::Error && state.errors_as_fatal && !mapping.no_error_as_fatal {
            result = Severity::Fatal;
        }

        // File-based suppression applies to warning-class diagnostics only,
        // and pragmas take precedence over it.
        if !mapping.is_pragma
            && catalog.is_warning_or_extension(id)
            && self.is_suppressed_via_mapping(db, id, span)
        {
            return Severity::Ignored;
        }

        result
    }

    /// Whether the installed suppression mapping silences `id` at `span`.
    pub fn is_suppressed_via_mapping(&self, db: &SourceDb, id: DiagnosticId, span: Span) -> bool {
        if span.is_dummy() {
            return false;
        }
        match &self.suppressions {
            Some(suppressions) => {
                let path = db.presumed_path(span.file, span.start).to_string_lossy();
                suppressions.is_suppressed(id, &path)
            }
            None => false,
        }
    }

    pub(crate) fn emit_diagnostic(&mut self, db: &SourceDb, diag: Diagnostic, force: bool) -> bool {
        if !force {
            return self.process_diag(db, diag);
        }
        let level = self.diagnostic_severity(db, diag.id(), diag.span());
        let emitted = level != Severity::Ignored;
        if emitted {
            self.emit_to_client(level, &diag);
            if self.client.include_in_counts() && level == Severity::Warning {
                self.num_warnings += 1;
            }
        }
        self.release(diag);
        emitted
    }

    fn process_diag(&mut self, db: &SourceDb, diag: Diagnostic) -> bool {
        let id = diag.id();
        let level = self.diagnostic_severity(db, id, diag.span());

        // Trap counters update even when the diagnostic itself is silenced.
        if level >= Severity::Error {
            self.trap_num_errors += 1;
            if self.catalog.is_unrecoverable(id) {
                self.trap_num_unrecoverable += 1;
            }
        }

        if self.suppress_all_diagnostics {
            self.release(diag);
            return false;
        }

        if level != Severity::Note {
            // A fatal error latches only at the next non-note diagnostic,
            // so its own notes still come through.
            if self.last_diag_level == Severity::Fatal {
                self.fatal_error_occurred = true;
            }
            self.last_diag_level = level;
        }

        if self.fatal_error_occurred {
            if level >= Severity::Error && self.client.include_in_counts() {
                self.num_errors += 1;
            }
            self.release(diag);
            return false;
        }

        if level == Severity::Ignored
            || (level == Severity::Note && self.last_diag_level == Severity::Ignored)
        {
            self.release(diag);
            return false;
        }

        if level >= Severity::Error {
            if self.catalog.is_unrecoverable(id) {
                self.unrecoverable_error_occurred = true;
            }
            if self.catalog.is_default_error(id) {
                self.uncompilable_error_occurred = true;
            }
            self.error_occurred = true;
            if self.client.include_in_counts() {
                self.num_errors += 1;
            }

            if self.error_limit != 0 && self.num_errors > self.error_limit && level == Severity::Error
            {
                self.report_too_many_errors();
                self.release(diag);
                return false;
            }
        }

        if id == builtin::TOO_MANY_ERRORS {
            self.fatal_error_occurred = true;
        }

        self.emit_to_client(level, &diag);
        if self.client.include_in_counts() && level == Severity::Warning {
            self.num_warnings += 1;
        }
        self.release(diag);
        true
    }

    fn report_too_many_errors(&mut self) {
        self.last_diag_level = Severity::Fatal;
        self.error_occurred = true;
        self.uncompilable_error_occurred = true;
        self.unrecoverable_error_occurred = true;
        let storage = self.pool.alloc();
        let diag = Diagnostic::new(builtin::TOO_MANY_ERRORS, Span::DUMMY, storage);
        self.emit_to_client(Severity::Fatal, &diag);
        self.fatal_error_occurred = true;
        self.release(diag);
    }

    fn emit_to_client(&mut self, level: Severity, diag: &Diagnostic) {
        let ctx = FormatContext {
            catalog: &self.catalog,
            interner: &self.interner,
            renderer: self.renderer.as_ref(),
            elide_type: self.elide_type,
            print_type_tree: self.print_type_tree,
        };
        self.client.handle_diagnostic(level, diag, &ctx);
    }

    fn release(&mut self, diag: Diagnostic) {
        self.pool.release(diag.into_storage());
    }

    /// `true` once any error or fatal error was processed.
    pub fn has_error_occurred(&self) -> bool {
        self.error_occurred
    }

    /// `true` once a diagnostic that defaults to error-or-worse was
    /// processed; policy-escalated warnings do not set this.
    pub fn has_uncompilable_error_occurred(&self) -> bool {
        self.uncompilable_error_occurred
    }

    /// `true` once output has been silenced by a fatal error.
    pub fn has_fatal_error_occurred(&self) -> bool {
        self.fatal_error_occurred
    }

    /// `true` once an unrecoverable diagnostic was processed.
    pub fn has_unrecoverable_error_occurred(&self) -> bool {
        self.unrecoverable_error_occurred
    }

    /// Errors counted so far, including ones silenced after a fatal error.
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// Warnings emitted so far.
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    pub(crate) fn trap_counts(&self) -> (usize, usize) {
        (self.trap_num_errors, self.trap_num_unrecoverable)
    }

    /// Clears counters and flags. A full (non-soft) reset also discards all
    /// pragma-driven severity state and notifies the consumer.
    pub fn reset(&mut self, soft: bool) {
        self.error_occurred = false;
        self.uncompilable_error_occurred = false;
        self.fatal_error_occurred = false;
        self.unrecoverable_error_occurred = false;
        self.num_warnings = 0;
        self.num_errors = 0;
        self.trap_num_errors = 0;
        self.trap_num_unrecoverable = 0;
        self.last_diag_level = Severity::Ignored;
        if !soft {
            self.reset_pragmas();
            self.client.clear();
        }
    }

    /// Discards pragma-driven severity state, keeping command-line
    /// configuration and counters.
    pub fn reset_pragmas(&mut self) {
        self.state_map.clear_pragmas();
        self.push_stack.clear();
    }
}

/// Watches for errors raised across a region of work.
///
/// Speculative parsing and recovery paths use a trap to ask "did anything go
/// wrong since this point", independent of suppression: trap counters update
/// even for diagnostics that were never shown.
pub struct ErrorTrap {
    errors: usize,
    unrecoverable: usize,
}

impl ErrorTrap {
    /// Starts watching from the engine's current position.
    pub fn new(engine: &DiagnosticsEngine) -> Self {
        let (errors, unrecoverable) = engine.trap_counts();
        Self {
            errors,
            unrecoverable,
        }
    }

    /// `true` if any error-level diagnostic was processed since the trap
    /// was created or last reset.
    pub fn has_error_occurred(&self, engine: &DiagnosticsEngine) -> bool {
        engine.trap_counts().0 > self.errors
    }

    /// `true` if any unrecoverable diagnostic was processed since the trap
    /// was created or last reset.
    pub fn has_unrecoverable_error_occurred(&self, engine: &DiagnosticsEngine) -> bool {
        engine.trap_counts().1 > self.unrecoverable
    }

    /// Forgets everything seen so far.
    pub fn reset(&mut self, engine: &DiagnosticsEngine) {
        let (errors, unrecoverable) = engine.trap_counts();
        self.errors = errors;
        self.unrecoverable = unrecoverable;
    }
}
