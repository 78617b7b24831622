//! Location-sensitive severity state.
//!
//! Pragmas and command-line options override diagnostic severities. Overrides
//! from the command line apply everywhere; overrides from pragmas apply from
//! their source location onward, and only within the file that contains them
//! plus the files it transitively includes. This module tracks that history:
//! each file keeps a sorted list of (offset, state) transitions, and a file's
//! initial state is inherited from its include site.

use crate::catalog::{Catalog, DiagnosticId};
use crate::mapping::DiagnosticMapping;
use opal_source::{FileId, SourceDb, Span};
use std::collections::HashMap;

/// Hard cap on include nesting when walking parent chains.
const MAX_INCLUDE_DEPTH: usize = 256;

/// One complete snapshot of severity overrides plus the global toggles that
/// apply alongside them.
#[derive(Clone, Default, Debug)]
pub struct DiagState {
    mappings: HashMap<DiagnosticId, DiagnosticMapping>,
    /// Demote all warnings to ignored.
    pub ignore_all_warnings: bool,
    /// Promote warnings to errors unless individually opted out.
    pub warnings_as_errors: bool,
    /// Promote errors to fatal errors unless individually opted out.
    pub errors_as_fatal: bool,
}

impl DiagState {
    /// Returns the stored mapping for `id`, inserting the catalog default
    /// first if none is present.
    pub fn get_or_add(&mut self, catalog: &Catalog, id: DiagnosticId) -> &mut DiagnosticMapping {
        self.mappings
            .entry(id)
            .or_insert_with(|| catalog.default_mapping(id))
    }

    /// Returns the effective mapping for `id` without modifying the state.
    pub fn mapping_for(&self, catalog: &Catalog, id: DiagnosticId) -> DiagnosticMapping {
        self.mappings
            .get(&id)
            .copied()
            .unwrap_or_else(|| catalog.default_mapping(id))
    }

    /// Installs a mapping for `id`, replacing any previous one.
    pub fn set_mapping(&mut self, id: DiagnosticId, mapping: DiagnosticMapping) {
        self.mappings.insert(id, mapping);
    }
}

/// Index of a [`DiagState`] snapshot in the [`DiagStateMap`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DiagStateId(usize);

/// A point in a file where the diagnostic state changed.
#[derive(Clone, Copy, Debug)]
struct StatePoint {
    offset: u32,
    state: DiagStateId,
}

/// Per-file transition history.
#[derive(Debug)]
struct FileNode {
    /// The file containing this file's include site, if any.
    parent: Option<usize>,
    /// Offset of the include site within the parent.
    parent_offset: u32,
    /// Sorted by offset; always holds at least the initial entry at 0.
    transitions: Vec<StatePoint>,
    /// `true` if any transition was recorded in this file itself rather than
    /// inherited from an include site.
    has_local_transitions: bool,
}

impl FileNode {
    fn lookup(&self, offset: u32) -> DiagStateId {
        let i = self
            .transitions
            .partition_point(|point| point.offset <= offset);
        debug_assert!(i > 0, "missing initial state transition");
        self.transitions[i - 1].state
    }
}

/// The full diagnostic-state history: an arena of [`DiagState`] snapshots and
/// the per-file transition lists that select between them.
pub struct DiagStateMap {
    states: Vec<DiagState>,
    files: Vec<FileNode>,
    by_file: HashMap<FileId, usize>,
    first: DiagStateId,
    cur: DiagStateId,
    /// Location of the latest transition; a dummy span means the current
    /// state was established on the command line.
    cur_loc: Span,
}

impl DiagStateMap {
    /// Creates a map whose initial state is `initial`.
    pub fn new(initial: DiagState) -> Self {
        Self {
            states: vec![initial],
            files: Vec::new(),
            by_file: HashMap::new(),
            first: DiagStateId(0),
            cur: DiagStateId(0),
            cur_loc: Span::DUMMY,
        }
    }

    /// The state active before any transition.
    pub fn first(&self) -> DiagStateId {
        self.first
    }

    /// The most recently installed state.
    pub fn cur(&self) -> DiagStateId {
        self.cur
    }

    /// Location of the most recent transition; dummy for the command line.
    pub fn cur_loc(&self) -> Span {
        self.cur_loc
    }

    /// Shared access to a snapshot.
    pub fn state(&self, id: DiagStateId) -> &DiagState {
        &self.states[id.0]
    }

    /// Mutable access to a snapshot.
    pub fn state_mut(&mut self, id: DiagStateId) -> &mut DiagState {
        &mut self.states[id.0]
    }

    /// Clones the current snapshot into the arena and returns the copy's ID.
    pub fn clone_cur(&mut self) -> DiagStateId {
        let copy = self.states[self.cur.0].clone();
        self.states.push(copy);
        DiagStateId(self.states.len() - 1)
    }

    /// Returns the state active at `loc`.
    pub fn lookup(&mut self, db: &SourceDb, loc: Span) -> DiagStateId {
        // Common case: no pragma has modified the state in any file.
        if self.files.is_empty() {
            return self.first;
        }
        debug_assert!(!loc.is_dummy());
        let node = self.get_file(db, loc.file, 0);
        self.files[node].lookup(loc.start)
    }

    /// Records that `state` takes effect at `loc`, propagating the transition
    /// up the include chain so that files included after `loc` inherit it.
    pub fn append(&mut self, db: &SourceDb, loc: Span, state: DiagStateId) {
        debug_assert!(!loc.is_dummy());
        self.cur = state;
        self.cur_loc = loc;

        let mut node = Some(self.get_file(db, loc.file, 0));
        let mut offset = loc.start;
        let mut depth = 0;
        while let Some(i) = node {
            depth += 1;
            assert!(depth <= MAX_INCLUDE_DEPTH, "include chain too deep");
            let file = &mut self.files[i];
            file.has_local_transitions = true;
            // Never empty: every node starts with its initial transition.
            let last_index = file.transitions.len() - 1;
            let last = &mut file.transitions[last_index];
            debug_assert!(last.offset <= offset, "state transitions added out of order");
            if last.offset == offset {
                if last.state == state {
                    break;
                }
                last.state = state;
            } else {
                file.transitions.push(StatePoint { offset, state });
            }
            offset = file.parent_offset;
            node = file.parent;
        }
    }

    /// Installs `state` as current without tying it to a source location.
    /// Used for command-line configured transitions.
    pub fn set_cur(&mut self, state: DiagStateId) {
        self.cur = state;
        self.cur_loc = Span::DUMMY;
    }

    /// Discards all pragma-driven history, keeping only the initial state.
    pub fn clear_pragmas(&mut self) {
        self.files.clear();
        self.by_file.clear();
        self.states.truncate(1);
        self.cur = self.first;
        self.cur_loc = Span::DUMMY;
    }

    /// Returns `true` if any file recorded a local transition.
    pub fn has_pragmas(&self) -> bool {
        self.files.iter().any(|f| f.has_local_transitions)
    }

    fn get_file(&mut self, db: &SourceDb, id: FileId, depth: usize) -> usize {
        assert!(depth <= MAX_INCLUDE_DEPTH, "include chain too deep");
        if let Some(&i) = self.by_file.get(&id) {
            return i;
        }

        // New file: its initial state is the state at its include site, or
        // the first state for top-level files.
        let (parent, parent_offset, initial) = match db.include_site(id) {
            Some((parent_file, offset)) => {
                let parent = self.get_file(db, parent_file, depth + 1);
                (Some(parent), offset, self.files[parent].lookup(offset))
            }
            None => (None, 0, self.first),
        };
        let i = self.files.len();
        self.files.push(FileNode {
            parent,
            parent_offset,
            transitions: vec![StatePoint {
                offset: 0,
                state: initial,
            }],
            has_local_transitions: false,
        });
        self.by_file.insert(id, i);
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Descriptor;
    use crate::severity::Severity;

    fn setup() -> (Catalog, DiagnosticId, SourceDb, FileId) {
        let mut catalog = Catalog::new();
        let id = catalog.register(Descriptor::warning("shadowed variable %0", "shadow"));
        let mut db = SourceDb::new();
        let file = db.add_source("main.op", "let a = 1;\nlet a = 2;\n".to_string());
        (catalog, id, db, file)
    }

    #[test]
    fn empty_map_returns_first_state() {
        let (_catalog, _id, db, file) = setup();
        let mut map = DiagStateMap::new(DiagState::default());
        let state = map.lookup(&db, Span::point(file, 5));
        assert_eq!(state, map.first());
    }

    #[test]
    fn transition_applies_from_its_offset_onward() {
        let (catalog, id, db, file) = setup();
        let mut map = DiagStateMap::new(DiagState::default());

        let next = map.clone_cur();
        map.state_mut(next)
            .get_or_add(&catalog, id)
            .severity = Severity::Ignored;
        map.append(&db, Span::point(file, 11), next);

        let before = map.lookup(&db, Span::point(file, 4));
        let after = map.lookup(&db, Span::point(file, 15));
        assert_eq!(
            map.state(before).mapping_for(&catalog, id).severity,
            Severity::Warning
        );
        assert_eq!(
            map.state(after).mapping_for(&catalog, id).severity,
            Severity::Ignored
        );
    }

    #[test]
    fn included_file_inherits_state_at_include_site() {
        let (catalog, id, mut db, main) = setup();
        let early = db.add_include("early.op", "x\n".to_string(), Span::point(main, 2));
        let late = db.add_include("late.op", "y\n".to_string(), Span::point(main, 18));

        let mut map = DiagStateMap::new(DiagState::default());
        let next = map.clone_cur();
        map.state_mut(next)
            .get_or_add(&catalog, id)
            .severity = Severity::Error;
        map.append(&db, Span::point(main, 10), next);

        let in_early = map.lookup(&db, Span::point(early, 0));
        let in_late = map.lookup(&db, Span::point(late, 0));
        assert_eq!(
            map.state(in_early).mapping_for(&catalog, id).severity,
            Severity::Warning
        );
        assert_eq!(
            map.state(in_late).mapping_for(&catalog, id).severity,
            Severity::Error
        );
    }

    #[test]
    fn transition_in_include_propagates_to_parent() {
        let (catalog, id, mut db, main) = setup();
        let inc = db.add_include("inc.op", "pragma here\n".to_string(), Span::point(main, 6));

        let mut map = DiagStateMap::new(DiagState::default());
        let next = map.clone_cur();
        map.state_mut(next)
            .get_or_add(&catalog, id)
            .severity = Severity::Ignored;
        map.append(&db, Span::point(inc, 3), next);

        // After the include site, the parent sees the included file's state.
        let after_include = map.lookup(&db, Span::point(main, 9));
        assert_eq!(
            map.state(after_include).mapping_for(&catalog, id).severity,
            Severity::Ignored
        );
        // Before the include site it does not.
        let before_include = map.lookup(&db, Span::point(main, 2));
        assert_eq!(
            map.state(before_include).mapping_for(&catalog, id).severity,
            Severity::Warning
        );
    }

    #[test]
    fn same_offset_transition_replaces() {
        let (catalog, id, db, file) = setup();
        let mut map = DiagStateMap::new(DiagState::default());

        let a = map.clone_cur();
        map.state_mut(a).get_or_add(&catalog, id).severity = Severity::Error;
        map.append(&db, Span::point(file, 7), a);

        let b = map.clone_cur();
        map.state_mut(b).get_or_add(&catalog, id).severity = Severity::Ignored;
        map.append(&db, Span::point(file, 7), b);

        let at = map.lookup(&db, Span::point(file, 8));
        assert_eq!(
            map.state(at).mapping_for(&catalog, id).severity,
            Severity::Ignored
        );
    }

    #[test]
    fn clear_pragmas_resets_history() {
        let (catalog, id, db, file) = setup();
        let mut map = DiagStateMap::new(DiagState::default());
        let next = map.clone_cur();
        map.state_mut(next)
            .get_or_add(&catalog, id)
            .severity = Severity::Ignored;
        map.append(&db, Span::point(file, 3), next);
        assert!(map.has_pragmas());

        map.clear_pragmas();
        assert!(!map.has_pragmas());
        assert_eq!(map.cur(), map.first());
        let state = map.lookup(&db, Span::point(file, 10));
        assert_eq!(
            map.state(state).mapping_for(&catalog, id).severity,
            Severity::Warning
        );
    }
}
