//! Reusable backing storage for in-flight diagnostics.
//!
//! Building a diagnostic allocates vectors for its arguments, ranges, and
//! fix-it hints. Diagnostics are reported constantly, so the engine keeps a
//! small pool of cleared storage blocks and hands them back out instead of
//! reallocating each time.

use crate::arg::DiagArg;
use crate::fixit::FixItHint;
use opal_source::Span;

/// Maximum number of storage blocks kept for reuse.
const NUM_CACHED: usize = 16;

/// The payload of one in-flight diagnostic.
#[derive(Default, Debug)]
pub struct DiagnosticStorage {
    /// Message template arguments, in `%N` order.
    pub args: Vec<DiagArg>,
    /// Source ranges to highlight.
    pub ranges: Vec<Span>,
    /// Suggested edits.
    pub fixits: Vec<FixItHint>,
}

impl DiagnosticStorage {
    fn clear(&mut self) {
        self.args.clear();
        self.ranges.clear();
        self.fixits.clear();
    }
}

/// Free list of [`DiagnosticStorage`] blocks.
#[derive(Default)]
pub struct StoragePool {
    cached: Vec<DiagnosticStorage>,
}

impl StoragePool {
    /// Takes a cleared storage block, reusing a cached one when available.
    pub fn alloc(&mut self) -> DiagnosticStorage {
        self.cached.pop().unwrap_or_default()
    }

    /// Returns a block to the pool. Blocks beyond the cache cap are dropped.
    pub fn release(&mut self, mut storage: DiagnosticStorage) {
        if self.cached.len() < NUM_CACHED {
            storage.clear();
            self.cached.push(storage);
        }
    }
}
