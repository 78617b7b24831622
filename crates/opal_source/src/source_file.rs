//! Source file representation with line-start indexing and presumed paths.

use crate::file_id::FileId;
use std::path::{Path, PathBuf};

/// A `#line`-style directive recorded against a file.
///
/// From `offset` onward the file presents itself under `presumed_path` (and
/// `presumed_line` for the line at `offset`). Directives are recorded in
/// increasing offset order by the preprocessor.
#[derive(Debug, Clone)]
pub struct LineDirective {
    /// Byte offset at which the directive takes effect.
    pub offset: u32,
    /// The path the file claims to be from this point on.
    pub presumed_path: PathBuf,
    /// The line number the next source line claims to have.
    pub presumed_line: u32,
}

/// A source file loaded into the compilation session.
///
/// Stores the file's content along with precomputed line-start offsets for
/// efficient line/column resolution, and any line directives seen while
/// lexing it so diagnostics can use presumed paths for preprocessed input.
pub struct SourceFile {
    /// The unique identifier for this file within the [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The filesystem path of this file (or a synthetic name for in-memory sources).
    pub path: PathBuf,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Line directives in increasing offset order.
    line_directives: Vec<LineDirective>,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
            line_directives: Vec::new(),
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Uses binary search on the precomputed line-start offsets for efficient lookup.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }

    /// Records a line directive taking effect at `offset`.
    ///
    /// Offsets must be recorded in increasing order; a directive at an
    /// already-recorded offset replaces the earlier one.
    pub fn record_line_directive(&mut self, directive: LineDirective) {
        if let Some(last) = self.line_directives.last_mut() {
            assert!(
                last.offset <= directive.offset,
                "line directives recorded out of order"
            );
            if last.offset == directive.offset {
                *last = directive;
                return;
            }
        }
        self.line_directives.push(directive);
    }

    /// Returns the presumed path at `offset`: the path named by the last
    /// line directive at or before `offset`, or the real path if none.
    pub fn presumed_path(&self, offset: u32) -> &Path {
        let idx = self
            .line_directives
            .partition_point(|d| d.offset <= offset);
        if idx == 0 {
            &self.path
        } else {
            &self.line_directives[idx - 1].presumed_path
        }
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("main.op"),
            content.to_string(),
        )
    }

    #[test]
    fn line_starts_computation() {
        let f = make_file("let x\nlet y\nfn z");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(6), (2, 1));
        assert_eq!(f.line_col(12), (3, 1));
    }

    #[test]
    fn line_col_mid_line() {
        let f = make_file("abc\ndef\nghi");
        assert_eq!(f.line_col(5), (2, 2));
        assert_eq!(f.line_col(8), (3, 1));
    }

    #[test]
    fn snippet_extraction() {
        let f = make_file("hello world");
        assert_eq!(f.snippet(0, 5), "hello");
        assert_eq!(f.snippet(6, 11), "world");
    }

    #[test]
    fn empty_file() {
        let f = make_file("");
        assert_eq!(f.line_col(0), (1, 1));
    }

    #[test]
    fn presumed_path_without_directives() {
        let f = make_file("fn main() {}\n");
        assert_eq!(f.presumed_path(5), Path::new("main.op"));
    }

    #[test]
    fn presumed_path_follows_directives() {
        let mut f = make_file("a\nb\nc\nd\n");
        f.record_line_directive(LineDirective {
            offset: 2,
            presumed_path: PathBuf::from("generated.op"),
            presumed_line: 100,
        });
        f.record_line_directive(LineDirective {
            offset: 6,
            presumed_path: PathBuf::from("template.op"),
            presumed_line: 1,
        });
        assert_eq!(f.presumed_path(0), Path::new("main.op"));
        assert_eq!(f.presumed_path(2), Path::new("generated.op"));
        assert_eq!(f.presumed_path(5), Path::new("generated.op"));
        assert_eq!(f.presumed_path(7), Path::new("template.op"));
    }

    #[test]
    fn directive_at_same_offset_replaces() {
        let mut f = make_file("a\nb\n");
        f.record_line_directive(LineDirective {
            offset: 2,
            presumed_path: PathBuf::from("first.op"),
            presumed_line: 1,
        });
        f.record_line_directive(LineDirective {
            offset: 2,
            presumed_path: PathBuf::from("second.op"),
            presumed_line: 1,
        });
        assert_eq!(f.presumed_path(3), Path::new("second.op"));
    }
}
