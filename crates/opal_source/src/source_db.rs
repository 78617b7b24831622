//! Central database of all source files in a compilation session.

use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::{LineDirective, SourceFile};
use crate::span::Span;
use std::io;
use std::path::{Path, PathBuf};

/// The source database, owning all loaded source text and resolving
/// [`FileId`] + byte offsets to line/column coordinates for diagnostics.
///
/// Besides text and paths, the database records the inclusion graph: when a
/// file is brought in via `add_include`, the span of the include directive in
/// the including file is remembered and exposed through [`include_site`]
/// (used by the diagnostics engine to inherit severity state across files).
///
/// [`include_site`]: SourceDb::include_site
pub struct SourceDb {
    files: Vec<SourceFile>,
    /// Per file: the (file, offset) of the include directive that brought it
    /// in, or `None` for top-level files.
    include_sites: Vec<Option<(FileId, u32)>>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            include_sites: Vec::new(),
        }
    }

    /// Loads a top-level source file from the filesystem and returns its [`FileId`].
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.push_file(path.to_path_buf(), content, None))
    }

    /// Adds a top-level source file from an in-memory string (useful for tests).
    ///
    /// The `name` parameter is used as the file path in diagnostics.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        self.push_file(name.into(), content, None)
    }

    /// Adds a source file included from `included_from` (the span of the
    /// include directive in the including file).
    pub fn add_include(
        &mut self,
        name: impl Into<PathBuf>,
        content: String,
        included_from: Span,
    ) -> FileId {
        assert!(!included_from.is_dummy(), "include site must be a real location");
        self.push_file(
            name.into(),
            content,
            Some((included_from.file, included_from.start)),
        )
    }

    fn push_file(
        &mut self,
        path: PathBuf,
        content: String,
        site: Option<(FileId, u32)>,
    ) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path, content));
        self.include_sites.push(site);
        id
    }

    /// Returns the (file, byte offset) of the include directive that brought
    /// in `id`, or `None` for top-level files.
    pub fn include_site(&self, id: FileId) -> Option<(FileId, u32)> {
        self.include_sites[id.as_raw() as usize]
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` is invalid.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Records a line directive against a file.
    pub fn record_line_directive(&mut self, id: FileId, directive: LineDirective) {
        self.files[id.as_raw() as usize].record_line_directive(directive);
    }

    /// Returns the presumed (post-directive) path for a location.
    pub fn presumed_path(&self, id: FileId, offset: u32) -> &Path {
        self.get_file(id).presumed_path(offset)
    }

    /// Resolves a [`Span`] to human-readable line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.saturating_sub(1).max(span.start));
        ResolvedSpan {
            file_path: file.path.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the source text corresponding to a [`Span`].
    pub fn snippet(&self, span: Span) -> &str {
        let file = self.get_file(span.file);
        file.snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
