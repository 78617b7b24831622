//! File-pattern based warning suppression.
//!
//! A suppression mapping file silences warning groups for sources whose
//! presumed path matches a glob. The format is section based:
//!
//! ```text
//! # silence everything in vendored code
//! [unused]
//! src:vendor/*
//! src:vendor/mine/*=emit
//! ```
//!
//! Sections name diagnostic groups; `src:` entries carry globs over presumed
//! file paths. The optional `=emit` category re-enables a subset of an
//! otherwise suppressed pattern. Each diagnostic is owned by the last
//! section in the file that names a group containing it; within that
//! section, the longest matching pattern text wins, with ties going to the
//! entry defined later.

use crate::catalog::{Catalog, DiagnosticId, Flavor};
use std::collections::HashMap;
use thiserror::Error;

/// A parse failure in a suppression mapping file.
#[derive(Debug, Error)]
pub enum SuppressionParseError {
    /// A line that is neither a section header, an `entity:glob` entry, nor
    /// a comment.
    #[error("malformed line {line}: '{content}'")]
    MalformedLine {
        /// 1-based line number.
        line: u32,
        /// The offending line, trimmed.
        content: String,
    },
    /// A glob pattern that failed to compile.
    #[error("invalid glob at line {line}: {source}")]
    BadGlob {
        /// 1-based line number.
        line: u32,
        /// The underlying pattern error.
        #[source]
        source: glob::PatternError,
    },
}

#[derive(Debug)]
struct RawEntry {
    entity: String,
    pattern: glob::Pattern,
    pattern_text: String,
    category: String,
}

#[derive(Debug)]
struct RawSection {
    name: String,
    entries: Vec<RawEntry>,
}

/// The sections of a suppression mapping file, before group names have been
/// resolved against a [`Catalog`].
#[derive(Debug)]
pub struct ParsedSuppressions {
    sections: Vec<RawSection>,
}

/// Parses the text of a suppression mapping file.
///
/// Entries appearing before any section header land in an implicit `*`
/// section, which [`ParsedSuppressions::resolve`] later discards: suppression
/// is meaningful per diagnostic group only.
pub fn parse_suppressions(text: &str) -> Result<ParsedSuppressions, SuppressionParseError> {
    let mut sections = vec![RawSection {
        name: "*".to_string(),
        entries: Vec::new(),
    }];

    for (index, raw_line) in text.lines().enumerate() {
        let line = index as u32 + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(inner) = trimmed.strip_prefix('[') {
            let name = inner
                .strip_suffix(']')
                .filter(|n| !n.is_empty())
                .ok_or_else(|| SuppressionParseError::MalformedLine {
                    line,
                    content: trimmed.to_string(),
                })?;
            sections.push(RawSection {
                name: name.to_string(),
                entries: Vec::new(),
            });
            continue;
        }
        let (entity, rest) =
            trimmed
                .split_once(':')
                .ok_or_else(|| SuppressionParseError::MalformedLine {
                    line,
                    content: trimmed.to_string(),
                })?;
        let (pattern_text, category) = match rest.split_once('=') {
            Some((glob, category)) => (glob, category),
            None => (rest, ""),
        };
        let pattern = glob::Pattern::new(pattern_text)
            .map_err(|source| SuppressionParseError::BadGlob { line, source })?;
        // Sections is never empty: the implicit "*" section is pushed first.
        let section_index = sections.len() - 1;
        sections[section_index].entries.push(RawEntry {
            entity: entity.to_string(),
            pattern,
            pattern_text: pattern_text.to_string(),
            category: category.to_string(),
        });
    }

    Ok(ParsedSuppressions { sections })
}

/// Resolved suppression rules, ready for per-diagnostic queries.
pub struct SuppressionMapping {
    sections: Vec<Vec<RawEntry>>,
    owner: HashMap<DiagnosticId, usize>,
}

impl ParsedSuppressions {
    /// Resolves section names against the catalog's diagnostic groups.
    ///
    /// Returns the mapping plus the section names that matched no known
    /// group; the caller reports those. The implicit `*` section is dropped.
    /// When several sections name groups containing the same diagnostic,
    /// the last one declared takes it over.
    pub fn resolve(self, catalog: &Catalog) -> (SuppressionMapping, Vec<String>) {
        let mut sections = Vec::new();
        let mut owner = HashMap::new();
        let mut unknown = Vec::new();
        for raw in self.sections {
            if raw.name == "*" {
                continue;
            }
            match catalog.group_members(Flavor::WarningOrError, &raw.name) {
                Some(members) => {
                    for id in members {
                        owner.insert(id, sections.len());
                    }
                    sections.push(raw.entries);
                }
                None => unknown.push(raw.name),
            }
        }
        (SuppressionMapping { sections, owner }, unknown)
    }
}

impl SuppressionMapping {
    /// Returns `true` if diagnostic `id` should be silenced for a source
    /// with the given presumed path.
    ///
    /// Only the diagnostic's owning section is consulted; globs in sections
    /// it used to belong to do not participate.
    pub fn is_suppressed(&self, id: DiagnosticId, path: &str) -> bool {
        let path = path.strip_prefix("./").unwrap_or(path);
        let entries = match self.owner.get(&id) {
            Some(&index) => &self.sections[index],
            None => return false,
        };
        let mut best: Option<(usize, bool)> = None;
        for entry in entries {
            if entry.entity != "src" || !entry.pattern.matches(path) {
                continue;
            }
            let len = entry.pattern_text.len();
            if best.map_or(true, |(best_len, _)| len >= best_len) {
                best = Some((len, entry.category != "emit"));
            }
        }
        best.map_or(false, |(_, suppressed)| suppressed)
    }
}
