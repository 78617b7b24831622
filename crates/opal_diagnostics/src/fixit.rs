//! Suggested source edits attached to diagnostics.

use opal_source::Span;
use serde::{Deserialize, Serialize};

/// A suggested edit: replace the text covered by `span` with `new_text`.
///
/// An empty span inserts; empty replacement text removes.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct FixItHint {
    /// The range of source text to replace.
    pub span: Span,
    /// The replacement text.
    pub new_text: String,
}

impl FixItHint {
    /// Inserts `text` at the start of `at`.
    pub fn insert(at: Span, text: impl Into<String>) -> Self {
        Self {
            span: Span::point(at.file, at.start),
            new_text: text.into(),
        }
    }

    /// Replaces the text covered by `span` with `text`.
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: text.into(),
        }
    }

    /// Removes the text covered by `span`.
    pub fn remove(span: Span) -> Self {
        Self {
            span,
            new_text: String::new(),
        }
    }

    /// `true` for a pure insertion.
    pub fn is_insertion(&self) -> bool {
        self.span.is_empty() && !self.new_text.is_empty()
    }

    /// `true` for a pure removal.
    pub fn is_removal(&self) -> bool {
        !self.span.is_empty() && self.new_text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opal_source::FileId;

    #[test]
    fn constructors_classify_correctly() {
        let file = FileId::from_raw(0);
        let span = Span::new(file, 4, 9);
        assert!(FixItHint::insert(span, "mut ").is_insertion());
        assert!(FixItHint::remove(span).is_removal());
        let replace = FixItHint::replace(span, "other");
        assert!(!replace.is_insertion());
        assert!(!replace.is_removal());
        assert_eq!(replace.new_text, "other");
    }
}
