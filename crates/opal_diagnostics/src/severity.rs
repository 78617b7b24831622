//! Diagnostic severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The severity level of a diagnostic message.
///
/// Ordered from least severe (`Ignored`) to most severe (`Fatal`), matching
/// the derived `PartialOrd`/`Ord` implementation based on declaration order.
///
/// `Note` is special: notes never have a mapping of their own, and their
/// visibility rides on the preceding non-note diagnostic's visibility.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// The diagnostic is not emitted at all.
    Ignored,
    /// Additional context attached to the preceding diagnostic.
    Note,
    /// An informational remark about the translation itself.
    Remark,
    /// A potential issue that does not prevent compilation.
    Warning,
    /// A definite problem that prevents successful compilation.
    Error,
    /// An error severe enough to stop the compilation immediately.
    Fatal,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error) or
    /// [`Fatal`](Severity::Fatal).
    pub fn is_error(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Ignored => write!(f, "ignored"),
            Severity::Note => write!(f, "note"),
            Severity::Remark => write!(f, "remark"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Fatal => write!(f, "fatal error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Severity::Ignored < Severity::Note);
        assert!(Severity::Note < Severity::Remark);
        assert!(Severity::Remark < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn is_error() {
        assert!(Severity::Error.is_error());
        assert!(Severity::Fatal.is_error());
        assert!(!Severity::Warning.is_error());
        assert!(!Severity::Note.is_error());
        assert!(!Severity::Ignored.is_error());
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Note), "note");
        assert_eq!(format!("{}", Severity::Fatal), "fatal error");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&Severity::Remark).unwrap();
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Remark);
    }
}
