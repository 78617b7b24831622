//! Diagnostic argument values.
//!
//! Arguments attached to a diagnostic are rendered lazily, when the message
//! template is interpreted. Most variants render themselves; [`DiagArg::Type`]
//! carries an opaque cookie that a front-end supplied [`ArgRenderer`] turns
//! into text, so this crate stays independent of any type-system
//! representation.

use opal_common::Ident;

/// How a token argument prints into a message.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// A punctuator, quoted: `';'`.
    Punctuator,
    /// A keyword, printed bare: `fn`.
    Keyword,
    /// A descriptive name, printed bare: `identifier`.
    Description,
    /// A raw token class, printed in angle brackets: `<eof>`.
    Raw,
}

/// An opaque cookie identifying a front-end value (typically a type) that an
/// [`ArgRenderer`] knows how to print.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct OpaqueArg(pub u64);

/// One argument of a diagnostic.
#[derive(Clone, Debug)]
pub enum DiagArg {
    /// A signed integer.
    SInt(i64),
    /// An unsigned integer.
    UInt(u64),
    /// A plain string, printed verbatim (after escaping).
    Str(String),
    /// An interned identifier.
    Ident(Ident),
    /// A token spelling with its print style.
    Token(TokenKind, String),
    /// A front-end value rendered through the engine's [`ArgRenderer`].
    Type(OpaqueArg),
}

impl From<i64> for DiagArg {
    fn from(v: i64) -> Self {
        DiagArg::SInt(v)
    }
}

impl From<i32> for DiagArg {
    fn from(v: i32) -> Self {
        DiagArg::SInt(v as i64)
    }
}

impl From<u64> for DiagArg {
    fn from(v: u64) -> Self {
        DiagArg::UInt(v)
    }
}

impl From<u32> for DiagArg {
    fn from(v: u32) -> Self {
        DiagArg::UInt(v as u64)
    }
}

impl From<usize> for DiagArg {
    fn from(v: usize) -> Self {
        DiagArg::UInt(v as u64)
    }
}

impl From<String> for DiagArg {
    fn from(v: String) -> Self {
        DiagArg::Str(v)
    }
}

impl From<&str> for DiagArg {
    fn from(v: &str) -> Self {
        DiagArg::Str(v.to_string())
    }
}

impl From<Ident> for DiagArg {
    fn from(v: Ident) -> Self {
        DiagArg::Ident(v)
    }
}

impl From<OpaqueArg> for DiagArg {
    fn from(v: OpaqueArg) -> Self {
        DiagArg::Type(v)
    }
}

/// Renders [`DiagArg::Type`] arguments into message text.
///
/// `prev` holds the type arguments already rendered for the same message, so
/// an implementation can elide common structure across them.
pub trait ArgRenderer {
    /// Appends the rendering of `value` to `out`.
    fn render(&self, value: OpaqueArg, prev: &[OpaqueArg], out: &mut String);

    /// Appends a structural diff of `from` and `to` to `out`, returning
    /// `true` if a tree-style diff was produced. The default declines, which
    /// makes the formatter fall back to a textual comparison.
    fn render_diff(&self, from: OpaqueArg, to: OpaqueArg, elide: bool, out: &mut String) -> bool {
        let _ = (from, to, elide, out);
        false
    }
}

/// Placeholder renderer used until a front end installs a real one.
pub struct DummyArgRenderer;

impl ArgRenderer for DummyArgRenderer {
    fn render(&self, _value: OpaqueArg, _prev: &[OpaqueArg], out: &mut String) {
        out.push_str("<can't format argument>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_right_variant() {
        assert!(matches!(DiagArg::from(-3i32), DiagArg::SInt(-3)));
        assert!(matches!(DiagArg::from(7u32), DiagArg::UInt(7)));
        assert!(matches!(DiagArg::from("hi"), DiagArg::Str(s) if s == "hi"));
        assert!(matches!(
            DiagArg::from(OpaqueArg(9)),
            DiagArg::Type(OpaqueArg(9))
        ));
    }

    #[test]
    fn dummy_renderer_emits_placeholder() {
        let mut out = String::new();
        DummyArgRenderer.render(OpaqueArg(0), &[], &mut out);
        assert_eq!(out, "<can't format argument>");
        assert!(!DummyArgRenderer.render_diff(OpaqueArg(0), OpaqueArg(1), true, &mut out));
    }
}
