//! Message template interpretation.
//!
//! Diagnostic templates are plain text with `%`-directives:
//!
//! * `%0` .. `%9` substitute an argument.
//! * `%%`, `%programlisting` punctuation: `%` followed by any punctuation
//!   character emits that character literally.
//! * `%select{a|b|c}N` picks a clause by the value of integer argument `N`.
//! * `%sN` emits `s` when argument `N` is not 1.
//! * `%plural{expr:clause|...}N` picks a clause by matching `N` against
//!   number, range, or modulo conditions; an empty condition always matches.
//! * `%ordinalN` prints `1st`, `2nd`, `21st`, `11th`, ...
//! * `%humanN` prints large counts with a unit suffix, e.g. `1.23M`.
//! * `%qN` quotes a string argument.
//! * `%diff{before $ middle $ after|fallback}N,M` compares two arguments;
//!   for type arguments a renderer-produced tree may replace the inline form.
//!
//! Clauses nest: a `%select` clause may itself contain any directive.
//! Argument text is escaped before insertion so control characters and
//! invalid UTF-8 cannot corrupt the output stream.

use crate::arg::{ArgRenderer, DiagArg, OpaqueArg, TokenKind};
use crate::catalog::Catalog;
use crate::diagnostic::Diagnostic;
use opal_common::Interner;

/// Appends `input` to `out` with unprintable content made visible.
///
/// Printable ASCII and ASCII whitespace pass through. Other valid UTF-8
/// stays intact unless the code point is a control character or a Unicode
/// noncharacter, which becomes `<U+XXXX>`. Bytes that are not part of a
/// valid UTF-8 sequence become `<XX>`.
pub fn escape_bytes(input: &[u8], out: &mut String) {
    out.reserve(input.len());
    let mut i = 0;
    while i < input.len() {
        let b = input[i];
        if (0x20..0x7f).contains(&b) || matches!(b, b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r') {
            out.push(b as char);
            i += 1;
            continue;
        }
        if b < 0x80 {
            // ASCII control character other than whitespace.
            out.push_str(&format!("<U+{:04X}>", b as u32));
            i += 1;
            continue;
        }
        let width = utf8_sequence_len(b);
        if width > 1 && i + width <= input.len() {
            if let Ok(s) = std::str::from_utf8(&input[i..i + width]) {
                if let Some(c) = s.chars().next() {
                    if is_escaped_codepoint(c) {
                        out.push_str(&format!("<U+{:04X}>", c as u32));
                    } else {
                        out.push(c);
                    }
                    i += width;
                    continue;
                }
            }
        }
        // Invalid sequence: escape one byte and resynchronize.
        out.push_str(&format!("<{b:02X}>"));
        i += 1;
    }
}

/// Control characters and Unicode noncharacters (U+FDD0..=U+FDEF and the
/// two final code points of every plane) have no visible rendering.
fn is_escaped_codepoint(c: char) -> bool {
    let v = c as u32;
    c.is_control() || (0xFDD0..=0xFDEF).contains(&v) || (v & 0xFFFE) == 0xFFFE
}

/// [`escape_bytes`] for strings; invalid sequences cannot occur here, so
/// only control characters and noncharacters are rewritten.
pub fn escape_string(input: &str, out: &mut String) {
    escape_bytes(input.as_bytes(), out);
}

fn utf8_sequence_len(first: u8) -> usize {
    match first {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

/// Finds `target` at nesting depth zero within `s`, skipping over
/// `%`-directives and their brace-delimited clauses. Returns `s.len()` if
/// the target does not occur.
fn scan_format(s: &[u8], target: u8) -> usize {
    let mut depth = 0usize;
    let mut i = 0;
    while i < s.len() {
        if depth == 0 && s[i] == target {
            return i;
        }
        if depth != 0 && s[i] == b'}' {
            depth -= 1;
        }
        if s[i] == b'%' {
            i += 1;
            if i == s.len() {
                break;
            }
            // Escaped punctuation and plain %N are skipped implicitly; a
            // modifier name may open a clause, which raises the depth.
            if !s[i].is_ascii_digit() && !s[i].is_ascii_punctuation() {
                i += 1;
                while i < s.len() && !s[i].is_ascii_digit() && s[i] != b'{' {
                    i += 1;
                }
                if i == s.len() {
                    break;
                }
                if s[i] == b'{' {
                    depth += 1;
                }
            }
        }
        i += 1;
    }
    s.len()
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Modifier {
    None,
    Select,
    S,
    Plural,
    Ordinal,
    Human,
    Quoted,
    Diff,
}

impl Modifier {
    fn parse(name: &str) -> Modifier {
        match name {
            "" => Modifier::None,
            "select" => Modifier::Select,
            "s" => Modifier::S,
            "plural" => Modifier::Plural,
            "ordinal" => Modifier::Ordinal,
            "human" => Modifier::Human,
            "q" => Modifier::Quoted,
            "diff" => Modifier::Diff,
            other => {
                debug_assert!(false, "unknown format modifier '{other}'");
                Modifier::None
            }
        }
    }
}

/// Everything needed to turn a [`Diagnostic`] into message text.
///
/// Borrowed from the engine and passed to consumers alongside each
/// diagnostic, so rendering stays lazy: a consumer that drops a diagnostic
/// never pays for formatting it.
pub struct FormatContext<'a> {
    /// Source of message templates.
    pub catalog: &'a Catalog,
    /// Resolves identifier arguments.
    pub interner: &'a Interner,
    /// Renders opaque type arguments.
    pub renderer: &'a dyn ArgRenderer,
    /// Elide common structure when printing type pairs.
    pub elide_type: bool,
    /// Prefer tree-style type diffs when the renderer supports them.
    pub print_type_tree: bool,
}

impl FormatContext<'_> {
    /// Renders the message text of `diag` into `out`.
    pub fn format_diagnostic(&self, diag: &Diagnostic, out: &mut String) {
        if let Some(text) = diag.preformatted() {
            out.push_str(text);
            return;
        }
        let template = self.catalog.description(diag.id());
        // Fast path for ad-hoc diagnostics carrying their whole message as
        // a single string argument.
        if template == "%0" {
            if let Some(DiagArg::Str(s)) = diag.args().first() {
                escape_string(s, out);
                return;
            }
        }
        self.format_template(template, diag.args(), out);
    }

    /// Interprets `template` against `args`, appending the result to `out`.
    pub fn format_template(&self, template: &str, args: &[DiagArg], out: &mut String) {
        let mut types_seen = Vec::new();
        let mut tree = String::new();
        self.format_inner(template, args, &mut types_seen, &mut tree, out);
        // Tree-style type diffs print after the main message.
        out.push_str(&tree);
    }

    fn format_inner(
        &self,
        template: &str,
        args: &[DiagArg],
        types_seen: &mut Vec<OpaqueArg>,
        tree: &mut String,
        out: &mut String,
    ) {
        let bytes = template.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'%' {
                let start = i;
                while i < bytes.len() && bytes[i] != b'%' {
                    i += 1;
                }
                out.push_str(&template[start..i]);
                continue;
            }
            if i + 1 < bytes.len() && bytes[i + 1].is_ascii_punctuation() {
                out.push(bytes[i + 1] as char);
                i += 2;
                continue;
            }
            i += 1;

            let mut modifier = Modifier::None;
            let mut clause = "";
            if i < bytes.len() && !bytes[i].is_ascii_digit() {
                let name_start = i;
                while i < bytes.len() && (bytes[i] == b'-' || bytes[i].is_ascii_lowercase()) {
                    i += 1;
                }
                modifier = Modifier::parse(&template[name_start..i]);
                if i < bytes.len() && bytes[i] == b'{' {
                    i += 1;
                    let clause_start = i;
                    i = clause_start + scan_format(&bytes[clause_start..], b'}');
                    clause = &template[clause_start..i];
                    i += 1;
                }
            }
            debug_assert!(
                i < bytes.len() && bytes[i].is_ascii_digit(),
                "malformed template: directive without argument number"
            );
            if i >= bytes.len() || !bytes[i].is_ascii_digit() {
                return;
            }
            let arg_no = (bytes[i] - b'0') as usize;
            i += 1;

            if modifier == Modifier::Diff {
                debug_assert!(
                    i + 1 < bytes.len() && bytes[i] == b',' && bytes[i + 1].is_ascii_digit(),
                    "malformed %diff: expected second argument number"
                );
                if i + 1 >= bytes.len() || bytes[i] != b',' || !bytes[i + 1].is_ascii_digit() {
                    return;
                }
                let arg_no2 = (bytes[i + 1] - b'0') as usize;
                i += 2;
                self.format_diff(clause, arg_no, arg_no2, args, types_seen, tree, out);
                continue;
            }

            match &args[arg_no] {
                DiagArg::Str(s) => {
                    if modifier == Modifier::Quoted {
                        out.push('\'');
                        escape_string(s, out);
                        out.push('\'');
                    } else {
                        debug_assert_eq!(modifier, Modifier::None);
                        escape_string(s, out);
                    }
                }
                DiagArg::Ident(ident) => {
                    out.push('\'');
                    escape_string(self.interner.resolve(*ident), out);
                    out.push('\'');
                }
                DiagArg::SInt(v) => {
                    self.format_int(*v, modifier, clause, args, out);
                }
                DiagArg::UInt(v) => match modifier {
                    Modifier::None => out.push_str(&v.to_string()),
                    m => self.format_int(i64::try_from(*v).unwrap_or(i64::MAX), m, clause, args, out),
                },
                DiagArg::Token(kind, spelling) => match kind {
                    TokenKind::Punctuator => {
                        out.push('\'');
                        out.push_str(spelling);
                        out.push('\'');
                    }
                    TokenKind::Keyword | TokenKind::Description => out.push_str(spelling),
                    TokenKind::Raw => {
                        out.push('<');
                        out.push_str(spelling);
                        out.push('>');
                    }
                },
                DiagArg::Type(value) => {
                    // The renderer handles its own quoting.
                    self.renderer.render(*value, types_seen, out);
                    types_seen.push(*value);
                }
            }
        }
    }

    fn format_int(
        &self,
        value: i64,
        modifier: Modifier,
        clause: &str,
        args: &[DiagArg],
        out: &mut String,
    ) {
        match modifier {
            Modifier::Select => {
                debug_assert!(value >= 0, "%select with a negative argument");
                let picked = select_clause(clause, value.max(0) as usize);
                self.format_template(picked, args, out);
            }
            Modifier::S => {
                if value != 1 {
                    out.push('s');
                }
            }
            Modifier::Plural => {
                debug_assert!(value >= 0, "%plural with a negative argument");
                self.format_plural(value.max(0) as u64, clause, args, out);
            }
            Modifier::Ordinal => {
                debug_assert!(value > 0, "%ordinal needs a strictly positive argument");
                let v = value.max(1) as u64;
                out.push_str(&v.to_string());
                out.push_str(ordinal_suffix(v));
            }
            Modifier::Human => format_human(value, out),
            _ => {
                debug_assert_eq!(modifier, Modifier::None);
                out.push_str(&value.to_string());
            }
        }
    }

    fn format_plural(&self, value: u64, clause: &str, args: &[DiagArg], out: &mut String) {
        let mut rest = clause;
        loop {
            let colon = match rest.as_bytes().iter().position(|&b| b == b':') {
                Some(p) => p,
                None => {
                    debug_assert!(false, "%plural clause without condition terminator");
                    return;
                }
            };
            if eval_plural_condition(value, &rest[..colon]) {
                let body = &rest[colon + 1..];
                let end = scan_format(body.as_bytes(), b'|');
                self.format_template(&body[..end], args, out);
                return;
            }
            let next = scan_format(rest.as_bytes(), b'|');
            if next >= rest.len() {
                debug_assert!(false, "%plural expression matched no clause");
                return;
            }
            rest = &rest[next + 1..];
        }
    }

    /// `%diff{before $ middle $ after|fallback}N,M`. For a pair of type
    /// arguments, first try a renderer-produced tree: on success the
    /// fallback clause is emitted inline and the tree trails the message.
    /// Otherwise the first clause is used with the two renderings replacing
    /// the `$` anchors. Non-type pairs expand to the first clause with plain
    /// `%N`/`%M` substitution.
    fn format_diff(
        &self,
        clause: &str,
        arg_no: usize,
        arg_no2: usize,
        args: &[DiagArg],
        types_seen: &mut Vec<OpaqueArg>,
        tree: &mut String,
        out: &mut String,
    ) {
        let bytes = clause.as_bytes();
        let pipe = scan_format(bytes, b'|');
        let inline = &clause[..pipe];
        let type_pair = match (&args[arg_no], &args[arg_no2]) {
            (DiagArg::Type(from), DiagArg::Type(to)) => Some((*from, *to)),
            _ => None,
        };

        if let Some((from, to)) = type_pair {
            if self.print_type_tree && tree.is_empty() {
                let mut rendered = String::new();
                if self.renderer.render_diff(from, to, self.elide_type, &mut rendered) {
                    tree.push_str(&rendered);
                    if pipe < clause.len() {
                        self.format_inner(&clause[pipe + 1..], args, types_seen, tree, out);
                    }
                    return;
                }
            }
        }

        let inline_bytes = inline.as_bytes();
        let first = scan_format(inline_bytes, b'$');
        debug_assert!(first < inline.len(), "%diff clause without $ anchors");
        let after_first = &inline[(first + 1).min(inline.len())..];
        let second = scan_format(after_first.as_bytes(), b'$');

        self.format_inner(&inline[..first], args, types_seen, tree, out);
        self.emit_diff_operand(arg_no, args, types_seen, tree, out);
        self.format_inner(&after_first[..second], args, types_seen, tree, out);
        self.emit_diff_operand(arg_no2, args, types_seen, tree, out);
        self.format_inner(&after_first[(second + 1).min(after_first.len())..], args, types_seen, tree, out);
    }

    fn emit_diff_operand(
        &self,
        arg_no: usize,
        args: &[DiagArg],
        types_seen: &mut Vec<OpaqueArg>,
        tree: &mut String,
        out: &mut String,
    ) {
        let directive = format!("%{arg_no}");
        self.format_inner(&directive, args, types_seen, tree, out);
    }
}

/// Returns the `index`th `|`-separated alternative of a `%select` clause.
fn select_clause(clause: &str, index: usize) -> &str {
    let mut rest = clause;
    for _ in 0..index {
        let next = scan_format(rest.as_bytes(), b'|');
        debug_assert!(next < rest.len(), "%select index out of range");
        if next >= rest.len() {
            return "";
        }
        rest = &rest[next + 1..];
    }
    let end = scan_format(rest.as_bytes(), b'|');
    &rest[..end]
}

/// Evaluates one `%plural` condition against `value`. Conditions are
/// comma-separated alternatives of exact numbers, `[low,high]` ranges, or
/// `%mod=test` forms; the empty condition always matches.
fn eval_plural_condition(value: u64, cond: &str) -> bool {
    if cond.is_empty() {
        return true;
    }
    let bytes = cond.as_bytes();
    let mut i = 0;
    loop {
        if i < bytes.len() && bytes[i] == b'%' {
            i += 1;
            let divisor = parse_plural_number(bytes, &mut i);
            debug_assert!(
                i < bytes.len() && bytes[i] == b'=',
                "bad %plural syntax: expected ="
            );
            if i < bytes.len() && bytes[i] == b'=' {
                i += 1;
            }
            debug_assert!(divisor != 0, "bad %plural syntax: modulo by zero");
            let remainder = value.checked_rem(divisor).unwrap_or(value);
            if test_plural_range(remainder, bytes, &mut i) {
                return true;
            }
        } else if test_plural_range(value, bytes, &mut i) {
            return true;
        }
        match bytes.get(i..).and_then(|rest| rest.iter().position(|&b| b == b',')) {
            Some(p) => i += p + 1,
            None => return false,
        }
    }
}

fn test_plural_range(value: u64, bytes: &[u8], i: &mut usize) -> bool {
    if *i < bytes.len() && bytes[*i] != b'[' {
        return parse_plural_number(bytes, i) == value;
    }
    *i += 1;
    let low = parse_plural_number(bytes, i);
    debug_assert!(*i < bytes.len() && bytes[*i] == b',', "bad %plural range");
    if *i < bytes.len() && bytes[*i] == b',' {
        *i += 1;
    }
    let high = parse_plural_number(bytes, i);
    debug_assert!(*i < bytes.len() && bytes[*i] == b']', "bad %plural range");
    if *i < bytes.len() && bytes[*i] == b']' {
        *i += 1;
    }
    (low..=high).contains(&value)
}

fn parse_plural_number(bytes: &[u8], i: &mut usize) -> u64 {
    let mut value = 0u64;
    while *i < bytes.len() && bytes[*i].is_ascii_digit() {
        value = value * 10 + (bytes[*i] - b'0') as u64;
        *i += 1;
    }
    value
}

fn ordinal_suffix(value: u64) -> &'static str {
    match value % 100 {
        11..=13 => "th",
        _ => match value % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    }
}

/// Prints `value` scaled to the largest fitting unit, e.g. `1.23M`.
fn format_human(value: i64, out: &mut String) {
    const UNITS: [(i128, char); 4] = [
        (1_000_000_000_000, 'T'),
        (1_000_000_000, 'G'),
        (1_000_000, 'M'),
        (1_000, 'k'),
    ];
    let mut v = value as i128;
    if v < 0 {
        out.push('-');
        v = -v;
    }
    for (size, sign) in UNITS {
        if v >= size {
            out.push_str(&format!("{:.2}{}", v as f64 / size as f64, sign));
            return;
        }
    }
    out.push_str(&v.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::DummyArgRenderer;

    fn render(template: &str, args: &[DiagArg]) -> String {
        let catalog = Catalog::new();
        let interner = Interner::new();
        let ctx = FormatContext {
            catalog: &catalog,
            interner: &interner,
            renderer: &DummyArgRenderer,
            elide_type: true,
            print_type_tree: false,
        };
        let mut out = String::new();
        ctx.format_template(template, args, &mut out);
        out
    }

    #[test]
    fn plain_substitution_and_literal_percent() {
        assert_eq!(
            render("100%% of %0 uses", &["memory".into()]),
            "100% of memory uses"
        );
        assert_eq!(render("found %0 item%s0", &[1u32.into()]), "found 1 item");
        assert_eq!(render("found %0 item%s0", &[4u32.into()]), "found 4 items");
    }

    #[test]
    fn select_picks_clause() {
        let t = "this is a %select{function|method|closure}0";
        assert_eq!(render(t, &[0u32.into()]), "this is a function");
        assert_eq!(render(t, &[2u32.into()]), "this is a closure");
    }

    #[test]
    fn select_clauses_nest() {
        let t = "%select{outer %select{a|b}1|skip}0";
        assert_eq!(render(t, &[0u32.into(), 1u32.into()]), "outer b");
    }

    #[test]
    fn plural_exact_range_and_modulo() {
        let t = "%plural{1:one|[2,4]:a few|%10=0:round|:many}0";
        assert_eq!(render(t, &[1u32.into()]), "one");
        assert_eq!(render(t, &[3u32.into()]), "a few");
        assert_eq!(render(t, &[30u32.into()]), "round");
        assert_eq!(render(t, &[7u32.into()]), "many");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(render("%ordinal0", &[1u32.into()]), "1st");
        assert_eq!(render("%ordinal0", &[2u32.into()]), "2nd");
        assert_eq!(render("%ordinal0", &[3u32.into()]), "3rd");
        assert_eq!(render("%ordinal0", &[4u32.into()]), "4th");
        assert_eq!(render("%ordinal0", &[11u32.into()]), "11th");
        assert_eq!(render("%ordinal0", &[12u32.into()]), "12th");
        assert_eq!(render("%ordinal0", &[13u32.into()]), "13th");
        assert_eq!(render("%ordinal0", &[21u32.into()]), "21st");
        assert_eq!(render("%ordinal0", &[112u32.into()]), "112th");
    }

    #[test]
    fn human_readable_counts() {
        assert_eq!(render("%human0", &[DiagArg::SInt(912)]), "912");
        assert_eq!(render("%human0", &[DiagArg::SInt(1_230_000)]), "1.23M");
        assert_eq!(render("%human0", &[DiagArg::SInt(2_000)]), "2.00k");
        assert_eq!(
            render("%human0", &[DiagArg::SInt(-3_000_000_000)]),
            "-3.00G"
        );
        assert_eq!(
            render("%human0", &[DiagArg::SInt(1_500_000_000_000)]),
            "1.50T"
        );
    }

    #[test]
    fn quoted_strings_and_identifiers() {
        assert_eq!(
            render("use of %q0 here", &["old_api".into()]),
            "use of 'old_api' here"
        );
        let catalog = Catalog::new();
        let interner = Interner::new();
        let name = interner.get_or_intern("counter");
        let ctx = FormatContext {
            catalog: &catalog,
            interner: &interner,
            renderer: &DummyArgRenderer,
            elide_type: true,
            print_type_tree: false,
        };
        let mut out = String::new();
        ctx.format_template("unused variable %0", &[name.into()], &mut out);
        assert_eq!(out, "unused variable 'counter'");
    }

    #[test]
    fn token_kinds_print_distinctly() {
        assert_eq!(
            render(
                "expected %0 after %1, got %2",
                &[
                    DiagArg::Token(TokenKind::Punctuator, ";".into()),
                    DiagArg::Token(TokenKind::Keyword, "let".into()),
                    DiagArg::Token(TokenKind::Raw, "eof".into()),
                ]
            ),
            "expected ';' after let, got <eof>"
        );
    }

    #[test]
    fn type_arguments_use_the_renderer() {
        assert_eq!(
            render("cannot convert %0", &[OpaqueArg(7).into()]),
            "cannot convert <can't format argument>"
        );
    }

    #[test]
    fn diff_falls_back_to_textual_comparison() {
        let rendered = render(
            "%diff{cannot assign $ to $|types differ}0,1",
            &["int".into(), "string".into()],
        );
        assert_eq!(rendered, "cannot assign int to string");
    }

    #[test]
    fn diff_tree_path_uses_fallback_clause() {
        struct TreeRenderer;
        impl ArgRenderer for TreeRenderer {
            fn render(&self, _: OpaqueArg, _: &[OpaqueArg], out: &mut String) {
                out.push_str("T");
            }
            fn render_diff(
                &self,
                _: OpaqueArg,
                _: OpaqueArg,
                _: bool,
                out: &mut String,
            ) -> bool {
                out.push_str("\n  [A != B]");
                true
            }
        }
        let catalog = Catalog::new();
        let interner = Interner::new();
        let ctx = FormatContext {
            catalog: &catalog,
            interner: &interner,
            renderer: &TreeRenderer,
            elide_type: true,
            print_type_tree: true,
        };
        let mut out = String::new();
        ctx.format_template(
            "%diff{cannot assign $ to $|types differ}0,1",
            &[OpaqueArg(1).into(), OpaqueArg(2).into()],
            &mut out,
        );
        assert_eq!(out, "types differ\n  [A != B]");
    }

    #[test]
    fn escaping_makes_bytes_visible() {
        let mut out = String::new();
        escape_bytes(b"a\0b", &mut out);
        assert_eq!(out, "a<U+0000>b");

        out.clear();
        escape_bytes(b"bell\x07", &mut out);
        assert_eq!(out, "bell<U+0007>");

        out.clear();
        escape_bytes(b"tab\tok", &mut out);
        assert_eq!(out, "tab\tok");

        out.clear();
        escape_bytes("caf\u{e9}".as_bytes(), &mut out);
        assert_eq!(out, "caf\u{e9}");

        out.clear();
        escape_bytes(b"bad\xffbyte", &mut out);
        assert_eq!(out, "bad<FF>byte");

        out.clear();
        escape_bytes("nl\u{85}".as_bytes(), &mut out);
        assert_eq!(out, "nl<U+0085>");
    }

    #[test]
    fn ascii_whitespace_passes_through() {
        let mut out = String::new();
        escape_bytes(b"a\nb", &mut out);
        assert_eq!(out, "a\nb");

        out.clear();
        escape_bytes(b"cr\r lf\n vt\x0B ff\x0C", &mut out);
        assert_eq!(out, "cr\r lf\n vt\x0B ff\x0C");
    }

    #[test]
    fn noncharacters_are_escaped() {
        let mut out = String::new();
        escape_string("end\u{FFFE}", &mut out);
        assert_eq!(out, "end<U+FFFE>");

        out.clear();
        escape_string("x\u{FDD0}y", &mut out);
        assert_eq!(out, "x<U+FDD0>y");

        out.clear();
        escape_string("plane\u{1FFFF}", &mut out);
        assert_eq!(out, "plane<U+1FFFF>");
    }

    #[test]
    fn escaped_argument_text_in_message() {
        assert_eq!(
            render("invalid name %q0", &["a\u{7}b".into()]),
            "invalid name 'a<U+0007>b'"
        );
        assert_eq!(
            render("invalid name %q0", &["a\nb".into()]),
            "invalid name 'a\nb'"
        );
    }

    #[test]
    fn scan_format_respects_nesting() {
        let s = b"%select{x|y}0|tail";
        assert_eq!(scan_format(s, b'|'), 13);
        assert_eq!(scan_format(b"no pipe", b'|'), 7);
    }
}
