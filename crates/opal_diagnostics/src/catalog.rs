//! The diagnostic catalog: descriptors, groups, and built-in engine IDs.
//!
//! The catalog is the static data table behind the engine. Each registered
//! diagnostic carries a default severity, a class, an optional group name,
//! and a message template interpreted by the formatter. Front-end phases
//! register their diagnostics once at startup and refer to them by
//! [`DiagnosticId`] afterwards.

use crate::mapping::DiagnosticMapping;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque key identifying one registered diagnostic in a [`Catalog`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticId(u32);

impl DiagnosticId {
    /// Creates a `DiagnosticId` from a raw `u32` value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw `u32` value of this ID.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Which member diagnostics a group query covers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flavor {
    /// Only diagnostics controllable through `-W`-style options: warnings,
    /// extensions, remarks, and errors, but not notes.
    WarningOrError,
    /// Every diagnostic regardless of class.
    All,
}

impl Flavor {
    /// A stable numeric index usable as a `%select` argument.
    pub fn index(self) -> u64 {
        match self {
            Flavor::WarningOrError => 0,
            Flavor::All => 1,
        }
    }
}

/// The class of a diagnostic, fixed at registration time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiagClass {
    /// Attached context; visibility rides on the preceding diagnostic.
    Note,
    /// Informational remark about the translation.
    Remark,
    /// Ordinary warning.
    Warning,
    /// A language-extension warning.
    Extension,
    /// A hard error.
    Error,
}

/// The registration record for one diagnostic.
#[derive(Clone, Debug)]
pub struct Descriptor {
    /// The message template, interpreted by the formatter.
    pub description: String,
    /// The diagnostic's class.
    pub class: DiagClass,
    /// The severity used when no override is active.
    pub default_severity: Severity,
    /// The user-controllable group this diagnostic belongs to, if any.
    pub group: Option<String>,
    /// `true` if the compiler cannot recover after emitting this diagnostic.
    pub unrecoverable: bool,
}

impl Descriptor {
    /// A warning-class descriptor in the given group.
    pub fn warning(description: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: DiagClass::Warning,
            default_severity: Severity::Warning,
            group: Some(group.into()),
            unrecoverable: false,
        }
    }

    /// An extension-warning descriptor in the given group.
    pub fn extension(description: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            class: DiagClass::Extension,
            ..Self::warning(description, group)
        }
    }

    /// A remark-class descriptor in the given group. Remarks default to
    /// `Ignored` and must be enabled explicitly.
    pub fn remark(description: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: DiagClass::Remark,
            default_severity: Severity::Ignored,
            group: Some(group.into()),
            unrecoverable: false,
        }
    }

    /// An error-class descriptor.
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: DiagClass::Error,
            default_severity: Severity::Error,
            group: None,
            unrecoverable: false,
        }
    }

    /// A fatal error-class descriptor. Fatal errors are unrecoverable.
    pub fn fatal(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: DiagClass::Error,
            default_severity: Severity::Fatal,
            group: None,
            unrecoverable: true,
        }
    }

    /// A note-class descriptor.
    pub fn note(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: DiagClass::Note,
            default_severity: Severity::Note,
            group: None,
            unrecoverable: false,
        }
    }

    /// Sets the group this descriptor belongs to.
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Marks this diagnostic as unrecoverable.
    pub fn unrecoverable(mut self) -> Self {
        self.unrecoverable = true;
        self
    }
}

/// The diagnostics the engine itself reports.
///
/// These are registered first by [`Catalog::new`], in this exact order, so
/// their IDs are stable constants.
pub mod builtin {
    use super::DiagnosticId;

    /// An unknown diagnostic group name was supplied, with an optional
    /// nearest-match suggestion.
    pub const UNKNOWN_DIAG_OPTION: DiagnosticId = DiagnosticId::from_raw(0);
    /// A warning suppression mapping file could not be parsed.
    pub const MALFORMED_SUPPRESSION_MAPPING: DiagnosticId = DiagnosticId::from_raw(1);
    /// The configured error limit was exceeded; compilation stops.
    pub const TOO_MANY_ERRORS: DiagnosticId = DiagnosticId::from_raw(2);

    /// Number of built-in diagnostics registered ahead of user descriptors.
    pub const COUNT: u32 = 3;
}

/// The diagnostic catalog: an append-only table of [`Descriptor`]s plus the
/// group-name index derived from them.
pub struct Catalog {
    descriptors: Vec<Descriptor>,
    groups: HashMap<String, Vec<DiagnosticId>>,
}

impl Catalog {
    /// Creates a catalog containing only the [`builtin`] diagnostics.
    pub fn new() -> Self {
        let mut catalog = Self {
            descriptors: Vec::new(),
            groups: HashMap::new(),
        };

        let id = catalog.register(
            Descriptor::warning(
                "unknown %select{warning|diagnostic}0 group '%1'\
                 %select{|; did you mean '%3'?}2",
                "unknown-warning-option",
            ),
        );
        debug_assert_eq!(id, builtin::UNKNOWN_DIAG_OPTION);

        let id = catalog.register(Descriptor::error(
            "malformed warning suppression mapping '%0': %1",
        ));
        debug_assert_eq!(id, builtin::MALFORMED_SUPPRESSION_MAPPING);

        let id = catalog.register(Descriptor::fatal("too many errors emitted, stopping now"));
        debug_assert_eq!(id, builtin::TOO_MANY_ERRORS);

        catalog
    }

    /// Registers a diagnostic, returning its new [`DiagnosticId`].
    ///
    /// Also used for dynamically created diagnostics whose text is supplied
    /// at report time through a `%0` template.
    pub fn register(&mut self, descriptor: Descriptor) -> DiagnosticId {
        let id = DiagnosticId(self.descriptors.len() as u32);
        if let Some(group) = &descriptor.group {
            self.groups.entry(group.clone()).or_default().push(id);
        }
        self.descriptors.push(descriptor);
        id
    }

    fn descriptor(&self, id: DiagnosticId) -> &Descriptor {
        &self.descriptors[id.0 as usize]
    }

    /// Returns the message template for a diagnostic.
    pub fn description(&self, id: DiagnosticId) -> &str {
        &self.descriptor(id).description
    }

    /// Returns the severity used when no override is active.
    pub fn default_severity(&self, id: DiagnosticId) -> Severity {
        self.descriptor(id).default_severity
    }

    /// Returns the default [`DiagnosticMapping`] for a diagnostic.
    pub fn default_mapping(&self, id: DiagnosticId) -> DiagnosticMapping {
        DiagnosticMapping::new(self.default_severity(id))
    }

    /// Returns the group a diagnostic belongs to, if any.
    pub fn group(&self, id: DiagnosticId) -> Option<&str> {
        self.descriptor(id).group.as_deref()
    }

    /// Returns `true` if this diagnostic's severity is user-controllable
    /// (warning, extension, or remark class).
    pub fn is_warning_or_extension(&self, id: DiagnosticId) -> bool {
        matches!(
            self.descriptor(id).class,
            DiagClass::Warning | DiagClass::Extension | DiagClass::Remark
        )
    }

    /// Returns `true` if this diagnostic is a language-extension warning.
    pub fn is_extension(&self, id: DiagnosticId) -> bool {
        self.descriptor(id).class == DiagClass::Extension
    }

    /// Returns `true` if this diagnostic is note-class.
    pub fn is_note(&self, id: DiagnosticId) -> bool {
        self.descriptor(id).class == DiagClass::Note
    }

    /// Returns `true` if the compiler cannot recover after this diagnostic.
    pub fn is_unrecoverable(&self, id: DiagnosticId) -> bool {
        self.descriptor(id).unrecoverable
    }

    /// Returns `true` if this diagnostic defaults to Error or Fatal; warnings
    /// escalated by policy do not count.
    pub fn is_default_error(&self, id: DiagnosticId) -> bool {
        self.default_severity(id) >= Severity::Error
    }

    fn in_flavor(&self, flavor: Flavor, id: DiagnosticId) -> bool {
        match flavor {
            Flavor::WarningOrError => self.descriptor(id).class != DiagClass::Note,
            Flavor::All => true,
        }
    }

    /// Returns the member IDs of a group, filtered by flavor, or `None` if
    /// the group name is unknown.
    pub fn group_members(&self, flavor: Flavor, name: &str) -> Option<Vec<DiagnosticId>> {
        let members = self.groups.get(name)?;
        Some(
            members
                .iter()
                .copied()
                .filter(|&id| self.in_flavor(flavor, id))
                .collect(),
        )
    }

    /// Returns every registered diagnostic of the given flavor.
    pub fn all_diagnostics(&self, flavor: Flavor) -> Vec<DiagnosticId> {
        (0..self.descriptors.len() as u32)
            .map(DiagnosticId)
            .filter(|&id| self.in_flavor(flavor, id))
            .collect()
    }

    /// Returns the known group name closest to `name` by edit distance, or
    /// `None` if nothing is close enough to be a plausible typo.
    pub fn nearest_group(&self, flavor: Flavor, name: &str) -> Option<&str> {
        let threshold = name.len() / 3 + 1;
        let mut best: Option<(&str, usize)> = None;
        for (group, members) in &self.groups {
            if !members.iter().any(|&id| self.in_flavor(flavor, id)) {
                continue;
            }
            let distance = edit_distance(name, group);
            if distance > threshold {
                continue;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((group.as_str(), distance)),
            }
        }
        best.map(|(g, _)| g)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Levenshtein distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            cur[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with_unused() -> (Catalog, DiagnosticId) {
        let mut catalog = Catalog::new();
        let id = catalog.register(Descriptor::warning("unused variable %0", "unused"));
        (catalog, id)
    }

    #[test]
    fn builtins_have_stable_ids() {
        let catalog = Catalog::new();
        assert!(catalog
            .description(builtin::UNKNOWN_DIAG_OPTION)
            .starts_with("unknown"));
        assert_eq!(
            catalog.default_severity(builtin::TOO_MANY_ERRORS),
            Severity::Fatal
        );
        assert!(catalog.is_unrecoverable(builtin::TOO_MANY_ERRORS));
        assert_eq!(
            catalog.default_severity(builtin::MALFORMED_SUPPRESSION_MAPPING),
            Severity::Error
        );
    }

    #[test]
    fn register_and_query() {
        let (catalog, id) = catalog_with_unused();
        assert_eq!(catalog.description(id), "unused variable %0");
        assert_eq!(catalog.default_severity(id), Severity::Warning);
        assert_eq!(catalog.group(id), Some("unused"));
        assert!(catalog.is_warning_or_extension(id));
        assert!(!catalog.is_default_error(id));
        assert!(!catalog.is_note(id));
    }

    #[test]
    fn group_membership_by_flavor() {
        let mut catalog = Catalog::new();
        let warn = catalog.register(Descriptor::warning("w", "mixed"));
        let note = catalog.register(Descriptor::note("n").in_group("mixed"));
        let err = catalog.register(Descriptor::error("e").in_group("mixed"));

        let woe = catalog.group_members(Flavor::WarningOrError, "mixed").unwrap();
        assert!(woe.contains(&warn));
        assert!(woe.contains(&err));
        assert!(!woe.contains(&note));

        let all = catalog.group_members(Flavor::All, "mixed").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn unknown_group_is_none() {
        let catalog = Catalog::new();
        assert!(catalog
            .group_members(Flavor::WarningOrError, "no-such-group")
            .is_none());
    }

    #[test]
    fn nearest_group_suggests_typo() {
        let (catalog, _) = catalog_with_unused();
        assert_eq!(
            catalog.nearest_group(Flavor::WarningOrError, "unusd"),
            Some("unused")
        );
        assert_eq!(
            catalog.nearest_group(Flavor::WarningOrError, "completely-different"),
            None
        );
    }

    #[test]
    fn remark_defaults_ignored() {
        let mut catalog = Catalog::new();
        let id = catalog.register(Descriptor::remark("inlined %0", "inline-decisions"));
        assert_eq!(catalog.default_severity(id), Severity::Ignored);
        assert!(catalog.is_warning_or_extension(id));
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", "abc"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }
}
