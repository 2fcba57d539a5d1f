//! Field-name normalization.
//!
//! Authors spell the same attribute several ways (`Use case`, `Use cases`,
//! `Applications`). Every spelling the catalog is known to use is listed in
//! [`FIELD_SYNONYMS`]; anything else is kept verbatim as an extra field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the optional attributes an entry may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    /// `build_cmd`
    Build,
    /// `usage_cmd`
    Usage,
    /// `install_cmd`
    Install,
    /// `docs_url`
    Docs,
    /// `note`
    Note,
    /// `config_info`
    Config,
    /// `deps`
    Deps,
    /// `features`
    Features,
    /// `use_case`
    UseCase,
    /// `hardware`
    Hardware,
    /// `warning`
    Warning,
    /// `learn`
    Learn,
}

impl EntryField {
    /// Every field, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Build,
        Self::Usage,
        Self::Install,
        Self::Docs,
        Self::Note,
        Self::Config,
        Self::Deps,
        Self::Features,
        Self::UseCase,
        Self::Hardware,
        Self::Warning,
        Self::Learn,
    ];

    /// Order in which the generator emits fields.
    pub const GENERATION_ORDER: [Self; 12] = [
        Self::Build,
        Self::Install,
        Self::Usage,
        Self::Config,
        Self::Docs,
        Self::Deps,
        Self::Features,
        Self::UseCase,
        Self::Hardware,
        Self::Warning,
        Self::Note,
        Self::Learn,
    ];

    /// Canonical label written by the generator (`- **Label**: ...`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Build => "Build",
            Self::Usage => "Usage",
            Self::Install => "Install",
            Self::Docs => "Docs",
            Self::Note => "Note",
            Self::Config => "Config",
            Self::Deps => "Deps",
            Self::Features => "Features",
            Self::UseCase => "Use case",
            Self::Hardware => "Hardware",
            Self::Warning => "Warning",
            Self::Learn => "Learn",
        }
    }

    /// Name of the record attribute the field is stored in.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Build => "build_cmd",
            Self::Usage => "usage_cmd",
            Self::Install => "install_cmd",
            Self::Docs => "docs_url",
            Self::Note => "note",
            Self::Config => "config_info",
            Self::Deps => "deps",
            Self::Features => "features",
            Self::UseCase => "use_case",
            Self::Hardware => "hardware",
            Self::Warning => "warning",
            Self::Learn => "learn",
        }
    }

    /// Shell-command fields get backticks or a `bash` fence when generated.
    #[must_use]
    pub const fn is_command(self) -> bool {
        matches!(self, Self::Build | Self::Install | Self::Usage)
    }
}

impl fmt::Display for EntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known field spellings, lower-cased, mapped to the attribute they fill.
pub const FIELD_SYNONYMS: &[(&str, EntryField)] = &[
    ("build", EntryField::Build),
    ("usage", EntryField::Usage),
    ("install", EntryField::Install),
    ("docs", EntryField::Docs),
    ("note", EntryField::Note),
    ("config", EntryField::Config),
    ("deps", EntryField::Deps),
    ("features", EntryField::Features),
    ("use case", EntryField::UseCase),
    ("use cases", EntryField::UseCase),
    ("applications", EntryField::UseCase),
    ("hardware", EntryField::Hardware),
    ("warning", EntryField::Warning),
    ("learn", EntryField::Learn),
    ("key feature", EntryField::Features),
    ("key features", EntryField::Features),
    ("contains", EntryField::Features),
    ("key configs", EntryField::Config),
    ("supported fpgas", EntryField::Hardware),
    ("build hardware", EntryField::Build),
    ("models", EntryField::Note),
    ("requires", EntryField::Deps),
];

/// Where a field line's value should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTarget {
    /// A recognized attribute.
    Known(EntryField),
    /// An extra field under the given normalized key.
    Extra(String),
}

/// Lower-case and trim a raw field name.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Look up a raw field name in [`FIELD_SYNONYMS`].
#[must_use]
pub fn lookup(raw: &str) -> Option<EntryField> {
    let key = normalize_key(raw);
    FIELD_SYNONYMS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, field)| *field)
}

/// Resolve a raw field name to its storage target.
#[must_use]
pub fn classify(raw: &str) -> FieldTarget {
    lookup(raw).map_or_else(|| FieldTarget::Extra(normalize_key(raw)), FieldTarget::Known)
}

/// Reduce a table column header to something a field line can carry.
///
/// Field names are restricted to word characters and spaces, so punctuation
/// is replaced by spaces and runs of whitespace collapse. Returns `None` when
/// nothing usable is left.
#[must_use]
pub fn column_key(header: &str) -> Option<String> {
    let cleaned: String = header
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();
    let key = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    (!key.is_empty()).then(|| key.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn every_label_maps_back_to_its_field() {
        for field in EntryField::ALL {
            assert_eq!(lookup(field.label()), Some(field), "label {}", field.label());
        }
    }

    #[test]
    fn generation_order_covers_every_field_once() {
        for field in EntryField::ALL {
            let hits = EntryField::GENERATION_ORDER
                .iter()
                .filter(|f| **f == field)
                .count();
            assert_eq!(hits, 1, "{field:?}");
        }
    }

    #[rstest]
    #[case("Use case", EntryField::UseCase)]
    #[case("Use Cases", EntryField::UseCase)]
    #[case("Applications", EntryField::UseCase)]
    #[case("Key Features", EntryField::Features)]
    #[case("Contains", EntryField::Features)]
    #[case("Key configs", EntryField::Config)]
    #[case("Supported FPGAs", EntryField::Hardware)]
    #[case("Build hardware", EntryField::Build)]
    #[case("Models", EntryField::Note)]
    #[case("Requires", EntryField::Deps)]
    #[case("  build  ", EntryField::Build)]
    fn synonyms_resolve(#[case] raw: &str, #[case] expected: EntryField) {
        assert_eq!(lookup(raw), Some(expected));
    }

    #[test]
    fn unknown_names_become_extras() {
        assert_eq!(classify("Platform"), FieldTarget::Extra("platform".to_string()));
        assert_eq!(classify("Docs"), FieldTarget::Known(EntryField::Docs));
    }

    #[test]
    fn only_shell_fields_are_commands() {
        let commands: Vec<_> = EntryField::ALL
            .into_iter()
            .filter(|f| f.is_command())
            .collect();
        assert_eq!(
            commands,
            vec![EntryField::Build, EntryField::Usage, EntryField::Install]
        );
    }

    #[rstest]
    #[case("License", Some("license"))]
    #[case("Build-time (min)", Some("build time min"))]
    #[case("  ", None)]
    #[case("--", None)]
    fn column_keys_are_field_safe(#[case] header: &str, #[case] expected: Option<&str>) {
        assert_eq!(column_key(header).as_deref(), expected);
    }
}
