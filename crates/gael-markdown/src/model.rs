//! Normalized catalog tree produced by the parser.
//!
//! The tree is built bottom-up during a single scan and handed to callers by
//! value. Nothing in here holds references back into the source text.

use crate::fields::EntryField;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One numbered catalog document (`# 01 — System Foundation`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Numeric identifier from the header, or 0 when no header was found.
    pub doc_number: u32,

    /// Canonical filename the document was read from.
    pub filename: String,

    /// Title text following the number in the header.
    pub title: String,

    /// Space-joined prose between the header and the first section.
    pub description: String,

    /// Sections in source order.
    #[serde(default)]
    pub sections: Vec<ParsedSection>,
}

impl ParsedDocument {
    /// Total number of entries across all sections and subsections.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(ParsedSection::entry_count).sum()
    }

    /// Returns `true` if a `# NN — Title` header was found.
    #[must_use]
    pub fn has_header(&self) -> bool {
        self.doc_number > 0
    }
}

/// A `## Name` grouping within a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    /// Heading text.
    pub name: String,

    /// Entries owned directly by the section.
    #[serde(default)]
    pub entries: Vec<ParsedEntry>,

    /// Subsections in source order.
    #[serde(default)]
    pub subsections: Vec<ParsedSubsection>,
}

impl ParsedSection {
    /// Create an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Direct entries plus the entries of every subsection.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
            + self
                .subsections
                .iter()
                .map(|sub| sub.entries.len())
                .sum::<usize>()
    }
}

/// A `### Name` grouping within a section. Subsections never nest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSubsection {
    /// Heading text.
    pub name: String,

    /// Entries in source order.
    #[serde(default)]
    pub entries: Vec<ParsedEntry>,
}

impl ParsedSubsection {
    /// Create an empty subsection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }
}

/// A catalogued project reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// Human-readable title.
    pub display_name: String,

    /// Short slug or `owner/repo` identifier, extracted verbatim.
    pub fork_name: String,

    /// Project this entry was forked from, when declared.
    pub upstream_url: Option<String>,

    /// Free-text description with any `(fork of ...)` annotation removed.
    pub description: String,

    /// Recognized optional fields.
    #[serde(default)]
    pub fields: EntryFields,

    /// Field lines whose names are not in the synonym table.
    #[serde(default)]
    pub extra_fields: ExtraFields,
}

impl ParsedEntry {
    /// Create an entry with no description or fields.
    pub fn new(display_name: impl Into<String>, fork_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            fork_name: fork_name.into(),
            ..Self::default()
        }
    }
}

/// The fixed set of optional named fields an entry may carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    /// How to build the project.
    pub build_cmd: Option<String>,
    /// How to run it once built.
    pub usage_cmd: Option<String>,
    /// How to install a packaged release.
    pub install_cmd: Option<String>,
    /// Documentation link.
    pub docs_url: Option<String>,
    /// Free-text note.
    pub note: Option<String>,
    /// Configuration hints.
    pub config_info: Option<String>,
    /// Dependencies.
    pub deps: Option<String>,
    /// Notable features.
    pub features: Option<String>,
    /// What it is used for.
    pub use_case: Option<String>,
    /// Hardware requirements or targets.
    pub hardware: Option<String>,
    /// Caveats.
    pub warning: Option<String>,
    /// Learning resources, usually a multi-line list.
    pub learn: Option<String>,
}

impl EntryFields {
    /// Value of one field, if populated.
    #[must_use]
    pub fn get(&self, field: EntryField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Replace the value of one field.
    pub fn set(&mut self, field: EntryField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Returns `true` if no field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        EntryField::ALL.iter().all(|field| self.slot(*field).is_none())
    }

    pub(crate) fn slot(&self, field: EntryField) -> &Option<String> {
        match field {
            EntryField::Build => &self.build_cmd,
            EntryField::Usage => &self.usage_cmd,
            EntryField::Install => &self.install_cmd,
            EntryField::Docs => &self.docs_url,
            EntryField::Note => &self.note,
            EntryField::Config => &self.config_info,
            EntryField::Deps => &self.deps,
            EntryField::Features => &self.features,
            EntryField::UseCase => &self.use_case,
            EntryField::Hardware => &self.hardware,
            EntryField::Warning => &self.warning,
            EntryField::Learn => &self.learn,
        }
    }

    pub(crate) fn slot_mut(&mut self, field: EntryField) -> &mut Option<String> {
        match field {
            EntryField::Build => &mut self.build_cmd,
            EntryField::Usage => &mut self.usage_cmd,
            EntryField::Install => &mut self.install_cmd,
            EntryField::Docs => &mut self.docs_url,
            EntryField::Note => &mut self.note,
            EntryField::Config => &mut self.config_info,
            EntryField::Deps => &mut self.deps,
            EntryField::Features => &mut self.features,
            EntryField::UseCase => &mut self.use_case,
            EntryField::Hardware => &mut self.hardware,
            EntryField::Warning => &mut self.warning,
            EntryField::Learn => &mut self.learn,
        }
    }

    /// Drop values that are empty after trimming.
    pub(crate) fn clear_blank(&mut self) {
        for field in EntryField::ALL {
            let slot = self.slot_mut(field);
            if slot.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *slot = None;
            }
        }
    }
}

/// Unrecognized field names mapped to their raw values.
///
/// Keeps insertion order so that regenerated documents list extra fields in
/// the order they were first seen. Inserting an existing key replaces its
/// value in place. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraFields(Vec<(String, String)>);

impl ExtraFields {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }

    /// Value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        self.0
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn clear_blank(&mut self) {
        self.0.retain(|(_, value)| !value.trim().is_empty());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtraFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl Serialize for ExtraFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ExtraFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExtraFieldsVisitor;

        impl<'de> Visitor<'de> for ExtraFieldsVisitor {
            type Value = ExtraFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = ExtraFields::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    fields.insert(key, value);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(ExtraFieldsVisitor)
    }
}

/// Intermediate row produced while scanning a markdown table.
///
/// Converted into a [`ParsedEntry`] as soon as the row is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Identifier from the first cell.
    pub fork_name: String,

    /// Last `/` segment of the identifier.
    pub display_name: String,

    /// Identifier from an `upstream`, `upstream url` or `repo` column.
    pub upstream_url: Option<String>,

    /// Lower-cased column name to cell text, in column order.
    pub columns: Vec<(String, String)>,
}

impl TableEntry {
    /// Cell text under `name`, if the column exists and the cell is not empty.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(column, value)| column == name && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }
}
