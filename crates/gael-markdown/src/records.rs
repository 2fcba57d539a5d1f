//! Relational view of a parsed catalog.
//!
//! [`RecordSet`] flattens document trees into rows with surrogate ids, the
//! shape a storage layer persists. [`DocumentData`] is the reverse: one
//! document regrouped as the generator expects it.

use crate::model::{EntryFields, ExtraFields, ParsedDocument, ParsedEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Surrogate key of any row.
pub type RecordId = i64;

/// Document sort order is spaced so documents can be inserted between.
const DOCUMENT_SORT_STRIDE: i64 = 10;

/// A document row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Surrogate key.
    pub id: RecordId,
    /// Number from the document header.
    pub doc_number: u32,
    /// Source filename.
    pub filename: String,
    /// Header title.
    pub title: String,
    /// Prose under the header, `None` when empty.
    pub description: Option<String>,
    /// `doc_number * 10`.
    pub sort_order: i64,
}

/// A section row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    /// Surrogate key.
    pub id: RecordId,
    /// Owning document.
    pub document_id: RecordId,
    /// Heading text.
    pub name: String,
    /// Position within the document.
    pub sort_order: i64,
}

/// A subsection row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionRecord {
    /// Surrogate key.
    pub id: RecordId,
    /// Owning section.
    pub section_id: RecordId,
    /// Heading text.
    pub name: String,
    /// Position within the section.
    pub sort_order: i64,
}

/// An entry row. `subsection_id` is `None` for entries owned by the section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Surrogate key.
    pub id: RecordId,
    /// Owning document.
    pub document_id: RecordId,
    /// Owning section.
    pub section_id: RecordId,
    /// Owning subsection, if any.
    pub subsection_id: Option<RecordId>,
    /// Human-readable title.
    pub display_name: String,
    /// Fork identifier.
    pub fork_name: String,
    /// Upstream identifier.
    pub upstream_url: Option<String>,
    /// Description, `None` when empty.
    pub description: Option<String>,
    /// Recognized optional fields.
    #[serde(default)]
    pub fields: EntryFields,
    /// Unrecognized fields.
    #[serde(default)]
    pub extra_fields: ExtraFields,
    /// Position within the section or subsection.
    pub sort_order: i64,
}

impl EntryRecord {
    fn from_parsed(entry: &ParsedEntry, sort_order: usize) -> Self {
        Self {
            display_name: entry.display_name.clone(),
            fork_name: entry.fork_name.clone(),
            upstream_url: entry.upstream_url.clone(),
            description: non_empty(&entry.description),
            fields: entry.fields.clone(),
            extra_fields: entry.extra_fields.clone(),
            sort_order: position(sort_order),
            ..Self::default()
        }
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

fn position(index: usize) -> i64 {
    i64::try_from(index).unwrap_or(i64::MAX)
}

/// Every row of a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Document rows.
    #[serde(default)]
    pub documents: Vec<DocumentRecord>,
    /// Section rows.
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    /// Subsection rows.
    #[serde(default)]
    pub subsections: Vec<SubsectionRecord>,
    /// Entry rows.
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

/// A row whose id or foreign key is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// Two rows of one table share an id.
    #[error("duplicate {table} id {id}")]
    DuplicateId {
        /// Table name.
        table: &'static str,
        /// The repeated id.
        id: RecordId,
    },

    /// A section points at a document that does not exist.
    #[error("section {section_id} references missing document {document_id}")]
    OrphanedSection {
        /// Offending section.
        section_id: RecordId,
        /// Unresolved document id.
        document_id: RecordId,
    },

    /// A subsection points at a section that does not exist.
    #[error("subsection {subsection_id} references missing section {section_id}")]
    OrphanedSubsection {
        /// Offending subsection.
        subsection_id: RecordId,
        /// Unresolved section id.
        section_id: RecordId,
    },

    /// An entry points at a parent row that does not exist.
    #[error("entry {entry_id} references missing {table} {id}")]
    OrphanedEntry {
        /// Offending entry.
        entry_id: RecordId,
        /// Table of the missing parent.
        table: &'static str,
        /// Unresolved id.
        id: RecordId,
    },

    /// An entry's subsection belongs to a different section.
    #[error(
        "entry {entry_id} is filed under subsection {subsection_id}, which is not in section {section_id}"
    )]
    MisfiledEntry {
        /// Offending entry.
        entry_id: RecordId,
        /// The entry's subsection.
        subsection_id: RecordId,
        /// The entry's section.
        section_id: RecordId,
    },
}

impl RecordSet {
    /// Flatten parsed documents into rows.
    ///
    /// Ids start at 1 in every table. Documents sort by `doc_number * 10`,
    /// everything else by its position within its parent.
    #[must_use]
    pub fn from_documents(documents: &[ParsedDocument]) -> Self {
        let mut set = Self::default();
        for document in documents {
            set.push_document(document);
        }
        tracing::debug!(
            documents = set.documents.len(),
            sections = set.sections.len(),
            subsections = set.subsections.len(),
            entries = set.entries.len(),
            "flattened catalog"
        );
        set
    }

    fn push_document(&mut self, document: &ParsedDocument) {
        let document_id = next_id(self.documents.len());
        self.documents.push(DocumentRecord {
            id: document_id,
            doc_number: document.doc_number,
            filename: document.filename.clone(),
            title: document.title.clone(),
            description: non_empty(&document.description),
            sort_order: i64::from(document.doc_number) * DOCUMENT_SORT_STRIDE,
        });

        for (section_index, section) in document.sections.iter().enumerate() {
            let section_id = next_id(self.sections.len());
            self.sections.push(SectionRecord {
                id: section_id,
                document_id,
                name: section.name.clone(),
                sort_order: position(section_index),
            });

            for (entry_index, entry) in section.entries.iter().enumerate() {
                self.push_entry(entry, entry_index, document_id, section_id, None);
            }

            for (subsection_index, subsection) in section.subsections.iter().enumerate() {
                let subsection_id = next_id(self.subsections.len());
                self.subsections.push(SubsectionRecord {
                    id: subsection_id,
                    section_id,
                    name: subsection.name.clone(),
                    sort_order: position(subsection_index),
                });
                for (entry_index, entry) in subsection.entries.iter().enumerate() {
                    self.push_entry(entry, entry_index, document_id, section_id, Some(subsection_id));
                }
            }
        }
    }

    fn push_entry(
        &mut self,
        entry: &ParsedEntry,
        index: usize,
        document_id: RecordId,
        section_id: RecordId,
        subsection_id: Option<RecordId>,
    ) {
        self.entries.push(EntryRecord {
            id: next_id(self.entries.len()),
            document_id,
            section_id,
            subsection_id,
            ..EntryRecord::from_parsed(entry, index)
        });
    }

    /// Regroup one document's rows as generator input.
    #[must_use]
    pub fn document_data(&self, document_id: RecordId) -> Option<DocumentData> {
        let document = self.documents.iter().find(|doc| doc.id == document_id)?;

        let mut sections: Vec<&SectionRecord> = self
            .sections
            .iter()
            .filter(|section| section.document_id == document_id)
            .collect();
        sections.sort_by_key(|section| section.sort_order);

        let sections = sections
            .into_iter()
            .map(|section| {
                let mut subsections: Vec<&SubsectionRecord> = self
                    .subsections
                    .iter()
                    .filter(|sub| sub.section_id == section.id)
                    .collect();
                subsections.sort_by_key(|sub| sub.sort_order);

                SectionData {
                    section: section.clone(),
                    entries: self.sorted_entries(|e| e.section_id == section.id && e.subsection_id.is_none()),
                    subsections: subsections
                        .into_iter()
                        .map(|sub| SubsectionData {
                            subsection: sub.clone(),
                            entries: self.sorted_entries(|e| e.subsection_id == Some(sub.id)),
                        })
                        .collect(),
                }
            })
            .collect();

        Some(DocumentData {
            document: document.clone(),
            sections,
        })
    }

    fn sorted_entries(&self, keep: impl Fn(&EntryRecord) -> bool) -> Vec<EntryRecord> {
        let mut entries: Vec<EntryRecord> = self.entries.iter().filter(|e| keep(e)).cloned().collect();
        entries.sort_by_key(|e| e.sort_order);
        entries
    }

    /// Generator input for every document, ordered by sort order then number.
    #[must_use]
    pub fn all_document_data(&self) -> Vec<DocumentData> {
        let mut documents: Vec<&DocumentRecord> = self.documents.iter().collect();
        documents.sort_by_key(|doc| (doc.sort_order, doc.doc_number));
        documents
            .into_iter()
            .filter_map(|doc| self.document_data(doc.id))
            .collect()
    }

    /// Verify ids are unique and every foreign key resolves.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn check_integrity(&self) -> Result<(), IntegrityError> {
        match self.integrity_problems().into_iter().next() {
            Some(problem) => Err(problem),
            None => Ok(()),
        }
    }

    /// Every integrity problem, in table order.
    #[must_use]
    pub fn integrity_problems(&self) -> Vec<IntegrityError> {
        let mut problems = Vec::new();
        let document_ids = unique_ids("document", self.documents.iter().map(|d| d.id), &mut problems);
        let section_ids = unique_ids("section", self.sections.iter().map(|s| s.id), &mut problems);
        let subsection_ids = unique_ids("subsection", self.subsections.iter().map(|s| s.id), &mut problems);
        unique_ids("entry", self.entries.iter().map(|e| e.id), &mut problems);

        for section in &self.sections {
            if !document_ids.contains(&section.document_id) {
                problems.push(IntegrityError::OrphanedSection {
                    section_id: section.id,
                    document_id: section.document_id,
                });
            }
        }
        for subsection in &self.subsections {
            if !section_ids.contains(&subsection.section_id) {
                problems.push(IntegrityError::OrphanedSubsection {
                    subsection_id: subsection.id,
                    section_id: subsection.section_id,
                });
            }
        }
        for entry in &self.entries {
            if let Some(problem) = self.entry_problem(entry, &document_ids, &section_ids, &subsection_ids) {
                problems.push(problem);
            }
        }
        problems
    }

    fn entry_problem(
        &self,
        entry: &EntryRecord,
        document_ids: &HashSet<RecordId>,
        section_ids: &HashSet<RecordId>,
        subsection_ids: &HashSet<RecordId>,
    ) -> Option<IntegrityError> {
        let orphaned = |table, id| IntegrityError::OrphanedEntry {
            entry_id: entry.id,
            table,
            id,
        };
        if !document_ids.contains(&entry.document_id) {
            return Some(orphaned("document", entry.document_id));
        }
        if !section_ids.contains(&entry.section_id) {
            return Some(orphaned("section", entry.section_id));
        }
        let subsection_id = entry.subsection_id?;
        if !subsection_ids.contains(&subsection_id) {
            return Some(orphaned("subsection", subsection_id));
        }
        let filed_correctly = self
            .subsections
            .iter()
            .any(|sub| sub.id == subsection_id && sub.section_id == entry.section_id);
        (!filed_correctly).then_some(IntegrityError::MisfiledEntry {
            entry_id: entry.id,
            subsection_id,
            section_id: entry.section_id,
        })
    }

    /// Drop rows whose references do not resolve, parents first, and return
    /// what was dropped. Duplicate ids keep their first row.
    pub fn prune_orphans(&mut self) -> Vec<IntegrityError> {
        let mut dropped = Vec::new();

        dedup_by_id("document", &mut self.documents, |d| d.id, &mut dropped);
        dedup_by_id("section", &mut self.sections, |s| s.id, &mut dropped);
        dedup_by_id("subsection", &mut self.subsections, |s| s.id, &mut dropped);
        dedup_by_id("entry", &mut self.entries, |e| e.id, &mut dropped);

        let document_ids: HashSet<RecordId> = self.documents.iter().map(|d| d.id).collect();
        self.sections.retain(|section| {
            let keep = document_ids.contains(&section.document_id);
            if !keep {
                dropped.push(IntegrityError::OrphanedSection {
                    section_id: section.id,
                    document_id: section.document_id,
                });
            }
            keep
        });

        let section_ids: HashSet<RecordId> = self.sections.iter().map(|s| s.id).collect();
        self.subsections.retain(|subsection| {
            let keep = section_ids.contains(&subsection.section_id);
            if !keep {
                dropped.push(IntegrityError::OrphanedSubsection {
                    subsection_id: subsection.id,
                    section_id: subsection.section_id,
                });
            }
            keep
        });

        let subsection_ids: HashSet<RecordId> = self.subsections.iter().map(|s| s.id).collect();
        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            match self.entry_problem(&entry, &document_ids, &section_ids, &subsection_ids) {
                Some(problem) => dropped.push(problem),
                None => self.entries.push(entry),
            }
        }
        dropped
    }

    /// Number of entry rows.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn next_id(existing: usize) -> RecordId {
    position(existing) + 1
}

fn unique_ids(
    table: &'static str,
    ids: impl Iterator<Item = RecordId>,
    problems: &mut Vec<IntegrityError>,
) -> HashSet<RecordId> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            problems.push(IntegrityError::DuplicateId { table, id });
        }
    }
    seen
}

fn dedup_by_id<T>(
    table: &'static str,
    rows: &mut Vec<T>,
    id: impl Fn(&T) -> RecordId,
    dropped: &mut Vec<IntegrityError>,
) {
    let mut seen = HashSet::new();
    rows.retain(|row| {
        let row_id = id(row);
        let first = seen.insert(row_id);
        if !first {
            dropped.push(IntegrityError::DuplicateId { table, id: row_id });
        }
        first
    });
}

// -- Generator input ----------------------------------------------------------

/// One document regrouped for generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentData {
    /// The document row.
    pub document: DocumentRecord,
    /// Sections in order.
    pub sections: Vec<SectionData>,
}

/// One section with its direct entries and subsections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionData {
    /// The section row.
    pub section: SectionRecord,
    /// Entries owned directly by the section.
    pub entries: Vec<EntryRecord>,
    /// Subsections in order.
    pub subsections: Vec<SubsectionData>,
}

/// One subsection with its entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionData {
    /// The subsection row.
    pub subsection: SubsectionRecord,
    /// Entries in order.
    pub entries: Vec<EntryRecord>,
}

impl From<&ParsedDocument> for DocumentData {
    /// Generator input straight from a tree, without ids.
    fn from(document: &ParsedDocument) -> Self {
        let sections = document
            .sections
            .iter()
            .enumerate()
            .map(|(section_index, section)| SectionData {
                section: SectionRecord {
                    name: section.name.clone(),
                    sort_order: position(section_index),
                    ..SectionRecord::default()
                },
                entries: section
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| EntryRecord::from_parsed(entry, i))
                    .collect(),
                subsections: section
                    .subsections
                    .iter()
                    .enumerate()
                    .map(|(subsection_index, subsection)| SubsectionData {
                        subsection: SubsectionRecord {
                            name: subsection.name.clone(),
                            sort_order: position(subsection_index),
                            ..SubsectionRecord::default()
                        },
                        entries: subsection
                            .entries
                            .iter()
                            .enumerate()
                            .map(|(i, entry)| EntryRecord::from_parsed(entry, i))
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            document: DocumentRecord {
                doc_number: document.doc_number,
                filename: document.filename.clone(),
                title: document.title.clone(),
                description: non_empty(&document.description),
                sort_order: i64::from(document.doc_number) * DOCUMENT_SORT_STRIDE,
                ..DocumentRecord::default()
            },
            sections,
        }
    }
}

impl DocumentData {
    /// Total entries across sections and subsections.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| s.entries.len() + s.subsections.iter().map(|sub| sub.entries.len()).sum::<usize>())
            .sum()
    }
}
