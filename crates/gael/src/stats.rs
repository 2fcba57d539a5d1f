//! Row counts and the category tree.
//!
//! Counts roll up: a section's `entry_count` includes the entries of its
//! subsections, a document's includes everything beneath it.

use gael_markdown::{RecordId, RecordSet};
use serde::Serialize;

/// Catalog-wide counts plus a per-document breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Document rows.
    pub documents: usize,
    /// Section rows.
    pub sections: usize,
    /// Subsection rows.
    pub subsections: usize,
    /// Entry rows.
    pub entries: usize,
    /// Entries that name an upstream.
    pub with_upstream: usize,
    /// Documents in sort order.
    pub tree: Vec<DocumentStats>,
}

/// Counts for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    /// Document row id.
    pub id: RecordId,
    /// Number from the header.
    pub doc_number: u32,
    /// Header title.
    pub title: String,
    /// Source filename.
    pub filename: String,
    /// Entries anywhere in the document.
    pub entry_count: usize,
    /// Sections in sort order.
    pub sections: Vec<SectionStats>,
}

/// Counts for one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionStats {
    /// Section row id.
    pub id: RecordId,
    /// Heading text.
    pub name: String,
    /// Direct entries plus subsection entries.
    pub entry_count: usize,
    /// Subsections in sort order.
    pub subsections: Vec<SubsectionStats>,
}

/// Counts for one subsection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubsectionStats {
    /// Subsection row id.
    pub id: RecordId,
    /// Heading text.
    pub name: String,
    /// Entries in the subsection.
    pub entry_count: usize,
}

impl CatalogStats {
    /// Compute counts over a record set.
    #[must_use]
    pub fn from_records(records: &RecordSet) -> Self {
        let mut documents: Vec<_> = records.documents.iter().collect();
        documents.sort_by_key(|d| (d.sort_order, d.id));

        let tree = documents
            .into_iter()
            .map(|document| {
                let mut sections: Vec<_> = records
                    .sections
                    .iter()
                    .filter(|s| s.document_id == document.id)
                    .collect();
                sections.sort_by_key(|s| (s.sort_order, s.id));

                let sections: Vec<SectionStats> = sections
                    .into_iter()
                    .map(|section| {
                        let mut subsections: Vec<_> = records
                            .subsections
                            .iter()
                            .filter(|s| s.section_id == section.id)
                            .collect();
                        subsections.sort_by_key(|s| (s.sort_order, s.id));

                        SectionStats {
                            id: section.id,
                            name: section.name.clone(),
                            entry_count: records
                                .entries
                                .iter()
                                .filter(|e| e.section_id == section.id)
                                .count(),
                            subsections: subsections
                                .into_iter()
                                .map(|subsection| SubsectionStats {
                                    id: subsection.id,
                                    name: subsection.name.clone(),
                                    entry_count: records
                                        .entries
                                        .iter()
                                        .filter(|e| e.subsection_id == Some(subsection.id))
                                        .count(),
                                })
                                .collect(),
                        }
                    })
                    .collect();

                DocumentStats {
                    id: document.id,
                    doc_number: document.doc_number,
                    title: document.title.clone(),
                    filename: document.filename.clone(),
                    entry_count: records
                        .entries
                        .iter()
                        .filter(|e| e.document_id == document.id)
                        .count(),
                    sections,
                }
            })
            .collect();

        Self {
            documents: records.documents.len(),
            sections: records.sections.len(),
            subsections: records.subsections.len(),
            entries: records.entries.len(),
            with_upstream: records
                .entries
                .iter()
                .filter(|e| e.upstream_url.is_some())
                .count(),
            tree,
        }
    }
}
