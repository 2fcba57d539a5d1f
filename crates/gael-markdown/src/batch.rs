//! Whole-catalog helpers.

use crate::model::ParsedDocument;
use crate::parser::{ParseReport, parse_document_with_warnings};
use serde::{Deserialize, Serialize};

/// A document's text and the name it was read under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Filename, used verbatim as [`ParsedDocument::filename`].
    pub filename: String,
    /// Raw markdown.
    pub content: String,
}

impl SourceFile {
    /// Pair a filename with its contents.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Parse every file, ordered by document number.
///
/// Files are independent: a document without a header still comes back
/// (numbered 0, so it sorts first) and never affects its neighbours.
#[must_use]
pub fn parse_all(files: &[SourceFile]) -> Vec<ParsedDocument> {
    parse_all_with_warnings(files)
        .into_iter()
        .map(|report| {
            for warning in &report.warnings {
                tracing::debug!(filename = %report.document.filename, %warning, "skipped while parsing");
            }
            report.document
        })
        .collect()
}

/// Like [`parse_all`], keeping each file's warnings.
#[must_use]
pub fn parse_all_with_warnings(files: &[SourceFile]) -> Vec<ParseReport> {
    let mut reports: Vec<ParseReport> = files
        .iter()
        .map(|file| parse_document_with_warnings(&file.content, &file.filename))
        .collect();
    reports.sort_by_key(|report| report.document.doc_number);
    tracing::debug!(files = reports.len(), "parsed batch");
    reports
}

/// Total entries across all documents.
#[must_use]
pub fn count_entries(documents: &[ParsedDocument]) -> usize {
    documents.iter().map(ParsedDocument::entry_count).sum()
}
