//! Implementation of the `migrate` command.
//!
//! Parses every document of the docs directory and replaces the stored
//! records with the result. Re-running is safe: the previous rows are
//! discarded, not merged.

use crate::error::Result;
use crate::loader::load_docs;
use crate::storage::CatalogStorage;
use gael_markdown::{ParsedDocument, parse_all_with_warnings};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of a migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrateSummary {
    /// Directory the documents were read from.
    pub docs_dir: PathBuf,
    /// Documents stored.
    pub documents: usize,
    /// Entries stored across all documents.
    pub entries: usize,
    /// Per-file results, by document number.
    pub files: Vec<FileSummary>,
    /// Files that matched but could not be read.
    pub skipped: Vec<PathBuf>,
}

/// What one document contributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    /// Source filename.
    pub filename: String,
    /// Number from the header, 0 if none.
    pub doc_number: u32,
    /// Entries parsed.
    pub entries: usize,
    /// Soft skips reported by the parser.
    pub warnings: Vec<String>,
}

/// Parse `docs_dir` into `storage` and save.
///
/// # Errors
///
/// Fails if the docs directory is missing, cannot be listed, or the store
/// cannot be saved. Unreadable individual files are skipped, not fatal.
pub async fn migrate(storage: &mut dyn CatalogStorage, docs_dir: &Path) -> Result<MigrateSummary> {
    let loaded = load_docs(docs_dir).await?;
    let reports = parse_all_with_warnings(&loaded.files);

    let files: Vec<FileSummary> = reports
        .iter()
        .map(|report| FileSummary {
            filename: report.document.filename.clone(),
            doc_number: report.document.doc_number,
            entries: report.document.entry_count(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
        })
        .collect();
    for file in &files {
        for warning in &file.warnings {
            tracing::debug!(filename = %file.filename, %warning, "skipped while parsing");
        }
    }

    let documents: Vec<ParsedDocument> = reports.into_iter().map(|r| r.document).collect();
    storage.replace_all(&documents).await?;
    storage.save().await?;

    let summary = MigrateSummary {
        docs_dir: docs_dir.to_path_buf(),
        documents: documents.len(),
        entries: gael_markdown::count_entries(&documents),
        files,
        skipped: loaded.skipped.into_iter().map(|s| s.path).collect(),
    };
    tracing::info!(
        documents = summary.documents,
        entries = summary.entries,
        "migrated docs"
    );
    Ok(summary)
}
