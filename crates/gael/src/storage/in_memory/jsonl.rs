//! JSONL persistence for in-memory storage.
//!
//! One row per line, tagged by table:
//!
//! ```text
//! {"kind":"document","id":1,"doc_number":1,"filename":"01-boot.md",...}
//! {"kind":"section","id":1,"document_id":1,"name":"Firmware","sort_order":0}
//! {"kind":"entry","id":1,"document_id":1,"section_id":1,"subsection_id":null,...}
//! ```
//!
//! Rows are written parents first (documents, sections, subsections,
//! entries) so a truncated file loses children, never parents.

use crate::error::{Error, Result, StorageError};
use crate::storage::{CatalogStorage, temp_path_for};
use gael_markdown::{
    DocumentRecord, EntryRecord, IntegrityError, RecordSet, SectionRecord, SubsectionRecord,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

/// One line of the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Row {
    Document(DocumentRecord),
    Section(SectionRecord),
    Subsection(SubsectionRecord),
    Entry(EntryRecord),
}

fn push_row(records: &mut RecordSet, row: Row) {
    match row {
        Row::Document(document) => records.documents.push(document),
        Row::Section(section) => records.sections.push(section),
        Row::Subsection(subsection) => records.subsections.push(subsection),
        Row::Entry(entry) => records.entries.push(entry),
    }
}

/// Non-fatal problems found while loading a data file.
///
/// The offending line or row is skipped; everything else still loads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadWarning {
    /// A line was not a valid row.
    ///
    /// **Common causes**: manual editing, a write interrupted outside the
    /// atomic rename.
    #[error("line {line_number}: malformed row: {error}")]
    MalformedJson {
        /// 1-based line number in the file.
        line_number: usize,
        /// Parser message.
        error: String,
    },

    /// A row was dropped because its id repeats or its parent is missing.
    ///
    /// Dropping cascades: an entry under a dropped section is dropped too.
    #[error("dropped row: {0}")]
    DroppedRow(IntegrityError),
}

/// Read a data file into a consistent record set.
///
/// Malformed lines are skipped, then rows with duplicate ids or dangling
/// references are pruned. Each skip becomes a [`LoadWarning`].
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn read_records(path: &Path) -> Result<(RecordSet, Vec<LoadWarning>)> {
    let file = File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut records = RecordSet::default();
    let mut warnings = Vec::new();
    let mut line_number = 0;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Row>(&line) {
            Ok(row) => push_row(&mut records, row),
            Err(error) => warnings.push(LoadWarning::MalformedJson {
                line_number,
                error: error.to_string(),
            }),
        }
    }

    warnings.extend(records.prune_orphans().into_iter().map(LoadWarning::DroppedRow));

    tracing::debug!(
        path = %path.display(),
        lines = line_number,
        entries = records.entries.len(),
        warnings = warnings.len(),
        "read data file"
    );

    Ok((records, warnings))
}

/// Load an in-memory store from a data file.
///
/// Returns the store together with every [`LoadWarning`] raised while
/// reading; see [`read_records`].
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be opened or read.
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn CatalogStorage>, Vec<LoadWarning>)> {
    let (records, warnings) = read_records(path).await?;
    Ok((super::with_records(records), warnings))
}

/// Save a store to a data file with an atomic write.
///
/// Writes to `<path>.tmp` first and renames it over `path`, so an
/// interrupted save leaves the previous file intact. The temp file is
/// removed if the write or the rename fails.
///
/// # Errors
///
/// Returns `Error::Io` on write failure and `StorageError::Serialization`
/// if a row cannot be encoded.
pub async fn save_to_jsonl(storage: &dyn CatalogStorage, path: &Path) -> Result<()> {
    let records = storage.records().await?;
    let temp_path = temp_path_for(path);

    let result = match write_rows(&temp_path, records).await {
        Ok(()) => tokio::fs::rename(&temp_path, path).await.map_err(Error::Io),
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result
}

async fn write_rows(temp_path: &Path, records: RecordSet) -> Result<()> {
    let file = File::create(temp_path).await.map_err(Error::Io)?;
    let mut writer = BufWriter::new(file);

    let rows = records
        .documents
        .into_iter()
        .map(Row::Document)
        .chain(records.sections.into_iter().map(Row::Section))
        .chain(records.subsections.into_iter().map(Row::Subsection))
        .chain(records.entries.into_iter().map(Row::Entry));

    for row in rows {
        let json = serde_json::to_string(&row).map_err(StorageError::Serialization)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }

    writer.flush().await?;
    Ok(())
}
