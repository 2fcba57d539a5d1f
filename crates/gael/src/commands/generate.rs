//! Implementation of the `generate` command.
//!
//! Renders every stored document in canonical form and writes it under the
//! output directory, using the filename recorded at migration time.

use crate::error::Result;
use crate::storage::CatalogStorage;
use gael_markdown::generate_all;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A document written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    /// Where it was written.
    pub path: PathBuf,
    /// Size of the generated text in bytes.
    pub bytes: usize,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateSummary {
    /// Directory the files were written to.
    pub output_dir: PathBuf,
    /// Files written, by document number.
    pub files: Vec<WrittenFile>,
    /// Stored filenames that could not be used as a file name.
    pub skipped: Vec<String>,
}

/// Write every stored document to `output_dir`.
///
/// Only the final component of a stored filename is used, so a record can
/// never write outside `output_dir`. Filenames with no usable final
/// component are skipped with a warning.
///
/// # Errors
///
/// Returns `Error::Io` if the directory or a file cannot be written.
pub async fn generate(storage: &dyn CatalogStorage, output_dir: &Path) -> Result<GenerateSummary> {
    let documents = storage.all_document_data().await?;
    tokio::fs::create_dir_all(output_dir).await?;

    let mut summary = GenerateSummary {
        output_dir: output_dir.to_path_buf(),
        files: Vec::new(),
        skipped: Vec::new(),
    };

    for file in generate_all(&documents) {
        let Some(name) = Path::new(&file.filename).file_name() else {
            tracing::warn!(filename = %file.filename, "skipping document with unusable filename");
            summary.skipped.push(file.filename);
            continue;
        };
        let path = output_dir.join(name);
        tokio::fs::write(&path, &file.content).await?;
        tracing::debug!(path = %path.display(), "generated document");
        summary.files.push(WrittenFile {
            path,
            bytes: file.content.len(),
        });
    }

    Ok(summary)
}
