//! Public JSON catalog.
//!
//! A flat, consumer-friendly view of the records: one category per
//! document, each listing its entries with the fields someone needs to
//! rebuild the collection (fork, upstream, docs, build command).

use crate::error::{Error, Result, StorageError};
use crate::storage::temp_path_for;
use chrono::{DateTime, Utc};
use gael_markdown::{RecordId, RecordSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Format version written to every export.
pub const CATALOG_VERSION: &str = "1.0.0";

/// Category name for entries whose document row is missing.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The exported catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogExport {
    /// [`CATALOG_VERSION`].
    pub version: String,
    /// When the export was built.
    pub generated_at: DateTime<Utc>,
    /// Entries across all categories.
    pub total_entries: usize,
    /// One category per document, by document number.
    pub categories: Vec<CatalogCategory>,
}

/// All entries of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCategory {
    /// Document title.
    pub name: String,
    /// Document number, 0 when uncategorized.
    pub doc_number: u32,
    /// Entries in source order.
    pub entries: Vec<CatalogEntry>,
}

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name.
    pub name: String,
    /// Fork identifier.
    pub fork_name: String,
    /// Upstream identifier.
    pub upstream_url: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Document title.
    pub category: String,
    /// Section name, empty if the section row is missing.
    pub section: String,
    /// Documentation link.
    pub docs_url: Option<String>,
    /// Build command.
    pub build_cmd: Option<String>,
}

/// Build the catalog, stamped with the current time.
#[must_use]
pub fn build_catalog(records: &RecordSet) -> CatalogExport {
    build_catalog_at(records, Utc::now())
}

/// Build the catalog with an explicit timestamp.
#[must_use]
pub fn build_catalog_at(records: &RecordSet, generated_at: DateTime<Utc>) -> CatalogExport {
    let documents: HashMap<RecordId, _> = records.documents.iter().map(|d| (d.id, d)).collect();
    let sections: HashMap<RecordId, _> = records.sections.iter().map(|s| (s.id, s)).collect();

    // Keyed by (doc_number, document_id) so categories come out in document order.
    let mut grouped: BTreeMap<(u32, RecordId), CatalogCategory> = BTreeMap::new();

    let mut entries: Vec<_> = records.entries.iter().collect();
    entries.sort_by_key(|e| e.id);

    for entry in entries {
        let document = documents.get(&entry.document_id);
        let category = document.map_or(UNCATEGORIZED, |d| d.title.as_str());
        let doc_number = document.map_or(0, |d| d.doc_number);

        grouped
            .entry((doc_number, entry.document_id))
            .or_insert_with(|| CatalogCategory {
                name: category.to_string(),
                doc_number,
                entries: Vec::new(),
            })
            .entries
            .push(CatalogEntry {
                name: entry.display_name.clone(),
                fork_name: entry.fork_name.clone(),
                upstream_url: entry.upstream_url.clone(),
                description: entry.description.clone(),
                category: category.to_string(),
                section: sections
                    .get(&entry.section_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                docs_url: entry.fields.docs_url.clone(),
                build_cmd: entry.fields.build_cmd.clone(),
            });
    }

    CatalogExport {
        version: CATALOG_VERSION.to_string(),
        generated_at,
        total_entries: records.entries.len(),
        categories: grouped.into_values().collect(),
    }
}

/// Write the catalog as pretty-printed JSON.
///
/// # Errors
///
/// Returns `Error::Io` if the file cannot be written.
pub async fn write_catalog(catalog: &CatalogExport, path: &Path) -> Result<()> {
    let mut json = serde_json::to_string_pretty(catalog).map_err(StorageError::Serialization)?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let temp_path = temp_path_for(path);
    let result = match tokio::fs::write(&temp_path, json).await {
        Ok(()) => tokio::fs::rename(&temp_path, path).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(Error::Io(e));
    }

    tracing::debug!(path = %path.display(), entries = catalog.total_entries, "wrote catalog");
    Ok(())
}
