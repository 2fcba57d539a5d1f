//! Storage abstraction layer for catalog records.
//!
//! Commands never touch a file directly: they receive a
//! `Box<dyn CatalogStorage>` from [`create_storage`] through the
//! [`App`](crate::app::App) context. Two backends exist:
//!
//! - **In-memory**: a [`RecordSet`] behind a mutex, lost when the process exits
//! - **JSONL**: the same in-memory store, loaded from and saved to a JSON Lines
//!   file with one tagged row per line
//!
//! # Example
//!
//! ```no_run
//! use gael::storage::{CatalogStorage, StorageBackend, create_storage};
//! use gael_markdown::parse_document;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut storage = create_storage(StorageBackend::InMemory).await?;
//!     let doc = parse_document("# 01 — Tools\n\n## Editors\n\n- `helix` — modal\n", "01-tools.md");
//!     storage.replace_all(&[doc]).await?;
//!     assert_eq!(storage.stats().await?.entries, 1);
//!     Ok(())
//! }
//! ```

use crate::error::Result;
use crate::stats::CatalogStats;
use async_trait::async_trait;
use gael_markdown::{DocumentData, ParsedDocument, RecordId, RecordSet};
use std::path::{Path, PathBuf};

pub mod in_memory;

/// Core storage trait for catalog records.
///
/// Implementations must be `Send + Sync`; the in-memory backend uses
/// `Arc<Mutex<RecordSet>>` for that.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    /// Replace every stored row with the flattened form of `documents`.
    ///
    /// Ids are reassigned from 1. Nothing is persisted until [`save`](Self::save).
    async fn replace_all(&mut self, documents: &[ParsedDocument]) -> Result<()>;

    /// Replace every stored row with an existing record set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Integrity` if the set has duplicate ids or
    /// dangling references; the store is left unchanged.
    async fn import_records(&mut self, records: RecordSet) -> Result<()>;

    /// A snapshot of every row.
    async fn records(&self) -> Result<RecordSet>;

    /// One document regrouped as generator input, or `None` if the id is unknown.
    async fn document_data(&self, document_id: RecordId) -> Result<Option<DocumentData>>;

    /// Generator input for every document, in document order.
    async fn all_document_data(&self) -> Result<Vec<DocumentData>>;

    /// Row counts and the per-document category tree.
    async fn stats(&self) -> Result<CatalogStats>;

    /// Write the current rows to persistent storage.
    ///
    /// Takes `&self`; implementations rely on interior mutability. A no-op
    /// for the in-memory backend.
    async fn save(&self) -> Result<()>;

    /// Discard unsaved changes and re-read persistent storage.
    ///
    /// A no-op for the in-memory backend.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

impl StorageBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StorageBackend::Jsonl(path) => Some(path),
            StorageBackend::InMemory => None,
        }
    }
}

/// Adds JSONL file persistence to an in-memory store.
struct JsonlBackedStorage {
    inner: Box<dyn CatalogStorage>,
    path: PathBuf,
}

impl JsonlBackedStorage {
    async fn open(path: PathBuf) -> Result<Self> {
        let inner = if path.exists() {
            let (storage, warnings) = in_memory::load_from_jsonl(&path).await?;
            for warning in &warnings {
                tracing::warn!(warning = %warning, "JSONL load warning");
            }
            storage
        } else {
            in_memory::new_in_memory_storage()
        };
        Ok(Self { inner, path })
    }
}

#[async_trait]
impl CatalogStorage for JsonlBackedStorage {
    async fn replace_all(&mut self, documents: &[ParsedDocument]) -> Result<()> {
        self.inner.replace_all(documents).await
    }

    async fn import_records(&mut self, records: RecordSet) -> Result<()> {
        self.inner.import_records(records).await
    }

    async fn records(&self) -> Result<RecordSet> {
        self.inner.records().await
    }

    async fn document_data(&self, document_id: RecordId) -> Result<Option<DocumentData>> {
        self.inner.document_data(document_id).await
    }

    async fn all_document_data(&self) -> Result<Vec<DocumentData>> {
        self.inner.all_document_data().await
    }

    async fn stats(&self) -> Result<CatalogStats> {
        self.inner.stats().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        let reopened = Self::open(self.path.clone()).await?;
        self.inner = reopened.inner;
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// For [`StorageBackend::Jsonl`] an existing file is loaded resiliently:
/// malformed lines and dangling rows are logged with `tracing::warn!` and
/// skipped. A missing file yields an empty store.
///
/// # Errors
///
/// - `Error::Io` if the data file exists but cannot be read
pub async fn create_storage(backend: StorageBackend) -> Result<Box<dyn CatalogStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage()),
        StorageBackend::Jsonl(path) => Ok(Box::new(JsonlBackedStorage::open(path).await?)),
    }
}

/// Path of the temporary file an atomic write goes through.
///
/// `.tmp` is appended to the full file name, so `catalog.jsonl` becomes
/// `catalog.jsonl.tmp` and `data` becomes `data.tmp`.
#[must_use]
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let extension = match path.extension() {
        Some(ext) => {
            let mut ext = ext.to_os_string();
            ext.push(".tmp");
            ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(extension);
    temp_path
}
