//! In-memory storage backend.
//!
//! All rows live in one [`RecordSet`] and are **lost when the process
//! exits** unless written out with [`save_to_jsonl`]. The JSONL backend in
//! [`crate::storage`] is this store plus a file path.
//!
//! # Thread Safety
//!
//! The record set is wrapped in `Arc<Mutex<RecordSet>>`; every operation
//! holds the lock for its whole duration, so a reader never observes a
//! half-replaced catalog.

mod jsonl;
mod trait_impl;

use crate::storage::CatalogStorage;
use gael_markdown::RecordSet;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{LoadWarning, load_from_jsonl, read_records, save_to_jsonl};

/// Thread-safe in-memory storage.
pub(crate) type InMemoryStorage = Arc<Mutex<RecordSet>>;

/// Create an empty in-memory store.
///
/// ```
/// use gael::storage::CatalogStorage;
/// use gael::storage::in_memory::new_in_memory_storage;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let storage = new_in_memory_storage();
///     assert_eq!(storage.stats().await.unwrap().documents, 0);
/// }
/// ```
pub fn new_in_memory_storage() -> Box<dyn CatalogStorage> {
    with_records(RecordSet::default())
}

pub(crate) fn with_records(records: RecordSet) -> Box<dyn CatalogStorage> {
    let storage: InMemoryStorage = Arc::new(Mutex::new(records));
    Box::new(storage)
}
