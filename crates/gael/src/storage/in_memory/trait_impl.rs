//! [`CatalogStorage`] for the mutex-wrapped record set.

use super::InMemoryStorage;
use crate::error::{Result, StorageError};
use crate::stats::CatalogStats;
use crate::storage::CatalogStorage;
use async_trait::async_trait;
use gael_markdown::{DocumentData, ParsedDocument, RecordId, RecordSet};

#[async_trait]
impl CatalogStorage for InMemoryStorage {
    async fn replace_all(&mut self, documents: &[ParsedDocument]) -> Result<()> {
        let records = RecordSet::from_documents(documents);
        *self.lock().await = records;
        Ok(())
    }

    async fn import_records(&mut self, records: RecordSet) -> Result<()> {
        records.check_integrity().map_err(StorageError::from)?;
        *self.lock().await = records;
        Ok(())
    }

    async fn records(&self) -> Result<RecordSet> {
        Ok(self.lock().await.clone())
    }

    async fn document_data(&self, document_id: RecordId) -> Result<Option<DocumentData>> {
        Ok(self.lock().await.document_data(document_id))
    }

    async fn all_document_data(&self) -> Result<Vec<DocumentData>> {
        Ok(self.lock().await.all_document_data())
    }

    async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats::from_records(&*self.lock().await))
    }

    async fn save(&self) -> Result<()> {
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::in_memory::new_in_memory_storage;
    use gael_markdown::{EntryRecord, RecordSet, parse_document};

    #[tokio::test]
    async fn replace_all_reassigns_ids() {
        let mut storage = new_in_memory_storage();
        let first = parse_document("# 01 — A\n\n## S\n\n- `a` — one\n", "01-a.md");
        let second = parse_document("# 02 — B\n\n## S\n\n- `b` — two\n", "02-b.md");

        storage.replace_all(&[first.clone(), second]).await.unwrap();
        storage.replace_all(&[first]).await.unwrap();

        let records = storage.records().await.unwrap();
        assert_eq!(records.documents.len(), 1);
        assert_eq!(records.entries[0].id, 1);
    }

    #[tokio::test]
    async fn document_data_unknown_id_is_none() {
        let storage = new_in_memory_storage();
        assert!(storage.document_data(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn import_records_rejects_orphans() {
        let mut storage = new_in_memory_storage();
        let records = RecordSet {
            entries: vec![EntryRecord {
                id: 1,
                document_id: 9,
                section_id: 9,
                fork_name: "x".to_string(),
                ..EntryRecord::default()
            }],
            ..RecordSet::default()
        };

        let err = storage.import_records(records).await.unwrap_err();
        assert!(err.to_string().contains("integrity"));
        assert_eq!(storage.records().await.unwrap(), RecordSet::default());
    }
}
