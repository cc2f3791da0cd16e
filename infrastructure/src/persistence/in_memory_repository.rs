use application::{ApplicationError, RecordRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use domain::{NewRecord, Record, RecordId};
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Process-local record store. Selected with a `memory://` connection string.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordRepository {
    // Record ID -> Record
    store: Arc<DashMap<RecordId, Arc<Record>>>,
}

impl InMemoryRecordRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    #[instrument(skip(self, record))]
    async fn insert(&self, record: NewRecord) -> Result<Record, ApplicationError> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        debug!(record_id = %id, "Saving record to in-memory store");
        let record = record.with_id(id.clone());
        self.store.insert(id, Arc::new(record.clone()));
        Ok(record)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Record>, ApplicationError> {
        debug!("Listing all records from in-memory store");
        let records = self
            .store
            .iter()
            .map(|entry| (**entry.value()).clone())
            .collect();
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<bool, ApplicationError> {
        debug!(record_id = %id, "Deleting record from in-memory store");
        Ok(self.store.remove(id).is_some())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        debug!("Deleting all records from in-memory store");
        let removed = self.store.len() as u64;
        self.store.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn insert_assigns_identifier() {
        let repo = InMemoryRecordRepository::new();
        let record = repo.insert(NewRecord::new("alice", "pw1")).await.unwrap();
        assert!(!record.id().as_str().is_empty());

        let all = repo.find_all().await.unwrap();
        assert_eq!(all, vec![record]);
    }

    #[tokio::test]
    async fn duplicate_submissions_are_distinct_records() {
        let repo = InMemoryRecordRepository::new();
        let mut ids = HashSet::new();
        for _ in 0..5 {
            let record = repo.insert(NewRecord::new("same", "same")).await.unwrap();
            ids.insert(record.id().clone());
        }
        assert_eq!(ids.len(), 5);
        assert_eq!(repo.find_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn delete_reports_whether_removed() {
        let repo = InMemoryRecordRepository::new();
        let record = repo.insert(NewRecord::new("a", "1")).await.unwrap();

        assert!(repo.delete(record.id()).await.unwrap());
        assert!(!repo.delete(record.id()).await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_all_empties_store() {
        let repo = InMemoryRecordRepository::new();
        repo.insert(NewRecord::new("a", "1")).await.unwrap();
        repo.insert(NewRecord::new("b", "2")).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
