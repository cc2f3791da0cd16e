use async_trait::async_trait;
use domain::{DomainError, NewRecord, Record, RecordId};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// The store rejected or failed an operation at call time.
    #[error("Storage error: {0}")]
    StorageError(String),
    /// No live store connection (never established, or failed at startup).
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Domain validation error: {0}")]
    DomainError(#[from] DomainError),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving records.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Inserts a new record and returns it with its store-assigned identifier.
    async fn insert(&self, record: NewRecord) -> Result<Record, ApplicationError>;
    /// Returns every stored record, in store-defined order.
    async fn find_all(&self) -> Result<Vec<Record>, ApplicationError>;
    /// Deletes a record by its ID. Returns true if something was removed.
    async fn delete(&self, id: &RecordId) -> Result<bool, ApplicationError>;
    /// Deletes every record. Returns how many were removed.
    async fn delete_all(&self) -> Result<u64, ApplicationError>;
}

// --- Request Models (DTOs) ---

/// Form body of a submission. Fields are optional here so that absence is
/// reported by the domain rather than by the extractor.
#[derive(Deserialize, Debug, Default)]
pub struct SubmitRecordRequest {
    pub name: Option<String>,
    pub message: Option<String>,
}

impl SubmitRecordRequest {
    pub fn into_new_record(self) -> Result<NewRecord, DomainError> {
        NewRecord::from_fields(self.name, self.message)
    }
}

// --- Application Services (Use Cases) ---

/// Create / list / delete operations over records.
pub struct RecordService {
    repo: Arc<dyn RecordRepository>,
}

impl RecordService {
    pub fn new(repo: Arc<dyn RecordRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: SubmitRecordRequest) -> Result<Record, ApplicationError> {
        info!("Attempting to create record");
        let new_record = request.into_new_record()?;
        let record = self.repo.insert(new_record).await.map_err(|e| {
            error!("Failed to insert record: {}", e);
            e
        })?;
        info!(record_id = %record.id(), "Record created");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Record>, ApplicationError> {
        let records = self.repo.find_all().await.map_err(|e| {
            error!("Failed to list records: {}", e);
            e
        })?;
        debug!(count = records.len(), "Listed records");
        Ok(records)
    }

    /// Deleting an ID that does not exist is a successful no-op.
    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: &str) -> Result<(), ApplicationError> {
        let record_id = RecordId::new(id.to_string());
        match self.repo.delete(&record_id).await {
            Ok(true) => {
                info!(record_id = %id, "Record deleted");
                Ok(())
            }
            Ok(false) => {
                info!(record_id = %id, "Record not found for deletion (already deleted or never existed)");
                Ok(())
            }
            Err(e) => {
                error!(record_id = %id, "Failed to delete record: {}", e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<(), ApplicationError> {
        let removed = self.repo.delete_all().await.map_err(|e| {
            error!("Failed to delete all records: {}", e);
            e
        })?;
        info!(removed, "All records deleted");
        Ok(())
    }
}
