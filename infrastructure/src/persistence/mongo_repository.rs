use application::{ApplicationError, RecordRepository};
use async_trait::async_trait;
use domain::{NewRecord, Record, RecordId};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Collection holding one document per record.
pub const RECORDS_COLLECTION: &str = "records";
/// Database used when the connection string names none.
pub const DEFAULT_DATABASE: &str = "test";

/// Stored shape of a record. Both fields are required on read, so a document
/// missing either one fails deserialization instead of defaulting.
#[derive(Debug, Serialize, Deserialize)]
struct RecordDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    message: String,
}

impl From<RecordDocument> for Record {
    fn from(document: RecordDocument) -> Self {
        NewRecord::new(document.name, document.message)
            .with_id(RecordId::new(document.id.to_hex()))
    }
}

fn storage_error(context: &str, err: mongodb::error::Error) -> ApplicationError {
    ApplicationError::StorageError(format!("{}: {}", context, err))
}

/// Record store backed by a MongoDB collection.
#[derive(Debug, Clone)]
pub struct MongoRecordRepository {
    collection: Collection<RecordDocument>,
}

impl MongoRecordRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(RECORDS_COLLECTION),
        }
    }

    /// Opens a client for `uri` and verifies the server answers a ping.
    pub async fn connect(uri: &str) -> Result<Self, ApplicationError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| ApplicationError::StoreUnavailable(format!("invalid connection string: {}", e)))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ApplicationError::StoreUnavailable(format!("ping failed: {}", e)))?;
        debug!(database = %database.name(), "MongoDB ping succeeded");
        Ok(Self::new(&database))
    }
}

#[async_trait]
impl RecordRepository for MongoRecordRepository {
    #[instrument(skip(self, record))]
    async fn insert(&self, record: NewRecord) -> Result<Record, ApplicationError> {
        let document = RecordDocument {
            id: ObjectId::new(),
            name: record.name().to_string(),
            message: record.message().to_string(),
        };
        debug!(record_id = %document.id, "Inserting record document");
        self.collection
            .insert_one(&document)
            .await
            .map_err(|e| storage_error("insert failed", e))?;
        Ok(document.into())
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Record>, ApplicationError> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(|e| storage_error("find failed", e))?;
        let documents: Vec<RecordDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| storage_error("reading cursor failed", e))?;
        debug!(count = documents.len(), "Fetched record documents");
        Ok(documents.into_iter().map(Record::from).collect())
    }

    /// An ID that is not a valid ObjectId cannot match any document.
    #[instrument(skip(self))]
    async fn delete(&self, id: &RecordId) -> Result<bool, ApplicationError> {
        let Ok(object_id) = ObjectId::parse_str(id.as_str()) else {
            debug!(record_id = %id, "Not an ObjectId, nothing to delete");
            return Ok(false);
        };
        let result = self
            .collection
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| storage_error("delete failed", e))?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(|e| storage_error("delete all failed", e))?;
        Ok(result.deleted_count)
    }
}
