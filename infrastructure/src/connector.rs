use crate::persistence::{InMemoryRecordRepository, MongoRecordRepository};
use application::{ApplicationError, RecordRepository};
use async_trait::async_trait;
use domain::{NewRecord, Record, RecordId};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Scheme prefix of a connection string, for logging. The full URI may carry
/// credentials and is never logged.
fn scheme_of(uri: &str) -> &str {
    uri.split_once("://").map(|(scheme, _)| scheme).unwrap_or("<none>")
}

/// Opens the store named by `uri`, choosing the backend by scheme.
pub async fn connect(uri: &str) -> Result<Arc<dyn RecordRepository>, ApplicationError> {
    match scheme_of(uri) {
        "memory" => Ok(Arc::new(InMemoryRecordRepository::new())),
        "mongodb" | "mongodb+srv" => Ok(Arc::new(MongoRecordRepository::connect(uri).await?)),
        other => Err(ApplicationError::StoreUnavailable(format!(
            "unsupported store scheme '{}'",
            other
        ))),
    }
}

/// Shared handle to the process-wide store connection.
///
/// The handle exists before the connection does. Until a store is attached it
/// is not ready and every repository call fails with `StoreUnavailable`.
#[derive(Clone, Default)]
pub struct StoreHandle {
    live: Arc<OnceCell<Arc<dyn RecordRepository>>>,
}

impl StoreHandle {
    /// A handle that is ready immediately.
    pub fn connected(store: Arc<dyn RecordRepository>) -> Self {
        Self {
            live: Arc::new(OnceCell::new_with(Some(store))),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.live.initialized()
    }

    fn store(&self) -> Result<&Arc<dyn RecordRepository>, ApplicationError> {
        self.live.get().ok_or_else(|| {
            ApplicationError::StoreUnavailable("store connection is not established".to_string())
        })
    }
}

/// Starts connecting to `uri` in the background and returns the handle at once.
///
/// A failed connection is logged and leaves the handle permanently not ready;
/// there is no retry.
pub fn spawn_connect(uri: String) -> StoreHandle {
    let handle = StoreHandle::default();
    let live = handle.live.clone();
    tokio::spawn(async move {
        let scheme = scheme_of(&uri).to_string();
        match connect(&uri).await {
            Ok(store) => {
                if live.set(store).is_ok() {
                    info!(scheme = %scheme, "Connected to record store");
                }
            }
            Err(e) => error!(scheme = %scheme, "Record store connection error: {}", e),
        }
    });
    handle
}

#[async_trait]
impl RecordRepository for StoreHandle {
    async fn insert(&self, record: NewRecord) -> Result<Record, ApplicationError> {
        self.store()?.insert(record).await
    }

    async fn find_all(&self) -> Result<Vec<Record>, ApplicationError> {
        self.store()?.find_all().await
    }

    async fn delete(&self, id: &RecordId) -> Result<bool, ApplicationError> {
        self.store()?.delete(id).await
    }

    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        self.store()?.delete_all().await
    }
}
