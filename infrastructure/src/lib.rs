// Module declarations
pub mod connector;
pub mod persistence;

// Re-export all implementations
pub use connector::{StoreHandle, connect, spawn_connect};
pub use persistence::{InMemoryRecordRepository, MongoRecordRepository};
