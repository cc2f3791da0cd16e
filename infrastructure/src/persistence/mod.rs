pub mod in_memory_repository;
pub mod mongo_repository;

pub use in_memory_repository::InMemoryRecordRepository;
pub use mongo_repository::MongoRecordRepository;
