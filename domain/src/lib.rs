use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// --- Domain Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Missing required field '{0}'")]
    MissingField(String),
}

// --- Record ID ---

/// Opaque identifier assigned by the store when a record is inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: String) -> Self {
        Self(id)
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}
impl From<RecordId> for String {
    fn from(record_id: RecordId) -> Self {
        record_id.0
    }
}
impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Record ---

/// The two fields of a submission, before the store has given it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    name: String,
    message: String,
}

impl NewRecord {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Builds a record from possibly-absent fields. Presence is the only rule:
    /// an empty string is a valid value.
    pub fn from_fields(name: Option<String>, message: Option<String>) -> Result<Self, DomainError> {
        let name = name.ok_or_else(|| DomainError::MissingField("name".to_string()))?;
        let message = message.ok_or_else(|| DomainError::MissingField("message".to_string()))?;
        Ok(Self { name, message })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attaches the store-assigned identifier.
    pub fn with_id(self, id: RecordId) -> Record {
        Record {
            id,
            name: self.name,
            message: self.message,
        }
    }
}

/// A persisted submission. Immutable once stored; there is no update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    name: String,
    message: String,
}

impl Record {
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
