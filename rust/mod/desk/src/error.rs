//! Error types for the desk subsystem.
//!
//! "Not found" on delete or read-state updates is deliberately absent: those
//! operations are silent no-ops when the id is unknown.

use brokerdesk_core::ServiceError;
use brokerdesk_kv::KVError;
use thiserror::Error;

/// Failures of the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The KV backend rejected a write (quota, I/O, ...). Not retried.
    #[error("write to '{key}' failed: {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: KVError,
    },

    /// The KV backend failed to read. A missing or malformed value is not
    /// an error; this is only raised when the backend itself fails.
    #[error("read of '{key}' failed: {source}")]
    ReadFailed {
        key: String,
        #[source]
        source: KVError,
    },

    #[error("failed to encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Login failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No broker or administrator matches the email/secret pair.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A field rejected at the input boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Broker roster failures.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("broker not found: {0}")]
    NotFound(String),

    #[error("current password is incorrect")]
    WrongPassword,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => ServiceError::Unauthorized(e.to_string()),
            AuthError::Storage(s) => s.into(),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

impl From<RosterError> for ServiceError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::EmailTaken(_) => ServiceError::Conflict(e.to_string()),
            RosterError::NotFound(_) => ServiceError::NotFound(e.to_string()),
            RosterError::WrongPassword => ServiceError::Unauthorized(e.to_string()),
            RosterError::Hash(m) => ServiceError::Internal(m),
            RosterError::Invalid(v) => v.into(),
            RosterError::Storage(s) => s.into(),
        }
    }
}
