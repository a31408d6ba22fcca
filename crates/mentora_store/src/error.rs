//! Error types for the store

use mentora_common::{HttpStatusCode, MentoraError};
use thiserror::Error;

/// Errors that can occur when working with the store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error from the MongoDB driver
    #[error("Database error: {0}")]
    MongoError(#[from] mongodb::error::Error),

    /// Error with the store configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error establishing the connection
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// A document id that is not a valid ObjectId
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Document not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<bson::oid::Error> for StoreError {
    fn from(err: bson::oid::Error) -> Self {
        StoreError::InvalidId(err.to_string())
    }
}

impl HttpStatusCode for StoreError {
    fn status_code(&self) -> u16 {
        match self {
            StoreError::MongoError(_) => 500,
            StoreError::ConfigError(_) => 500,
            StoreError::ConnectionError(_) => 503,
            StoreError::InvalidId(_) => 400,
            StoreError::NotFound(_) => 404,
        }
    }
}

/// Convert StoreError to MentoraError
impl From<StoreError> for MentoraError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(msg) => MentoraError::ValidationError(msg),
            StoreError::NotFound(msg) => MentoraError::NotFoundError(msg),
            other => MentoraError::DatabaseError(other.to_string()),
        }
    }
}
