//! Error types for the MongoDB store.

use bench_insert::InsertError;
use thiserror::Error;

/// Errors that can occur talking to MongoDB.
#[derive(Error, Debug)]
pub enum MongoStoreError {
    /// MongoDB connection or command error.
    #[error("MongoDB error: {0}")]
    MongoDB(#[from] mongodb::error::Error),

    /// A `dbStats` field was missing or not numeric.
    #[error("dbStats field '{0}' missing or not a number")]
    StatsField(&'static str),
}

impl From<MongoStoreError> for InsertError {
    fn from(error: MongoStoreError) -> Self {
        match error {
            MongoStoreError::MongoDB(e) => InsertError::backend(e),
            other => InsertError::UnexpectedResponse(other.to_string()),
        }
    }
}
