//! Error types for bulk-insert sessions.

use thiserror::Error;

/// Errors that can occur while talking to a document store.
#[derive(Error, Debug)]
pub enum InsertError {
    /// Document could not be converted to BSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] bson::ser::Error),

    /// Error reported by the store backend (connection, write, command).
    #[error("Store error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Store returned a response that could not be interpreted.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Failure injected by [`MemoryStore`](crate::MemoryStore).
    #[error("Injected failure after {0} documents")]
    Injected(u64),
}

impl InsertError {
    /// Wrap a backend error.
    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(error))
    }
}
