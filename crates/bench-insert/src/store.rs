//! Store and session traits.

use crate::error::InsertError;
use bench_core::Document;

/// Default number of documents buffered per collection before a write.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Counters returned by the store's statistics request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Number of documents in the database.
    pub documents: u64,
    /// Number of collections in the database.
    pub collections: u64,
}

/// A buffered bulk-insert session.
///
/// A session is owned by one thread. Documents passed to [`store`] get an
/// identifier assigned immediately and are written no later than the next
/// [`flush`].
///
/// [`store`]: BulkInsertSession::store
/// [`flush`]: BulkInsertSession::flush
pub trait BulkInsertSession {
    /// Assign an identifier to `document` and queue it for writing.
    fn store<D: Document>(&mut self, document: &mut D) -> Result<(), InsertError>;

    /// Write every buffered document.
    fn flush(&mut self) -> Result<(), InsertError>;

    /// Documents queued but not yet written.
    fn buffered(&self) -> usize;

    /// Documents accepted by [`store`](BulkInsertSession::store) so far.
    fn stored(&self) -> u64;
}

/// Connection to a database that can open bulk-insert sessions.
///
/// One store is shared by reference across all worker threads.
pub trait DocumentStore: Sync {
    type Session: BulkInsertSession;

    /// Name of the target database.
    fn database(&self) -> &str;

    /// Fetch database statistics. Also serves as a connection warm-up.
    fn statistics(&self) -> Result<StoreStatistics, InsertError>;

    /// Open a new bulk-insert session.
    fn open_bulk_insert(&self) -> Result<Self::Session, InsertError>;
}
