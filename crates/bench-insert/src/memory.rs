//! In-memory document store.
//!
//! Records every flushed document so callers can inspect exactly what a
//! benchmark run wrote. Used by `--dry-run` and throughout the tests.

use crate::error::InsertError;
use crate::store::{BulkInsertSession, DocumentStore, StoreStatistics, DEFAULT_BATCH_SIZE};
use bench_core::Document;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// A document written to the [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub collection: &'static str,
    /// Identifier assigned by the session.
    pub id: String,
    /// Whether the document had no identifier when it was handed to `store`.
    pub arrived_without_id: bool,
    pub body: bson::Document,
}

#[derive(Default)]
struct Shared {
    documents: Mutex<Vec<StoredDocument>>,
    next_id: AtomicU64,
    store_calls: AtomicU64,
    statistics_calls: AtomicU64,
    sessions_opened: AtomicU64,
}

impl Shared {
    fn documents(&self) -> MutexGuard<'_, Vec<StoredDocument>> {
        self.documents.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Thread-safe in-process [`DocumentStore`].
///
/// Clones share the same underlying documents.
#[derive(Clone)]
pub struct MemoryStore {
    database: String,
    batch_size: usize,
    fail_first_session_after: Option<u64>,
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            fail_first_session_after: None,
            shared: Arc::new(Shared::default()),
        }
    }

    /// Set how many documents a session buffers before writing.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Make the first session opened fail once it has accepted `count`
    /// documents.
    pub fn fail_first_session_after(mut self, count: u64) -> Self {
        self.fail_first_session_after = Some(count);
        self
    }

    /// Number of documents written (flushed) so far.
    pub fn document_count(&self) -> usize {
        self.shared.documents().len()
    }

    /// Snapshot of every written document, in write order.
    pub fn documents(&self) -> Vec<StoredDocument> {
        self.shared.documents().clone()
    }

    /// Number of accepted `store` calls across all sessions.
    pub fn store_calls(&self) -> u64 {
        self.shared.store_calls.load(Ordering::Relaxed)
    }

    /// Number of statistics requests served.
    pub fn statistics_calls(&self) -> u64 {
        self.shared.statistics_calls.load(Ordering::Relaxed)
    }

    /// Number of bulk-insert sessions opened.
    pub fn sessions_opened(&self) -> u64 {
        self.shared.sessions_opened.load(Ordering::Relaxed)
    }
}

impl DocumentStore for MemoryStore {
    type Session = MemorySession;

    fn database(&self) -> &str {
        &self.database
    }

    fn statistics(&self) -> Result<StoreStatistics, InsertError> {
        self.shared.statistics_calls.fetch_add(1, Ordering::Relaxed);

        let documents = self.shared.documents();
        let collections: HashSet<&str> = documents.iter().map(|d| d.collection).collect();

        Ok(StoreStatistics {
            documents: documents.len() as u64,
            collections: collections.len() as u64,
        })
    }

    fn open_bulk_insert(&self) -> Result<MemorySession, InsertError> {
        let index = self.shared.sessions_opened.fetch_add(1, Ordering::Relaxed);
        debug!("Opening in-memory bulk insert session #{}", index);

        Ok(MemorySession {
            shared: Arc::clone(&self.shared),
            batch_size: self.batch_size,
            fail_after: if index == 0 {
                self.fail_first_session_after
            } else {
                None
            },
            buffer: Vec::new(),
            stored: 0,
        })
    }
}

/// Session handed out by [`MemoryStore`].
pub struct MemorySession {
    shared: Arc<Shared>,
    batch_size: usize,
    fail_after: Option<u64>,
    buffer: Vec<StoredDocument>,
    stored: u64,
}

impl BulkInsertSession for MemorySession {
    fn store<D: Document>(&mut self, document: &mut D) -> Result<(), InsertError> {
        if let Some(limit) = self.fail_after {
            if self.stored >= limit {
                return Err(InsertError::Injected(limit));
            }
        }

        let arrived_without_id = document.id().is_none();
        let n = self.shared.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("{}/{}", D::COLLECTION, n);
        document.set_id(id.clone());

        let body = bson::to_document(&*document)?;
        self.buffer.push(StoredDocument {
            collection: D::COLLECTION,
            id,
            arrived_without_id,
            body,
        });
        self.stored += 1;
        self.shared.store_calls.fetch_add(1, Ordering::Relaxed);

        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), InsertError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.shared.documents().append(&mut self.buffer);
        Ok(())
    }

    fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn stored(&self) -> u64 {
        self.stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_generator::UserGenerator;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> UserGenerator<StdRng> {
        UserGenerator::new(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_store_assigns_identifier() {
        let store = MemoryStore::new("bulk");
        let mut session = store.open_bulk_insert().unwrap();
        let mut user = generator().next_user();

        session.store(&mut user).unwrap();

        assert_eq!(user.id.as_deref(), Some("users/1"));
        assert_eq!(session.stored(), 1);
        assert_eq!(session.buffered(), 1);
    }

    #[test]
    fn test_batch_size_triggers_write() {
        let store = MemoryStore::new("bulk").with_batch_size(4);
        let mut session = store.open_bulk_insert().unwrap();

        for mut user in generator().users(10) {
            session.store(&mut user).unwrap();
        }

        assert_eq!(store.document_count(), 8);
        assert_eq!(session.buffered(), 2);

        session.flush().unwrap();
        assert_eq!(store.document_count(), 10);
        assert_eq!(session.buffered(), 0);
    }

    #[test]
    fn test_reinserted_record_gets_new_identifier() {
        let store = MemoryStore::new("bulk").with_batch_size(1);
        let mut session = store.open_bulk_insert().unwrap();
        let mut user = generator().next_user();

        session.store(&mut user).unwrap();
        user.id = None;
        session.store(&mut user).unwrap();

        let docs = store.documents();
        assert_eq!(docs.len(), 2);
        assert_ne!(docs[0].id, docs[1].id);
        assert!(docs.iter().all(|d| d.arrived_without_id));
        assert_eq!(docs[1].body.get_str("_id").unwrap(), docs[1].id);
    }

    #[test]
    fn test_document_with_stale_identifier_is_flagged() {
        let store = MemoryStore::new("bulk").with_batch_size(1);
        let mut session = store.open_bulk_insert().unwrap();
        let mut user = generator().next_user();

        session.store(&mut user).unwrap();
        session.store(&mut user).unwrap();

        let docs = store.documents();
        assert!(docs[0].arrived_without_id);
        assert!(!docs[1].arrived_without_id);
    }

    #[test]
    fn test_statistics() {
        let store = MemoryStore::new("bulk").with_batch_size(1);
        assert_eq!(store.statistics().unwrap(), StoreStatistics::default());

        let mut session = store.open_bulk_insert().unwrap();
        for mut user in generator().users(3) {
            session.store(&mut user).unwrap();
        }

        let stats = store.statistics().unwrap();
        assert_eq!(stats.documents, 3);
        assert_eq!(stats.collections, 1);
        assert_eq!(store.statistics_calls(), 2);
        assert_eq!(store.database(), "bulk");
    }

    #[test]
    fn test_failure_only_affects_first_session() {
        let store = MemoryStore::new("bulk").fail_first_session_after(1);
        let mut users = generator().users(4).collect::<Vec<_>>();

        let mut first = store.open_bulk_insert().unwrap();
        let mut second = store.open_bulk_insert().unwrap();

        first.store(&mut users[0]).unwrap();
        assert!(matches!(
            first.store(&mut users[1]),
            Err(InsertError::Injected(1))
        ));

        second.store(&mut users[2]).unwrap();
        second.store(&mut users[3]).unwrap();

        assert_eq!(store.sessions_opened(), 2);
        assert_eq!(store.store_calls(), 3);
    }
}
