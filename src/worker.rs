//! Bulk-insert worker.

use bench_core::Document;
use bench_insert::{BulkInsert, DocumentStore, InsertError};
use tracing::{debug, warn};

/// Insert `doc_count` documents drawn cyclically from `documents`.
///
/// `documents` is this worker's private copy of the pool; the identifier
/// reset after each insert only ever touches it. The session is flushed
/// when the loop ends, and also when an insert fails and the guard is
/// dropped.
///
/// Returns the number of documents stored.
pub fn do_bulk_insert<S, D>(
    store: &S,
    documents: &mut [D],
    doc_count: u64,
) -> Result<u64, InsertError>
where
    S: DocumentStore,
    D: Document,
{
    if documents.is_empty() && doc_count > 0 {
        warn!("Empty pool, nothing to insert");
        return Ok(0);
    }

    let pool_size = documents.len() as u64;
    let mut bulk = BulkInsert::new(store.open_bulk_insert()?);

    for i in 0..doc_count {
        let document = &mut documents[(i % pool_size) as usize];
        bulk.store(document)?;
        document.clear_id();
    }

    let stored = bulk.finish()?;
    debug!("Worker stored {} documents", stored);
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::User;
    use bench_generator::UserGenerator;
    use bench_insert::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(size: usize) -> Vec<User> {
        UserGenerator::new(StdRng::seed_from_u64(42))
            .users(size)
            .collect()
    }

    #[test]
    fn test_exact_insert_count() {
        let store = MemoryStore::new("bulk").with_batch_size(16);
        let mut pool = pool(50);

        let stored = do_bulk_insert(&store, &mut pool, 37).unwrap();

        assert_eq!(stored, 37);
        assert_eq!(store.store_calls(), 37);
        assert_eq!(store.document_count(), 37);
        assert_eq!(store.sessions_opened(), 1);
    }

    #[test]
    fn test_pool_wraparound() {
        let store = MemoryStore::new("bulk").with_batch_size(4);
        let mut pool = pool(3);

        do_bulk_insert(&store, &mut pool, 10).unwrap();

        let docs = store.documents();
        assert_eq!(docs.len(), 10);
        for (i, doc) in docs.iter().enumerate() {
            assert_eq!(doc.body.get_str("name").unwrap(), pool[i % 3].name);
        }
    }

    #[test]
    fn test_identifier_cleared_between_inserts() {
        let store = MemoryStore::new("bulk").with_batch_size(1);
        let mut pool = pool(2);

        do_bulk_insert(&store, &mut pool, 9).unwrap();

        let docs = store.documents();
        assert!(docs.iter().all(|d| d.arrived_without_id));

        let mut ids: Vec<_> = docs.iter().map(|d| d.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 9, "every insert creates a new document");
    }

    #[test]
    fn test_identifiers_cleared_after_run() {
        let store = MemoryStore::new("bulk");
        let mut pool = pool(5);

        do_bulk_insert(&store, &mut pool, 12).unwrap();

        assert!(pool.iter().all(|u| u.id.is_none()));
    }

    #[test]
    fn test_zero_documents() {
        let store = MemoryStore::new("bulk");

        assert_eq!(do_bulk_insert(&store, &mut pool(5), 0).unwrap(), 0);
        assert_eq!(store.document_count(), 0);

        let mut empty: Vec<User> = Vec::new();
        assert_eq!(do_bulk_insert(&store, &mut empty, 0).unwrap(), 0);
        assert_eq!(store.sessions_opened(), 2);
    }

    #[test]
    fn test_empty_pool() {
        let store = MemoryStore::new("bulk");
        let mut empty: Vec<User> = Vec::new();

        assert_eq!(do_bulk_insert(&store, &mut empty, 10).unwrap(), 0);
        assert_eq!(store.sessions_opened(), 0);
    }

    #[test]
    fn test_failure_flushes_accepted_documents() {
        let store = MemoryStore::new("bulk")
            .with_batch_size(100)
            .fail_first_session_after(5);

        let result = do_bulk_insert(&store, &mut pool(10), 20);

        assert!(matches!(result, Err(InsertError::Injected(5))));
        assert_eq!(store.document_count(), 5);
    }
}
