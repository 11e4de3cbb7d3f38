//! Bulk-insert sessions for the benchmark.
//!
//! A [`DocumentStore`] hands out [`BulkInsertSession`]s. A session buffers
//! documents and writes them to the store in batches; the [`BulkInsert`]
//! guard makes sure whatever is still buffered gets flushed when the guard
//! goes out of scope, including on an early return through `?`.
//!
//! ```text
//! DocumentStore ──open_bulk_insert()──▶ Session ──▶ BulkInsert guard
//!       │                                              │
//!   statistics()                               store() / finish() / Drop
//! ```
//!
//! [`MemoryStore`] is an in-process implementation used for dry runs and
//! tests. The MongoDB implementation lives in `bench-insert-mongodb`.

pub mod error;
pub mod guard;
pub mod memory;
pub mod store;

// Re-exports for convenience
pub use error::InsertError;
pub use guard::BulkInsert;
pub use memory::{MemorySession, MemoryStore, StoredDocument};
pub use store::{BulkInsertSession, DocumentStore, StoreStatistics, DEFAULT_BATCH_SIZE};
