//! MongoDB document store for the bulk-insert benchmark.
//!
//! [`MongoStore`] implements [`bench_insert::DocumentStore`] on top of the
//! blocking `mongodb::sync` client so that each benchmark worker can drive
//! its own [`MongoBulkInsert`] session from a plain OS thread.

pub mod error;
pub mod insert;
pub mod store;

pub use error::MongoStoreError;
pub use insert::MongoBulkInsert;
pub use store::MongoStore;
