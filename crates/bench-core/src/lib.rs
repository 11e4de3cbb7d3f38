//! Core types for the bulk-insert benchmark.
//!
//! This crate provides the record model shared across the benchmark:
//!
//! - [`Document`] - An entity whose identifier is assigned by the store
//! - [`User`] - The document inserted by every worker
//! - [`Address`] - Embedded in each [`User`]
//!
//! # Architecture
//!
//! ```text
//! bench-core (this crate)
//!    │
//!    ├─── bench-generator       (produces the User pool)
//!    │
//!    ├─── bench-insert          (DocumentStore / BulkInsert guard)
//!    └─── bench-insert-mongodb  (MongoDB-backed DocumentStore)
//! ```

pub mod document;
pub mod model;

// Re-exports for convenience
pub use document::Document;
pub use model::{Address, User};
