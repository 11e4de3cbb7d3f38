//! Bulk-insert benchmark library.
//!
//! Generates a pool of synthetic users, then has N worker threads each
//! bulk-insert M documents drawn cyclically from the pool, and times the
//! parallel phase.
//!
//! # CLI Usage
//!
//! ```bash
//! # 4 threads, 100000 documents each
//! bulk-insert-bench mongodb://localhost:27017 100000 4
//!
//! # Same run against the in-memory store
//! bulk-insert-bench mongodb://localhost:27017 100000 4 --dry-run
//! ```

pub mod bench;
pub mod cli;
pub mod logging;
pub mod worker;

pub use bench::{run_benchmark, BenchConfig, BenchError, BenchReport, WorkerError, WorkerReport};
pub use cli::Cli;
pub use worker::do_bulk_insert;
