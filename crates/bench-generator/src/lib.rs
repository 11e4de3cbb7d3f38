//! Synthetic data generator for the bulk-insert benchmark.
//!
//! Produces the pool of [`User`](bench_core::User) records every worker
//! cycles through. Values come from the `fake` crate's faker modules; the
//! shape of each record is fixed by [`UserRules`].
//!
//! # Example
//!
//! ```rust
//! use bench_generator::{UserGenerator, POOL_SIZE};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut generator = UserGenerator::new(StdRng::seed_from_u64(42));
//! let users: Vec<_> = generator.users(3).collect();
//! assert_eq!(users.len(), 3);
//! assert!(users.iter().all(|u| u.id.is_none()));
//! assert_eq!(POOL_SIZE, 10_000);
//! ```

pub mod generator;
pub mod rules;

// Re-exports for convenience
pub use generator::{
    generate_address, generate_pool, generate_user, generate_users, UserGenerator, UserIterator,
    POOL_SIZE,
};
pub use rules::UserRules;
