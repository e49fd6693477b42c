//! Ledger integration tests
//!
//! Exercises the public `stockguard` API and the executor wire layer:
//! - no lost updates under contention
//! - per-item isolation
//! - non-negativity and conservation over random operation sequences
//! - check-in and return bookkeeping
//! - journal recovery

mod concurrency;
mod invariants;
mod recovery;
mod wire;
mod workflows;

use std::time::Duration;
pub use stockguard::prelude::*;

/// In-memory ledger with a short trial hold
pub fn create_db() -> Stockguard {
    Stockguard::builder()
        .trial_hold(Duration::from_millis(2))
        .ephemeral()
        .unwrap()
}

/// In-memory ledger with `count` units of item `id`
pub fn create_db_with(id: &str, count: u64) -> Stockguard {
    let db = create_db();
    db.stock.seed(id, "Test Product", count).unwrap();
    db
}
