//! Storage layer for stockguard
//!
//! This crate implements the Ledger Store:
//! - LedgerStore: item records in a sharded map, one lock cell per item
//! - lock_for_update: the lock, read, conditionally write, release primitive
//! - Atomic increment/insert for restocking and bin tallies
//! - Journal: append-only commit log written before a mutation is visible
//! - Recovery: replay of the journal on open
//!
//! Operations on different items never wait on each other's locks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod durability;
pub mod journal;
pub mod ledger;
pub mod stats;

pub use durability::DurabilityMode;
pub use journal::{
    read_journal, FileJournal, Journal, JournalEntry, NullJournal, ReplayReport, JOURNAL_MAGIC,
    MAX_RECORD_LEN,
};
pub use ledger::{LedgerStore, TxnDecision, DEFAULT_LOCK_TIMEOUT};
pub use stats::{LedgerStats, StatsSnapshot};
