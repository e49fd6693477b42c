//! Engine layer for stockguard
//!
//! - [`ReservationEngine`]: the atomic check-then-reserve sale transaction
//! - [`TrialHarness`]: fires many simultaneous sales at one item and
//!   reports how the lock serialized them
//! - [`workflows`]: check-in and return bookkeeping
//! - [`Ledger`] / [`LedgerBuilder`]: the database handle tying these to a
//!   configured [`stockguard_storage::LedgerStore`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod inventory;
pub mod reservation;
pub mod trial;
pub mod workflows;

pub use config::{CheckinConfig, LedgerConfig, TrialConfig, JOURNAL_FILE_NAME};
pub use database::{Ledger, LedgerBuilder};
pub use inventory::InventoryEntry;
pub use reservation::{NoopObserver, ReservationEngine, SaleObserver};
pub use trial::{TrialAttempt, TrialHarness, TrialReport};
pub use workflows::{check_in, process_return};

pub use stockguard_storage::DurabilityMode;
