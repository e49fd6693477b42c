//! # stockguard
//!
//! Stock ledger that refuses to oversell under concurrency.
//!
//! Every sale runs check-then-reserve under an exclusive per-item lock, so
//! no two buyers can both take the last unit. Check-ins and returns update
//! the same records under the same lock; defective returns are tallied in
//! repair and trash bins.
//!
//! ## Quick Start
//!
//! ```ignore
//! use stockguard::prelude::*;
//!
//! let db = Stockguard::open("./stock")?;
//!
//! db.stock.check_in("890123", false)?;
//! let outcome = db.sales.sell("890123")?;
//! assert!(outcome.is_sold());
//!
//! // Ten simultaneous buyers, however many units exist
//! let report = db.sales.trial("890123", 10)?;
//! assert!(report.upholds_guarantee());
//! ```
//!
//! ## Handles
//!
//! - [`Sales`] - single sales and concurrent trials
//! - [`Stock`] - check-in, returns, seeding and reads

#![warn(missing_docs)]

mod database;
mod error;
mod primitives;

pub mod prelude;

pub use database::{Stockguard, StockguardBuilder};
pub use error::{Error, Result};
pub use primitives::{Sales, Stock};

pub use stockguard_core::{
    Bin, BinRecord, ItemId, ItemRecord, Placement, PreventionReason, ReturnDestination,
    ReturnOutcome, SaleOutcome, StockStatus,
};
pub use stockguard_engine::{DurabilityMode, InventoryEntry, LedgerConfig, TrialReport};
