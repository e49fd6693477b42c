//! Common imports
//!
//! ```ignore
//! use stockguard::prelude::*;
//!
//! let db = Stockguard::ephemeral()?;
//! db.stock.seed("A", "Widget", 3)?;
//! ```

pub use crate::database::{Stockguard, StockguardBuilder};
pub use crate::error::{Error, Result};
pub use crate::primitives::{Sales, Stock};

pub use stockguard_core::{
    Bin, ItemId, ItemRecord, PreventionReason, ReturnDestination, ReturnOutcome, SaleOutcome,
    StockStatus,
};
pub use stockguard_engine::{DurabilityMode, TrialReport};
