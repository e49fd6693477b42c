//! Core types for the stockguard ledger
//!
//! This crate defines the vocabulary shared by every other layer:
//! - [`ItemId`], [`ItemRecord`], [`BinRecord`]: the persisted data model
//! - [`Bin`], [`ReturnDestination`], [`StockStatus`]: closed enumerations
//! - [`SaleOutcome`], [`Placement`], [`ReturnOutcome`]: business results
//! - [`Error`]: system and validation faults
//!
//! Business outcomes (insufficient stock, unknown item on sale, unusable
//! return destination) are values, never errors. [`Error`] is reserved for
//! faults that abort a single request.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod outcome;
pub mod types;

pub use error::{Error, Result};
pub use limits::{validate_item_id, MAX_ITEM_ID_LEN};
pub use outcome::{Placement, PreventionReason, ReturnOutcome, SaleOutcome};
pub use types::{
    Bin, BinRecord, ItemId, ItemRecord, ReturnDestination, StockStatus, LOW_STOCK_THRESHOLD,
};
