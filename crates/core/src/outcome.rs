//! Business outcomes of ledger operations
//!
//! These are expected results, not faults. A prevented sale or a rejected
//! return is reported to the caller as a value with a failed flag and a
//! message; nothing about it is exceptional.

use crate::types::{Bin, ItemId, ItemRecord, ReturnDestination};
use serde::{Deserialize, Serialize};

/// Message attached to every prevented sale.
pub const PREVENTED_MESSAGE: &str = "Overselling Prevented";

/// Message attached to every successful sale.
pub const SOLD_MESSAGE: &str = "Sale successful";

/// Why a sale was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreventionReason {
    /// The item exists but has no units available
    InsufficientStock,
    /// No item with that id exists
    NotFound,
}

impl PreventionReason {
    /// Human readable reason
    pub fn as_str(&self) -> &'static str {
        match self {
            PreventionReason::InsufficientStock => "insufficient stock",
            PreventionReason::NotFound => "not found",
        }
    }
}

/// Result of one sale attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaleOutcome {
    /// One unit moved from `count` to `reserved`; carries the committed post-image
    Sold(ItemRecord),
    /// Nothing changed
    Prevented(PreventionReason),
}

impl SaleOutcome {
    /// True for `Sold`
    pub fn is_sold(&self) -> bool {
        matches!(self, SaleOutcome::Sold(_))
    }

    /// Wire message for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            SaleOutcome::Sold(_) => SOLD_MESSAGE,
            SaleOutcome::Prevented(_) => PREVENTED_MESSAGE,
        }
    }

    /// The prevention reason, if the sale was refused
    pub fn reason(&self) -> Option<PreventionReason> {
        match self {
            SaleOutcome::Sold(_) => None,
            SaleOutcome::Prevented(reason) => Some(*reason),
        }
    }
}

/// Where a checked-in unit was put
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// The item checked in
    pub item: ItemId,
    /// Whether the unit was flagged defective
    pub defective: bool,
    /// Whether this check-in created the item record
    pub created: bool,
    /// Physical location label
    pub shelf_location: String,
}

/// Result of processing a returned unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The unit went back into available stock
    Restocked(ItemRecord),
    /// The unit was tallied in a bin; carries the new tally
    Binned {
        /// Bin the unit went into
        bin: Bin,
        /// Tally after the increment
        count: u64,
    },
    /// Nothing changed
    Rejected {
        /// Requested destination
        destination: ReturnDestination,
        /// Why it was refused
        message: String,
    },
}

impl ReturnOutcome {
    /// True unless the return was rejected
    pub fn is_success(&self) -> bool {
        !matches!(self, ReturnOutcome::Rejected { .. })
    }
}
