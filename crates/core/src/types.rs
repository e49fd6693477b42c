//! Core data model
//!
//! - [`ItemId`]: opaque stable identifier for a stocked item
//! - [`ItemRecord`]: per-item counters (`count` available, `reserved` sold)
//! - [`Bin`] / [`BinRecord`]: repair and trash accumulation tallies
//! - [`ReturnDestination`]: closed set of places a returned unit can go
//! - [`StockStatus`]: read-time classification of an item's `count`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Items with fewer than this many units (but more than zero) are `Low`.
pub const LOW_STOCK_THRESHOLD: u64 = 5;

/// Opaque stable identifier for an item (a barcode in practice)
///
/// Immutable once the item exists. Validation happens at the boundary via
/// [`crate::validate_item_id`]; constructing an `ItemId` does not validate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a raw identifier
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

/// Per-item stock counters
///
/// `count` and `reserved` are unsigned, so non-negativity is structural.
/// The only transitions the ledger performs are the sale
/// (`count - 1`, `reserved + 1`) and the restock (`count + 1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Primary key
    pub id: ItemId,
    /// Display label
    pub name: String,
    /// Units available for sale
    pub count: u64,
    /// Units sold but not yet shipped
    pub reserved: u64,
}

impl ItemRecord {
    /// Create a record with zero reserved units
    pub fn new(id: ItemId, name: impl Into<String>, count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            count,
            reserved: 0,
        }
    }

    /// Post-image of a sale, or `None` when nothing is available
    ///
    /// Fails with [`Error::InvalidInput`] if `reserved` is already at
    /// `u64::MAX`; the record is never wrapped.
    pub fn reserve_one(&self) -> Result<Option<ItemRecord>> {
        let Some(count) = self.count.checked_sub(1) else {
            return Ok(None);
        };
        let reserved = self
            .reserved
            .checked_add(1)
            .ok_or_else(|| self.at_limit("reserved"))?;
        Ok(Some(ItemRecord {
            count,
            reserved,
            ..self.clone()
        }))
    }

    /// Post-image of one unit going back on the shelf
    ///
    /// Fails with [`Error::InvalidInput`] if `count` is already at `u64::MAX`.
    pub fn restock_one(&self) -> Result<ItemRecord> {
        let count = self
            .count
            .checked_add(1)
            .ok_or_else(|| self.at_limit("count"))?;
        Ok(ItemRecord {
            count,
            ..self.clone()
        })
    }

    fn at_limit(&self, field: &str) -> Error {
        Error::InvalidInput(format!("{} for item {} is at its maximum", field, self.id))
    }

    /// Derived availability label
    pub fn status(&self) -> StockStatus {
        StockStatus::classify(self.count)
    }
}

/// Read-time availability label, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    /// No units available
    Out,
    /// Fewer than [`LOW_STOCK_THRESHOLD`] units available
    Low,
    /// Plenty available
    #[serde(rename = "OK")]
    Ok,
}

impl StockStatus {
    /// Classify an available count
    pub fn classify(count: u64) -> Self {
        match count {
            0 => StockStatus::Out,
            c if c < LOW_STOCK_THRESHOLD => StockStatus::Low,
            _ => StockStatus::Ok,
        }
    }

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Out => "Out",
            StockStatus::Low => "Low",
            StockStatus::Ok => "OK",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulation bins for units that do not go back on the shelf
///
/// Each variant maps to a fixed storage target. Bins are never selected by
/// interpolating a caller-supplied string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bin {
    /// Units awaiting repair
    Repair,
    /// Units written off
    Trash,
}

impl Bin {
    /// All bins, in storage order
    pub const ALL: [Bin; 2] = [Bin::Repair, Bin::Trash];

    /// Stable name of the bin's storage target
    pub fn table_name(&self) -> &'static str {
        match self {
            Bin::Repair => "repair_bin",
            Bin::Trash => "trash_bin",
        }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bin::Repair => "repair",
            Bin::Trash => "trash",
        })
    }
}

/// Tally of units of one item sitting in a bin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinRecord {
    /// Item the units belong to
    pub id: ItemId,
    /// Units accumulated so far
    pub count: u64,
}

/// Where a returned unit goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnDestination {
    /// Back into available stock
    Shelf,
    /// Into the repair bin
    Repair,
    /// Into the trash bin
    Trash,
}

impl ReturnDestination {
    /// The bin this destination accumulates into, if any
    pub fn bin(&self) -> Option<Bin> {
        match self {
            ReturnDestination::Shelf => None,
            ReturnDestination::Repair => Some(Bin::Repair),
            ReturnDestination::Trash => Some(Bin::Trash),
        }
    }
}

impl FromStr for ReturnDestination {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "shelf" => Ok(ReturnDestination::Shelf),
            "repair" => Ok(ReturnDestination::Repair),
            "trash" => Ok(ReturnDestination::Trash),
            other => Err(crate::Error::InvalidInput(format!(
                "invalid destination '{}' (expected shelf, repair or trash)",
                other
            ))),
        }
    }
}

impl fmt::Display for ReturnDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReturnDestination::Shelf => "shelf",
            ReturnDestination::Repair => "repair",
            ReturnDestination::Trash => "trash",
        })
    }
}
