//! Requests the executor understands

use serde::{Deserialize, Serialize};
use stockguard_core::Bin;

/// One request
///
/// Serialized internally tagged by `op`. Field names follow the request
/// layer's wire format (`itemKey`, `numRequests`, ...); the older names
/// (`barcode`, `returnId`, `isBroken`) are accepted as aliases.
///
/// ```json
/// {"op": "sale", "itemKey": "890123"}
/// {"op": "trial", "itemKey": "890123", "numRequests": 10}
/// {"op": "return", "returnId": "890123", "destination": "repair"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    /// Sell one unit
    Sale {
        /// Item to sell
        #[serde(rename = "itemKey", alias = "barcode")]
        item_key: String,
    },

    /// Fire concurrent sales at one item
    Trial {
        /// Item under test
        #[serde(rename = "itemKey", alias = "barcode")]
        item_key: String,
        /// Number of simultaneous attempts; configured default if absent
        #[serde(rename = "numRequests", default)]
        num_requests: Option<usize>,
    },

    /// Receive one unit
    #[serde(rename = "checkin", alias = "checkIn", alias = "check-in")]
    CheckIn {
        /// Item received
        #[serde(rename = "itemKey", alias = "barcode")]
        item_key: String,
        /// Whether the unit is defective
        #[serde(rename = "isDefective", alias = "isBroken", default)]
        is_defective: bool,
    },

    /// Route one returned unit
    Return {
        /// Item returned
        #[serde(rename = "itemKey", alias = "returnId")]
        item_key: String,
        /// `shelf`, `repair` or `trash`; anything else is rejected
        destination: String,
    },

    /// List every item with its status
    Inventory,

    /// Read one item
    Item {
        /// Item to read
        #[serde(rename = "itemKey", alias = "barcode")]
        item_key: String,
    },

    /// List one bin's tallies
    Bin {
        /// Bin to list
        bin: Bin,
    },

    /// Create or overwrite an item's name and count
    Seed {
        /// Item to seed
        #[serde(rename = "itemKey", alias = "barcode")]
        item_key: String,
        /// Display name; the check-in default if absent
        #[serde(default)]
        name: Option<String>,
        /// Available units
        count: u64,
    },

    /// Store counters
    Stats,

    /// Push buffered journal entries to disk
    Flush,
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sale { .. } => "sale",
            Command::Trial { .. } => "trial",
            Command::CheckIn { .. } => "checkin",
            Command::Return { .. } => "return",
            Command::Inventory => "inventory",
            Command::Item { .. } => "item",
            Command::Bin { .. } => "bin",
            Command::Seed { .. } => "seed",
            Command::Stats => "stats",
            Command::Flush => "flush",
        }
    }
}
