//! Inventory listing with read-time status labels

use serde::Serialize;
use stockguard_core::{ItemRecord, StockStatus};
use stockguard_storage::LedgerStore;

/// One item as listed in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    /// The committed record
    #[serde(flatten)]
    pub record: ItemRecord,
    /// Derived from `count` when listed
    pub status: StockStatus,
}

impl From<ItemRecord> for InventoryEntry {
    fn from(record: ItemRecord) -> Self {
        let status = record.status();
        Self { record, status }
    }
}

/// Every item with its status, sorted by id
pub fn list_inventory(store: &LedgerStore) -> Vec<InventoryEntry> {
    store
        .list_items()
        .into_iter()
        .map(InventoryEntry::from)
        .collect()
}
