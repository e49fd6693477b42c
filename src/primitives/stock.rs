//! Stock handle: receiving, returns and reads

use crate::error::Result;
use std::str::FromStr;
use std::sync::Arc;
use stockguard_core::{
    Bin, BinRecord, ItemId, ItemRecord, Placement, ReturnDestination, ReturnOutcome,
};
use stockguard_engine::{InventoryEntry, Ledger};

/// Stock operations.
///
/// Access via `db.stock`.
#[derive(Clone)]
pub struct Stock {
    ledger: Arc<Ledger>,
}

impl Stock {
    pub(crate) fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Receive one unit.
    ///
    /// A good unit of a known item increments its count; an unknown item is
    /// created with count 1. Defective units go to quarantine and never
    /// touch available stock.
    pub fn check_in(&self, item: impl Into<ItemId>, defective: bool) -> Result<Placement> {
        Ok(self.ledger.check_in(&item.into(), defective)?)
    }

    /// Route one returned unit.
    pub fn process_return(
        &self,
        item: impl Into<ItemId>,
        destination: ReturnDestination,
    ) -> Result<ReturnOutcome> {
        Ok(self.ledger.process_return(&item.into(), destination)?)
    }

    /// Route one returned unit, parsing the destination (`shelf`, `repair`, `trash`).
    pub fn process_return_to(
        &self,
        item: impl Into<ItemId>,
        destination: &str,
    ) -> Result<ReturnOutcome> {
        let destination = ReturnDestination::from_str(destination)?;
        self.process_return(item, destination)
    }

    /// Create or overwrite an item's name and available count.
    pub fn seed(&self, item: impl Into<ItemId>, name: &str, count: u64) -> Result<ItemRecord> {
        Ok(self.ledger.seed_item(&item.into(), name, count)?)
    }

    /// Change an item's display name.
    pub fn rename(&self, item: impl Into<ItemId>, name: &str) -> Result<ItemRecord> {
        Ok(self.ledger.rename_item(&item.into(), name)?)
    }

    /// Committed state of one item.
    pub fn get(&self, item: impl Into<ItemId>) -> Result<ItemRecord> {
        Ok(self.ledger.get_item(&item.into())?)
    }

    /// Every item with its status, sorted by id.
    pub fn inventory(&self) -> Vec<InventoryEntry> {
        self.ledger.inventory()
    }

    /// Tally for one item in a bin.
    pub fn bin_count(&self, bin: Bin, item: impl Into<ItemId>) -> u64 {
        self.ledger.bin_count(bin, &item.into())
    }

    /// Every tally in a bin.
    pub fn bin(&self, bin: Bin) -> Vec<BinRecord> {
        self.ledger.list_bin(bin)
    }
}
