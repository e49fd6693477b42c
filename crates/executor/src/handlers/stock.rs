//! Check-in, return and item administration handlers

use crate::output::{Output, PlacementResponse, ReturnResponse};
use stockguard_core::{ItemId, Result, ReturnDestination};
use stockguard_engine::{InventoryEntry, Ledger};

/// Handle `checkin`.
pub(crate) fn check_in(ledger: &Ledger, item_key: String, is_defective: bool) -> Result<Output> {
    let placement = ledger.check_in(&ItemId::new(item_key), is_defective)?;
    Ok(Output::Placement(PlacementResponse::from(placement)))
}

/// Handle `return`.
///
/// The destination is parsed into the closed set before the ledger is
/// touched; an unknown destination is a validation fault.
pub(crate) fn process_return(ledger: &Ledger, item_key: String, destination: &str) -> Result<Output> {
    let destination: ReturnDestination = destination.parse()?;
    let outcome = ledger.process_return(&ItemId::new(item_key), destination)?;
    Ok(Output::Return(ReturnResponse::new(destination, outcome)))
}

/// Handle `item`.
pub(crate) fn item(ledger: &Ledger, item_key: String) -> Result<Output> {
    let record = ledger.get_item(&ItemId::new(item_key))?;
    Ok(Output::Item(InventoryEntry::from(record)))
}

/// Handle `seed`.
pub(crate) fn seed(
    ledger: &Ledger,
    item_key: String,
    name: Option<String>,
    count: u64,
) -> Result<Output> {
    let name = name.unwrap_or_else(|| ledger.config().checkin.default_name.clone());
    let record = ledger.seed_item(&ItemId::new(item_key), &name, count)?;
    Ok(Output::Item(InventoryEntry::from(record)))
}
