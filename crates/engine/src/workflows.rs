//! Check-in and return workflows
//!
//! Neither workflow ever refuses based on current stock, so neither needs
//! the check-then-act transaction sales use. Both are single increments or
//! inserts, each applied atomically by the store.

use crate::config::CheckinConfig;
use stockguard_core::{
    validate_item_id, ItemId, ItemRecord, Placement, Result, ReturnDestination, ReturnOutcome,
};
use stockguard_storage::LedgerStore;
use tracing::debug;

/// Receive one unit of `id`
///
/// - unknown item: created with `count = 1`, or `count = 0` if defective
/// - known item, good unit: `count += 1`
/// - known item, defective unit: no change
///
/// Defective units are placed in quarantine, good units on the shelf.
pub fn check_in(
    store: &LedgerStore,
    config: &CheckinConfig,
    id: &ItemId,
    defective: bool,
) -> Result<Placement> {
    validate_item_id(id)?;

    let seed_count = if defective { 0 } else { 1 };
    let (record, created) = store.increment_or_insert(id, !defective, || {
        ItemRecord::new(id.clone(), config.default_name.as_str(), seed_count)
    })?;

    let shelf_location = if defective {
        config.quarantine_location.clone()
    } else {
        config.shelf_location.clone()
    };
    debug!(item = %id, defective, created, count = record.count, location = %shelf_location, "checked in");

    Ok(Placement {
        item: id.clone(),
        defective,
        created,
        shelf_location,
    })
}

/// Route one returned unit of `id`
///
/// `Shelf` puts the unit back into the item's available count and is
/// rejected if the item is unknown. `Repair` and `Trash` add one to the
/// item's tally in the matching bin, creating the tally on first use.
pub fn process_return(
    store: &LedgerStore,
    id: &ItemId,
    destination: ReturnDestination,
) -> Result<ReturnOutcome> {
    validate_item_id(id)?;

    let outcome = match destination.bin() {
        None => match store.increment_count(id)? {
            Some(record) => ReturnOutcome::Restocked(record),
            None => ReturnOutcome::Rejected {
                destination,
                message: format!("item {} not found", id),
            },
        },
        Some(bin) => ReturnOutcome::Binned {
            bin,
            count: store.increment_bin(bin, id)?,
        },
    };

    debug!(item = %id, %destination, success = outcome.is_success(), "return processed");
    Ok(outcome)
}
