//! Reservation engine
//!
//! A sale is one locked transaction on one item:
//!
//! ```text
//! 1. lock(item)                       blocks behind any other mutation of item
//! 2. read count
//! 3. count == 0 or missing  -> abort, Prevented
//! 4. count -= 1, reserved += 1
//! 5. journal the post-image           commit point
//! 6. publish, unlock                  Sold
//! ```
//!
//! Because steps 2–6 run under the item's lock, no second sale can pass
//! its stock check against a count that is about to be decremented. The
//! engine keeps no state of its own and never retries: a prevented sale is
//! an answer, and a fault is returned to the caller as-is.

use std::sync::Arc;
use std::time::Duration;
use stockguard_core::{
    validate_item_id, ItemId, ItemRecord, PreventionReason, Result, SaleOutcome,
};
use stockguard_storage::{LedgerStore, TxnDecision};
use tracing::debug;

/// Hooks into the locked section of a sale
///
/// Both callbacks run with the item's lock held (or, for a missing item,
/// at the point the lock would have been taken). The trial harness uses
/// them to time lock acquisition and to widen the critical section.
pub trait SaleObserver {
    /// The item's lock has just been acquired
    fn on_lock_acquired(&self) {}

    /// A sale has been decided but not yet committed
    fn before_commit(&self, _post: &ItemRecord) {}
}

/// Observer that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SaleObserver for NoopObserver {}

/// The serialization point for sales
#[derive(Debug, Clone)]
pub struct ReservationEngine {
    store: Arc<LedgerStore>,
}

impl ReservationEngine {
    /// Create an engine over a store
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// The store this engine writes to
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Try to sell one unit of `id`
    ///
    /// Returns `Sold` with the committed record, or `Prevented` when the
    /// item is missing or out of stock. `Err` means a fault (invalid id,
    /// lock timeout, failed commit) and that nothing was applied.
    pub fn attempt_sale(&self, id: &ItemId) -> Result<SaleOutcome> {
        self.attempt_sale_observed(id, &NoopObserver)
    }

    /// [`attempt_sale`](Self::attempt_sale) with hooks into the locked section
    pub fn attempt_sale_observed(
        &self,
        id: &ItemId,
        observer: &dyn SaleObserver,
    ) -> Result<SaleOutcome> {
        self.attempt_sale_within(id, self.store.lock_timeout(), observer)
    }

    /// [`attempt_sale_observed`](Self::attempt_sale_observed) with an
    /// explicit bound on the lock wait instead of the store's
    pub fn attempt_sale_within(
        &self,
        id: &ItemId,
        lock_wait: Duration,
        observer: &dyn SaleObserver,
    ) -> Result<SaleOutcome> {
        validate_item_id(id)?;

        let outcome = self.store.lock_for_update_within(id, lock_wait, |current| {
            observer.on_lock_acquired();

            let Some(current) = current else {
                return Ok(TxnDecision::Abort(SaleOutcome::Prevented(
                    PreventionReason::NotFound,
                )));
            };
            match current.reserve_one()? {
                None => Ok(TxnDecision::Abort(SaleOutcome::Prevented(
                    PreventionReason::InsufficientStock,
                ))),
                Some(post) => {
                    observer.before_commit(&post);
                    Ok(TxnDecision::Commit {
                        result: SaleOutcome::Sold(post.clone()),
                        post,
                    })
                }
            }
        })?;

        debug!(item = %id, sold = outcome.is_sold(), reason = ?outcome.reason(), "sale attempt finished");
        Ok(outcome)
    }
}
