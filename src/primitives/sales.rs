//! Sales handle
//!
//! ```ignore
//! let db = Stockguard::ephemeral()?;
//! db.stock.seed("A", "Widget", 1)?;
//!
//! assert!(db.sales.sell("A")?.is_sold());
//! assert!(!db.sales.sell("A")?.is_sold()); // Overselling Prevented
//! ```

use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use stockguard_core::{ItemId, SaleOutcome};
use stockguard_engine::{Ledger, TrialReport};

/// Sale operations.
///
/// Access via `db.sales`.
#[derive(Clone)]
pub struct Sales {
    ledger: Arc<Ledger>,
}

impl Sales {
    pub(crate) fn new(ledger: Arc<Ledger>) -> Self {
        Self { ledger }
    }

    /// Sell one unit.
    ///
    /// Returns `Prevented` when the item is out of stock or unknown; that is
    /// an answer, not an error.
    pub fn sell(&self, item: impl Into<ItemId>) -> Result<SaleOutcome> {
        Ok(self.ledger.attempt_sale(&item.into())?)
    }

    /// Fire `num_requests` simultaneous sales at one item.
    ///
    /// Uses the configured in-lock hold.
    pub fn trial(&self, item: impl Into<ItemId>, num_requests: usize) -> Result<TrialReport> {
        Ok(self.ledger.run_trial(&item.into(), num_requests)?)
    }

    /// Like [`Sales::trial`] with an explicit in-lock hold.
    pub fn trial_with_hold(
        &self,
        item: impl Into<ItemId>,
        num_requests: usize,
        hold: Duration,
    ) -> Result<TrialReport> {
        Ok(self
            .ledger
            .run_trial_with_hold(&item.into(), num_requests, hold)?)
    }
}
