//! Main entry point
//!
//! [`Stockguard`] wraps a [`Ledger`] and exposes it through the
//! [`Sales`] and [`Stock`] handles.

use crate::error::Result;
use crate::primitives::{Sales, Stock};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stockguard_engine::{DurabilityMode, Ledger, LedgerBuilder, LedgerConfig};
use stockguard_storage::StatsSnapshot;

/// The stock ledger.
///
/// # Example
///
/// ```ignore
/// use stockguard::prelude::*;
///
/// let db = Stockguard::open("./stock")?;
/// db.stock.check_in("890123", false)?;
/// db.sales.sell("890123")?;
/// db.flush()?;
/// ```
pub struct Stockguard {
    inner: Arc<Ledger>,

    /// Sale operations
    pub sales: Sales,

    /// Receiving, returns and reads
    pub stock: Stock,
}

impl Stockguard {
    /// Open a ledger in `path` with default settings (buffered journal).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path).open()
    }

    /// Open a ledger from a TOML config file.
    pub fn open_with_config(path: impl AsRef<Path>) -> Result<Self> {
        let config = LedgerConfig::load(path)?;
        Self::builder().config(config).open()
    }

    /// In-memory ledger; creates no files and loses everything on drop.
    pub fn ephemeral() -> Result<Self> {
        Self::builder().ephemeral()
    }

    /// Create a builder.
    pub fn builder() -> StockguardBuilder {
        StockguardBuilder::new()
    }

    /// The engine-level ledger.
    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.inner
    }

    /// Effective configuration.
    pub fn config(&self) -> &LedgerConfig {
        self.inner.config()
    }

    /// Current durability mode.
    pub fn durability_mode(&self) -> DurabilityMode {
        self.inner.config().durability
    }

    /// Store counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats()
    }

    /// Push buffered journal entries to disk.
    pub fn flush(&self) -> Result<()> {
        Ok(self.inner.flush()?)
    }

    fn from_ledger(ledger: Ledger) -> Self {
        let inner = Arc::new(ledger);
        Self {
            sales: Sales::new(Arc::clone(&inner)),
            stock: Stock::new(Arc::clone(&inner)),
            inner,
        }
    }
}

/// Builder for [`Stockguard`].
///
/// ```ignore
/// let db = Stockguard::builder()
///     .path("./stock")
///     .strict()
///     .lock_timeout(Duration::from_secs(1))
///     .open()?;
/// ```
pub struct StockguardBuilder {
    inner: LedgerBuilder,
}

impl StockguardBuilder {
    /// Builder with default settings.
    pub fn new() -> Self {
        Self {
            inner: LedgerBuilder::new(),
        }
    }

    /// Start from a full configuration.
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.inner = self.inner.config(config);
        self
    }

    /// Data directory for the journal.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.inner = self.inner.path(path);
        self
    }

    /// No journal; state lives only in memory.
    pub fn no_durability(mut self) -> Self {
        self.inner = self.inner.durability(DurabilityMode::None);
        self
    }

    /// Journal every commit, fsync on flush (default).
    pub fn buffered(mut self) -> Self {
        self.inner = self.inner.durability(DurabilityMode::Buffered);
        self
    }

    /// Fsync the journal on every commit.
    pub fn strict(mut self) -> Self {
        self.inner = self.inner.durability(DurabilityMode::Strict);
        self
    }

    /// Bound on waiting for a per-item lock.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.lock_timeout(timeout);
        self
    }

    /// In-lock hold used by trials.
    pub fn trial_hold(mut self, hold: Duration) -> Self {
        self.inner = self.inner.trial_hold(hold);
        self
    }

    /// Open the ledger, replaying the journal if one exists.
    pub fn open(self) -> Result<Stockguard> {
        Ok(Stockguard::from_ledger(self.inner.open()?))
    }

    /// Open an in-memory ledger with the configured settings.
    pub fn ephemeral(self) -> Result<Stockguard> {
        Ok(Stockguard::from_ledger(self.inner.ephemeral()?))
    }
}

impl Default for StockguardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockguard_core::ReturnOutcome;

    #[test]
    fn test_handles_share_one_ledger() {
        let db = Stockguard::ephemeral().unwrap();
        db.stock.seed("A", "Widget", 1).unwrap();
        assert!(db.sales.sell("A").unwrap().is_sold());
        assert!(!db.sales.sell("A").unwrap().is_sold());

        let rec = db.stock.get("A").unwrap();
        assert_eq!((rec.count, rec.reserved), (0, 1));
    }

    #[test]
    fn test_reopen_recovers_state() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Stockguard::builder().path(dir.path()).strict().open().unwrap();
            db.stock.check_in("A", false).unwrap();
            db.stock.check_in("A", false).unwrap();
            db.sales.sell("A").unwrap();
            db.stock.process_return_to("A", "trash").unwrap();
        }
        let db = Stockguard::open(dir.path()).unwrap();
        let rec = db.stock.get("A").unwrap();
        assert_eq!((rec.count, rec.reserved), (1, 1));
        assert_eq!(db.stock.bin_count(stockguard_core::Bin::Trash, "A"), 1);
    }

    #[test]
    fn test_unknown_destination_is_invalid_input() {
        let db = Stockguard::ephemeral().unwrap();
        let err = db.stock.process_return_to("A", "attic").unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
    }

    #[test]
    fn test_shelf_return_of_unknown_item_is_rejected() {
        let db = Stockguard::ephemeral().unwrap();
        let out = db
            .stock
            .process_return("ghost", stockguard_core::ReturnDestination::Shelf)
            .unwrap();
        assert!(matches!(out, ReturnOutcome::Rejected { .. }));
    }
}
