//! Ledger database handle
//!
//! [`Ledger`] owns a configured [`LedgerStore`] and exposes every ledger
//! operation. Create one with [`Ledger::open`], [`Ledger::ephemeral`] or
//! [`Ledger::builder`]:
//!
//! ```ignore
//! let ledger = Ledger::builder()
//!     .path("./stock")
//!     .durability(DurabilityMode::Strict)
//!     .open()?;
//!
//! ledger.check_in(&ItemId::from("890123"), false)?;
//! let outcome = ledger.attempt_sale(&ItemId::from("890123"))?;
//! ```

use crate::config::LedgerConfig;
use crate::inventory::{list_inventory, InventoryEntry};
use crate::reservation::ReservationEngine;
use crate::trial::{TrialHarness, TrialReport};
use crate::workflows;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use stockguard_core::{
    Bin, BinRecord, Error, ItemId, ItemRecord, Placement, Result, ReturnDestination,
    ReturnOutcome, SaleOutcome,
};
use stockguard_storage::{DurabilityMode, LedgerStore, StatsSnapshot};
use tracing::info;

/// The ledger database
pub struct Ledger {
    store: Arc<LedgerStore>,
    engine: ReservationEngine,
    config: LedgerConfig,
}

impl Ledger {
    /// Open a ledger as described by `config`
    ///
    /// With a data directory and a journaling durability mode the journal is
    /// replayed (and created if absent); otherwise the ledger is in-memory.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        config.validate()?;

        let store = match config.journal_path() {
            Some(path) => {
                if let Some(dir) = path.parent() {
                    std::fs::create_dir_all(dir)?;
                }
                LedgerStore::open(&path, config.durability, config.lock_timeout())?
            }
            None => LedgerStore::in_memory(config.lock_timeout()),
        };

        info!(
            data_dir = ?config.data_dir,
            durability = config.durability.description(),
            lock_timeout_ms = config.lock_timeout_ms,
            items = store.item_count(),
            "ledger opened"
        );
        Ok(Self::from_store(Arc::new(store), config))
    }

    /// In-memory ledger with default settings
    pub fn ephemeral() -> Self {
        Self::from_store(Arc::new(LedgerStore::ephemeral()), LedgerConfig::default())
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<LedgerStore>, config: LedgerConfig) -> Self {
        Self {
            engine: ReservationEngine::new(Arc::clone(&store)),
            store,
            config,
        }
    }

    /// Start building a ledger
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::new()
    }

    /// Effective configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// The reservation engine
    pub fn engine(&self) -> &ReservationEngine {
        &self.engine
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Try to sell one unit; see [`ReservationEngine::attempt_sale`]
    pub fn attempt_sale(&self, id: &ItemId) -> Result<SaleOutcome> {
        self.engine.attempt_sale(id)
    }

    /// Run a concurrent trial using the configured hold and size cap
    pub fn run_trial(&self, id: &ItemId, num_requests: usize) -> Result<TrialReport> {
        self.trial_harness(self.config.trial.hold()).run_trial(id, num_requests)
    }

    /// Run a concurrent trial with an explicit in-lock hold
    pub fn run_trial_with_hold(
        &self,
        id: &ItemId,
        num_requests: usize,
        hold: Duration,
    ) -> Result<TrialReport> {
        self.trial_harness(hold).run_trial(id, num_requests)
    }

    fn trial_harness(&self, hold: Duration) -> TrialHarness {
        TrialHarness::new(self.engine.clone(), hold, self.config.trial.max_requests)
    }

    // =========================================================================
    // Check-in / returns
    // =========================================================================

    /// Receive one unit; see [`workflows::check_in`]
    pub fn check_in(&self, id: &ItemId, defective: bool) -> Result<Placement> {
        workflows::check_in(&self.store, &self.config.checkin, id, defective)
    }

    /// Route one returned unit; see [`workflows::process_return`]
    pub fn process_return(
        &self,
        id: &ItemId,
        destination: ReturnDestination,
    ) -> Result<ReturnOutcome> {
        workflows::process_return(&self.store, id, destination)
    }

    // =========================================================================
    // Administration and reads
    // =========================================================================

    /// Create or overwrite an item's name and available count
    pub fn seed_item(&self, id: &ItemId, name: &str, count: u64) -> Result<ItemRecord> {
        stockguard_core::validate_item_id(id)?;
        self.store.seed_item(id, name, count)
    }

    /// Change an item's display name
    pub fn rename_item(&self, id: &ItemId, name: &str) -> Result<ItemRecord> {
        stockguard_core::validate_item_id(id)?;
        self.store.rename_item(id, name)
    }

    /// Committed state of one item
    pub fn get_item(&self, id: &ItemId) -> Result<ItemRecord> {
        self.store
            .get_item(id)
            .ok_or_else(|| Error::NotFound(format!("item {}", id)))
    }

    /// Every item with its derived status
    pub fn inventory(&self) -> Vec<InventoryEntry> {
        list_inventory(&self.store)
    }

    /// Tally for one item in one bin
    pub fn bin_count(&self, bin: Bin, id: &ItemId) -> u64 {
        self.store.bin_count(bin, id)
    }

    /// Every tally in a bin
    pub fn list_bin(&self, bin: Bin) -> Vec<BinRecord> {
        self.store.list_bin(bin)
    }

    /// Store counters
    pub fn stats(&self) -> StatsSnapshot {
        self.store.stats()
    }

    /// Push buffered journal entries to disk
    pub fn flush(&self) -> Result<()> {
        self.store.sync()
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`Ledger`]
///
/// ```ignore
/// // Tests: in memory, fast trials
/// let ledger = Ledger::builder().trial_hold(Duration::ZERO).open()?;
///
/// // Production: journaled, fsync per commit
/// let ledger = Ledger::builder().path("./stock").durability(DurabilityMode::Strict).open()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LedgerBuilder {
    config: LedgerConfig,
}

impl LedgerBuilder {
    /// Builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Keep the journal in `path`
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the durability mode
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.config.durability = mode;
        self
    }

    /// Set the lock wait bound
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.config.lock_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the trial in-lock hold
    pub fn trial_hold(mut self, hold: Duration) -> Self {
        self.config.trial.hold_ms = hold.as_millis() as u64;
        self
    }

    /// Set the largest accepted trial size
    pub fn max_trial_requests(mut self, max: usize) -> Self {
        self.config.trial.max_requests = max;
        self
    }

    /// Open the ledger
    pub fn open(self) -> Result<Ledger> {
        Ledger::open(self.config)
    }

    /// Open an in-memory ledger, ignoring any configured path
    pub fn ephemeral(mut self) -> Result<Ledger> {
        self.config.data_dir = None;
        self.config.durability = DurabilityMode::None;
        Ledger::open(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ephemeral_round_trip() {
        let ledger = Ledger::builder().trial_hold(Duration::ZERO).ephemeral().unwrap();
        let id = ItemId::from("X");
        ledger.check_in(&id, false).unwrap();
        assert!(ledger.attempt_sale(&id).unwrap().is_sold());
        assert!(!ledger.attempt_sale(&id).unwrap().is_sold());

        let rec = ledger.get_item(&id).unwrap();
        assert_eq!((rec.count, rec.reserved), (0, 1));
    }

    #[test]
    fn test_reopen_recovers_sales() {
        let dir = TempDir::new().unwrap();
        let id = ItemId::from("X");
        {
            let ledger = Ledger::builder()
                .path(dir.path())
                .durability(DurabilityMode::Strict)
                .trial_hold(Duration::ZERO)
                .open()
                .unwrap();
            ledger.seed_item(&id, "Widget", 3).unwrap();
            let report = ledger.run_trial(&id, 5).unwrap();
            assert_eq!(report.successful, 3);
        }

        let ledger = Ledger::builder().path(dir.path()).open().unwrap();
        let rec = ledger.get_item(&id).unwrap();
        assert_eq!((rec.count, rec.reserved), (0, 3));
    }

    #[test]
    fn test_missing_item_read_is_not_found() {
        let ledger = Ledger::ephemeral();
        assert!(ledger.get_item(&ItemId::from("nope")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_config_is_refused() {
        let err = Ledger::builder()
            .lock_timeout(Duration::ZERO)
            .ephemeral()
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
