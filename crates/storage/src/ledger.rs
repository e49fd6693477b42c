//! Ledger store with per-item pessimistic locking
//!
//! # Design
//!
//! - One `Arc<Mutex<Option<ItemRecord>>>` cell per item, held in a sharded
//!   DashMap. `None` marks a cell whose creating commit is still in flight
//!   or failed; it reads as a missing item.
//! - A transaction clones the cell's `Arc` out of the map, releases the
//!   shard, then blocks on the cell. No shard guard is held while waiting on
//!   a cell or while writing the journal, so items that hash to the same
//!   shard do not contend.
//! - A new item is published as an empty cell that is already locked by its
//!   creator; the journal append happens after the shard is released.
//! - The cell guard is held across read, decision, journal append and
//!   in-memory write. Release happens when the guard drops, which covers
//!   commit, abort, error and unwinding alike.
//! - The journal append is the commit point. If it fails, the in-memory
//!   record is left untouched.
//!
//! Lock waits are bounded by the store's lock timeout (or a per-call bound);
//! a timed-out wait is reported as [`Error::LockTimeout`] with nothing
//! applied. Bin tallies follow the same cell discipline.

use crate::durability::DurabilityMode;
use crate::journal::{read_journal, FileJournal, Journal, JournalEntry, NullJournal};
use crate::stats::{LedgerStats, StatsSnapshot};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use stockguard_core::{Bin, BinRecord, Error, ItemId, ItemRecord, Result};
use tracing::{debug, error, info, warn};

/// Default bound on how long a caller waits for a contended item lock
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

type FxBuildHasher = BuildHasherDefault<FxHasher>;
type ItemCell = Arc<Mutex<Option<ItemRecord>>>;
type BinCell = Arc<Mutex<u64>>;

/// What a locked transaction decided to do
#[derive(Debug)]
pub enum TxnDecision<R> {
    /// Write `post` as the item's new state, then return `result`
    Commit {
        /// New state of the locked item
        post: ItemRecord,
        /// Value handed back to the caller
        result: R,
    },
    /// Write nothing, return the value
    Abort(R),
}

/// The Ledger Store
///
/// Holds item records and bin tallies. All mutating operations on an item
/// serialize on that item's lock; reads through [`LedgerStore::get_item`]
/// take the lock only for the duration of a clone, so they never observe a
/// half-applied transition.
pub struct LedgerStore {
    items: DashMap<ItemId, ItemCell, FxBuildHasher>,
    bins: DashMap<(Bin, ItemId), BinCell, FxBuildHasher>,
    journal: Mutex<Box<dyn Journal>>,
    next_seq: AtomicU64,
    lock_timeout: Duration,
    stats: LedgerStats,
}

impl LedgerStore {
    /// Create an empty store with no journal
    pub fn ephemeral() -> Self {
        Self::in_memory(DEFAULT_LOCK_TIMEOUT)
    }

    /// Create an empty store with no journal and a custom lock bound
    pub fn in_memory(lock_timeout: Duration) -> Self {
        Self::with_journal(Box::new(NullJournal), lock_timeout)
    }

    /// Create an empty store writing commits to `journal`
    pub fn with_journal(journal: Box<dyn Journal>, lock_timeout: Duration) -> Self {
        Self {
            items: DashMap::with_hasher(FxBuildHasher::default()),
            bins: DashMap::with_hasher(FxBuildHasher::default()),
            journal: Mutex::new(journal),
            next_seq: AtomicU64::new(1),
            lock_timeout,
            stats: LedgerStats::default(),
        }
    }

    /// Open a journal-backed store, replaying whatever the journal holds
    ///
    /// With [`DurabilityMode::None`] no file is read or created.
    pub fn open(path: impl AsRef<Path>, mode: DurabilityMode, lock_timeout: Duration) -> Result<Self> {
        if !mode.requires_journal() {
            return Ok(Self::in_memory(lock_timeout));
        }

        let path = path.as_ref();
        let report = read_journal(path)?;
        let journal = FileJournal::open(path, mode)?;
        let store = Self::with_journal(Box::new(journal), lock_timeout);
        let replayed = report.entries.len();
        store.replay(report.entries);

        info!(
            path = %path.display(),
            entries = replayed,
            items = store.items.len(),
            truncated_at = ?report.truncated_at,
            "ledger recovered"
        );
        Ok(store)
    }

    /// Apply journal entries without re-journaling them
    pub fn replay(&self, entries: impl IntoIterator<Item = JournalEntry>) {
        let mut max_seq = 0;
        for entry in entries {
            max_seq = max_seq.max(entry.seq());
            match entry {
                JournalEntry::ItemPut { record, .. } => {
                    self.items
                        .insert(record.id.clone(), Arc::new(Mutex::new(Some(record))));
                }
                JournalEntry::BinPut { bin, id, count, .. } => {
                    self.bins.insert((bin, id), Arc::new(Mutex::new(count)));
                }
            }
        }
        self.next_seq.fetch_max(max_seq + 1, Ordering::AcqRel);
    }

    /// Bound applied to every lock wait
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Counter snapshot
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // ========================================================================
    // Locked transactions
    // ========================================================================

    /// Lock one item, read it, let `f` decide, commit or abort, release
    ///
    /// `f` runs with the item's lock held and receives the current record,
    /// or `None` if the item does not exist (in which case a `Commit`
    /// decision is refused). Nothing `f` decides is visible to any other
    /// caller until the journal has accepted it.
    ///
    /// # Errors
    ///
    /// - [`Error::LockTimeout`] if the lock is not acquired within the bound
    /// - [`Error::Journal`] / [`Error::Storage`] if the commit fails
    /// - whatever `f` returns
    ///
    /// In every error case the item's committed state is unchanged.
    pub fn lock_for_update<R, F>(&self, id: &ItemId, f: F) -> Result<R>
    where
        F: FnOnce(Option<&ItemRecord>) -> Result<TxnDecision<R>>,
    {
        self.lock_for_update_within(id, self.lock_timeout, f)
    }

    /// [`lock_for_update`](Self::lock_for_update) with an explicit wait bound
    pub fn lock_for_update_within<R, F>(&self, id: &ItemId, timeout: Duration, f: F) -> Result<R>
    where
        F: FnOnce(Option<&ItemRecord>) -> Result<TxnDecision<R>>,
    {
        // Clone the cell out so the shard guard is dropped before we block.
        let cell = self.items.get(id).map(|entry| Arc::clone(entry.value()));
        let Some(cell) = cell else {
            return self.decide_missing(id, f);
        };

        let started = Instant::now();
        let mut guard = match cell.try_lock_for(timeout) {
            Some(guard) => guard,
            None => {
                let waited_ms = started.elapsed().as_millis() as u64;
                self.stats.record_timeout();
                warn!(item = %id, waited_ms, "lock wait timed out");
                return Err(Error::LockTimeout {
                    item: id.clone(),
                    waited_ms,
                });
            }
        };
        debug!(item = %id, waited_us = started.elapsed().as_micros() as u64, "item lock acquired");

        if guard.is_none() {
            // Creation of this item never committed.
            drop(guard);
            return self.decide_missing(id, f);
        }

        match f((*guard).as_ref())? {
            TxnDecision::Abort(result) => {
                self.stats.record_abort();
                debug!(item = %id, "transaction aborted");
                Ok(result)
            }
            TxnDecision::Commit { post, result } => {
                if post.id != *id {
                    return Err(Error::Internal(format!(
                        "transaction on {} tried to write {}",
                        id, post.id
                    )));
                }
                self.commit_item(&post)?;
                debug!(item = %id, count = post.count, reserved = post.reserved, "transaction committed");
                *guard = Some(post);
                Ok(result)
            }
        }
    }

    fn decide_missing<R, F>(&self, id: &ItemId, f: F) -> Result<R>
    where
        F: FnOnce(Option<&ItemRecord>) -> Result<TxnDecision<R>>,
    {
        match f(None)? {
            TxnDecision::Abort(result) => {
                self.stats.record_abort();
                Ok(result)
            }
            TxnDecision::Commit { .. } => Err(Error::Internal(format!(
                "commit requested for missing item {}",
                id
            ))),
        }
    }

    /// Append an item post-image to the journal
    fn commit_item(&self, post: &ItemRecord) -> Result<()> {
        let entry = JournalEntry::ItemPut {
            seq: self.next_seq.fetch_add(1, Ordering::AcqRel),
            timestamp: chrono::Utc::now().timestamp_micros(),
            record: post.clone(),
        };
        self.append(entry)
    }

    fn append(&self, entry: JournalEntry) -> Result<()> {
        let outcome = self.journal.lock().append(&entry);
        match outcome {
            Ok(()) => {
                self.stats.record_commit();
                Ok(())
            }
            Err(e) => {
                self.stats.record_commit_failure();
                error!(item = %entry.item_id(), seq = entry.seq(), error = %e, "commit failed, mutation discarded");
                Err(match e {
                    Error::Journal(_) | Error::Storage(_) => e,
                    other => Error::Storage(other.to_string()),
                })
            }
        }
    }

    // ========================================================================
    // Increment / insert
    // ========================================================================

    /// Publish `record` as a new item, unless the id is already taken
    ///
    /// Returns `None` if a cell for the id exists. The cell is inserted
    /// empty and locked, the shard is released, and only then is the record
    /// journaled. Callers that find the cell meanwhile wait on its lock; if
    /// the commit fails the cell is withdrawn and they see no item.
    fn create_item(&self, record: ItemRecord) -> Result<Option<ItemRecord>> {
        let cell: ItemCell = Arc::new(Mutex::new(None));
        let mut guard = cell.lock();

        match self.items.entry(record.id.clone()) {
            Entry::Occupied(_) => return Ok(None),
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&cell));
            }
        }

        if let Err(e) = self.commit_item(&record) {
            self.items
                .remove_if(&record.id, |_, existing| Arc::ptr_eq(existing, &cell));
            return Err(e);
        }
        debug!(item = %record.id, count = record.count, "item created");
        *guard = Some(record.clone());
        Ok(Some(record))
    }

    /// Add one unit to an existing item, or create it with `seed`
    ///
    /// Returns the committed record and whether it was created. Existing
    /// items are incremented under their lock; absent items go through the
    /// locked-empty-cell publication, so no caller ever sees a record that
    /// has not been committed. `increment_existing = false` leaves an
    /// existing record untouched.
    pub fn increment_or_insert(
        &self,
        id: &ItemId,
        increment_existing: bool,
        seed: impl Fn() -> ItemRecord,
    ) -> Result<(ItemRecord, bool)> {
        loop {
            if !self.items.contains_key(id) {
                let record = seed();
                if record.id != *id {
                    return Err(Error::Internal(format!(
                        "seed for {} produced record for {}",
                        id, record.id
                    )));
                }
                if let Some(record) = self.create_item(record)? {
                    return Ok((record, true));
                }
            }

            let existing = self.lock_for_update(id, |current| {
                Ok(match current {
                    None => TxnDecision::Abort(None),
                    Some(current) if increment_existing => {
                        let post = current.restock_one()?;
                        TxnDecision::Commit {
                            result: Some(post.clone()),
                            post,
                        }
                    }
                    Some(current) => TxnDecision::Abort(Some(current.clone())),
                })
            })?;
            if let Some(record) = existing {
                return Ok((record, false));
            }
            // A concurrent creation was withdrawn; try again.
        }
    }

    /// Add one unit to an existing item; `None` if the item is unknown
    pub fn increment_count(&self, id: &ItemId) -> Result<Option<ItemRecord>> {
        self.lock_for_update(id, |current| {
            Ok(match current {
                Some(current) => {
                    let post = current.restock_one()?;
                    TxnDecision::Commit {
                        result: Some(post.clone()),
                        post,
                    }
                }
                None => TxnDecision::Abort(None),
            })
        })
    }

    /// Create or overwrite an item's name and available count
    ///
    /// `reserved` is preserved for existing items.
    pub fn seed_item(&self, id: &ItemId, name: &str, count: u64) -> Result<ItemRecord> {
        loop {
            let (record, created) =
                self.increment_or_insert(id, false, || ItemRecord::new(id.clone(), name, count))?;
            if created {
                return Ok(record);
            }
            let updated = self.lock_for_update(id, |current| {
                Ok(match current {
                    None => TxnDecision::Abort(None),
                    Some(current) => {
                        let post = ItemRecord {
                            name: name.to_string(),
                            count,
                            ..current.clone()
                        };
                        TxnDecision::Commit {
                            result: Some(post.clone()),
                            post,
                        }
                    }
                })
            })?;
            if let Some(record) = updated {
                return Ok(record);
            }
        }
    }

    /// Change an item's display name
    pub fn rename_item(&self, id: &ItemId, name: &str) -> Result<ItemRecord> {
        self.lock_for_update(id, |current| {
            let current = current.ok_or_else(|| Error::NotFound(format!("item {}", id)))?;
            let post = ItemRecord {
                name: name.to_string(),
                ..current.clone()
            };
            Ok(TxnDecision::Commit {
                result: post.clone(),
                post,
            })
        })
    }

    /// Add one unit to an item's tally in `bin`, creating the tally if needed
    ///
    /// Returns the new tally. The tally's cell is locked for the append; the
    /// shard is not.
    pub fn increment_bin(&self, bin: Bin, id: &ItemId) -> Result<u64> {
        let cell = Arc::clone(
            self.bins
                .entry((bin, id.clone()))
                .or_insert_with(|| Arc::new(Mutex::new(0)))
                .value(),
        );

        let started = Instant::now();
        let mut tally = cell.try_lock_for(self.lock_timeout).ok_or_else(|| {
            self.stats.record_timeout();
            Error::LockTimeout {
                item: id.clone(),
                waited_ms: started.elapsed().as_millis() as u64,
            }
        })?;

        let count = tally.checked_add(1).ok_or_else(|| {
            Error::InvalidInput(format!("{} tally for item {} is at its maximum", bin, id))
        })?;
        self.commit_bin(bin, id, count)?;
        *tally = count;
        Ok(count)
    }

    fn commit_bin(&self, bin: Bin, id: &ItemId, count: u64) -> Result<()> {
        self.append(JournalEntry::BinPut {
            seq: self.next_seq.fetch_add(1, Ordering::AcqRel),
            timestamp: chrono::Utc::now().timestamp_micros(),
            bin,
            id: id.clone(),
            count,
        })
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current committed state of one item
    pub fn get_item(&self, id: &ItemId) -> Option<ItemRecord> {
        let cell = self.items.get(id).map(|entry| Arc::clone(entry.value()))?;
        let record = cell.lock().clone();
        record
    }

    /// Whether an item exists
    pub fn contains_item(&self, id: &ItemId) -> bool {
        self.get_item(id).is_some()
    }

    /// Every item, sorted by id
    ///
    /// Each record is individually consistent; the list as a whole is not a
    /// point-in-time snapshot.
    pub fn list_items(&self) -> Vec<ItemRecord> {
        let cells: Vec<ItemCell> = self
            .items
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        let mut records: Vec<ItemRecord> =
            cells.iter().filter_map(|cell| cell.lock().clone()).collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Number of item cells, including any whose creation is in flight
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Tally for one item in one bin (0 if never binned)
    pub fn bin_count(&self, bin: Bin, id: &ItemId) -> u64 {
        let cell = self
            .bins
            .get(&(bin, id.clone()))
            .map(|entry| Arc::clone(entry.value()));
        cell.map(|cell| *cell.lock()).unwrap_or(0)
    }

    /// Every non-zero tally in `bin`, sorted by item id
    pub fn list_bin(&self, bin: Bin) -> Vec<BinRecord> {
        let cells: Vec<(ItemId, BinCell)> = self
            .bins
            .iter()
            .filter(|entry| entry.key().0 == bin)
            .map(|entry| (entry.key().1.clone(), Arc::clone(entry.value())))
            .collect();
        let mut records: Vec<BinRecord> = cells
            .into_iter()
            .map(|(id, cell)| BinRecord {
                id,
                count: *cell.lock(),
            })
            .filter(|record| record.count > 0)
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records
    }

    /// Push buffered journal entries to stable storage
    pub fn sync(&self) -> Result<()> {
        self.journal.lock().sync()
    }
}

impl Default for LedgerStore {
    fn default() -> Self {
        Self::ephemeral()
    }
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("items", &self.items.len())
            .field("bins", &self.bins.len())
            .field("lock_timeout", &self.lock_timeout)
            .finish()
    }
}
