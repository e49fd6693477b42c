//! Commit journal
//!
//! Every committed mutation is appended here before it becomes visible in
//! the in-memory ledger. Entries carry full post-images, so replay is
//! last-writer-wins per key and needs no transaction bracketing: each
//! ledger transaction touches exactly one item or one bin tally and
//! produces exactly one entry.
//!
//! - [`JournalEntry`]: the two record kinds
//! - [`Journal`]: append seam, implemented by [`FileJournal`] and [`NullJournal`]
//! - [`read_journal`]: decode a journal file for recovery

mod file;

pub use file::{read_journal, FileJournal, ReplayReport, JOURNAL_MAGIC, MAX_RECORD_LEN};

use serde::{Deserialize, Serialize};
use stockguard_core::{Bin, ItemId, ItemRecord, Result};

/// One committed mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalEntry {
    /// Full post-image of an item record
    ItemPut {
        /// Commit sequence number
        seq: u64,
        /// Commit time, microseconds since the Unix epoch
        timestamp: i64,
        /// Record as committed
        record: ItemRecord,
    },

    /// New tally for one item in one bin
    BinPut {
        /// Commit sequence number
        seq: u64,
        /// Commit time, microseconds since the Unix epoch
        timestamp: i64,
        /// Target bin
        bin: Bin,
        /// Item the tally belongs to
        id: ItemId,
        /// Tally as committed
        count: u64,
    },
}

impl JournalEntry {
    /// Commit sequence number
    pub fn seq(&self) -> u64 {
        match self {
            JournalEntry::ItemPut { seq, .. } => *seq,
            JournalEntry::BinPut { seq, .. } => *seq,
        }
    }

    /// Item the entry concerns
    pub fn item_id(&self) -> &ItemId {
        match self {
            JournalEntry::ItemPut { record, .. } => &record.id,
            JournalEntry::BinPut { id, .. } => id,
        }
    }
}

/// Append-only sink for committed mutations
///
/// An `append` that returns `Ok` is the commit point. An `append` that
/// returns `Err` must leave nothing the next replay would apply.
pub trait Journal: Send {
    /// Append one entry
    fn append(&mut self, entry: &JournalEntry) -> Result<()>;

    /// Push buffered entries to stable storage
    fn sync(&mut self) -> Result<()>;
}

/// Journal for ephemeral ledgers; accepts everything, keeps nothing
#[derive(Debug, Default)]
pub struct NullJournal;

impl Journal for NullJournal {
    fn append(&mut self, _entry: &JournalEntry) -> Result<()> {
        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}
