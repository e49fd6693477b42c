//! Ledger counters

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters maintained by the store
#[derive(Debug, Default)]
pub struct LedgerStats {
    commits: AtomicU64,
    aborts: AtomicU64,
    lock_timeouts: AtomicU64,
    commit_failures: AtomicU64,
}

/// Point-in-time copy of [`LedgerStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Committed item or bin mutations
    pub commits: u64,
    /// Locked transactions that chose not to write
    pub aborts: u64,
    /// Lock waits that hit the timeout
    pub lock_timeouts: u64,
    /// Commits the journal refused
    pub commit_failures: u64,
}

impl LedgerStats {
    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_abort(&self) {
        self.aborts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_timeout(&self) {
        self.lock_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit_failure(&self) {
        self.commit_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            commits: self.commits.load(Ordering::Relaxed),
            aborts: self.aborts.load(Ordering::Relaxed),
            lock_timeouts: self.lock_timeouts.load(Ordering::Relaxed),
            commit_failures: self.commit_failures.load(Ordering::Relaxed),
        }
    }
}
