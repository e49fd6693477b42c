//! Ledger configuration
//!
//! Loaded from TOML; every field has a default, so an empty file is valid.
//!
//! ```toml
//! data_dir = "/var/lib/stockguard"
//! durability = "strict"
//! lock_timeout_ms = 2000
//!
//! [trial]
//! hold_ms = 100
//! max_requests = 500
//!
//! [checkin]
//! shelf_location = "Shelf A-12"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stockguard_core::{Error, Result};
use stockguard_storage::DurabilityMode;

/// Journal file name inside `data_dir`
pub const JOURNAL_FILE_NAME: &str = "ledger.journal";

/// Top-level ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Directory holding the journal; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// When commits reach disk
    pub durability: DurabilityMode,
    /// Bound on waiting for a contended item lock
    pub lock_timeout_ms: u64,
    /// Concurrent trial settings
    pub trial: TrialConfig,
    /// Check-in labels
    pub checkin: CheckinConfig,
}

/// Concurrent trial settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrialConfig {
    /// How long a successful attempt keeps the item locked before committing
    pub hold_ms: u64,
    /// Largest accepted `numRequests`
    pub max_requests: usize,
    /// `numRequests` used when the caller gives none
    pub default_requests: usize,
}

/// Check-in placement labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckinConfig {
    /// Location for good units
    pub shelf_location: String,
    /// Location for defective units
    pub quarantine_location: String,
    /// Name given to items created by check-in
    pub default_name: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            durability: DurabilityMode::Buffered,
            lock_timeout_ms: 5_000,
            trial: TrialConfig::default(),
            checkin: CheckinConfig::default(),
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            hold_ms: 100,
            max_requests: 500,
            default_requests: 5,
        }
    }
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            shelf_location: "Shelf A-12".to_string(),
            quarantine_location: "Quarantine Q-1".to_string(),
            default_name: "Auto Product".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LedgerConfig =
            toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Reject settings no ledger can run with
    pub fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(Error::Config("lock_timeout_ms must be positive".into()));
        }
        if self.trial.max_requests == 0 {
            return Err(Error::Config("trial.max_requests must be positive".into()));
        }
        if self.trial.default_requests == 0 || self.trial.default_requests > self.trial.max_requests {
            return Err(Error::Config(format!(
                "trial.default_requests must be in 1..={}",
                self.trial.max_requests
            )));
        }
        Ok(())
    }

    /// Lock wait bound as a duration
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Journal path, if this ledger has a data directory and a journaling mode
    pub fn journal_path(&self) -> Option<PathBuf> {
        match &self.data_dir {
            Some(dir) if self.durability.requires_journal() => Some(dir.join(JOURNAL_FILE_NAME)),
            _ => None,
        }
    }
}

impl TrialConfig {
    /// In-lock hold as a duration
    pub fn hold(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}
