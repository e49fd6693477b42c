//! Error types for the stockguard ledger
//!
//! Only system and validation faults live here. Business outcomes such as
//! a prevented sale are modelled as values in [`crate::outcome`].

use crate::types::ItemId;
use thiserror::Error;

/// Faults that abort a single request
///
/// Every variant guarantees the committed ledger state is unchanged by the
/// failing operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input, rejected before any lock is taken
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested entity does not exist (outside the sale path)
    #[error("not found: {0}")]
    NotFound(String),

    /// The per-item lock was not acquired within the configured bound
    #[error("timed out after {waited_ms}ms waiting for lock on item {item}")]
    LockTimeout {
        /// Contended item
        item: ItemId,
        /// How long the caller waited
        waited_ms: u64,
    },

    /// The store refused or failed a commit
    #[error("storage error: {0}")]
    Storage(String),

    /// The commit journal could not be written or synced
    #[error("journal error: {0}")]
    Journal(String),

    /// Journal contents failed validation on replay
    #[error("corruption: {0}")]
    Corruption(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {0}")]
    Config(String),

    /// Encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invariant violation
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Malformed input rather than a system problem
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }

    /// The entity was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Lock wait exceeded its bound
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::LockTimeout { .. })
    }

    /// System fault: store, journal, corruption, timeout or internal error
    pub fn is_fault(&self) -> bool {
        !self.is_validation() && !self.is_not_found()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Error::InvalidInput("x".into()).is_validation());
        assert!(!Error::InvalidInput("x".into()).is_fault());
        assert!(Error::NotFound("x".into()).is_not_found());

        let timeout = Error::LockTimeout {
            item: ItemId::from("X"),
            waited_ms: 10,
        };
        assert!(timeout.is_timeout());
        assert!(timeout.is_fault());
        assert!(Error::Storage("gone".into()).is_fault());
    }

    #[test]
    fn test_timeout_display_names_the_item() {
        let timeout = Error::LockTimeout {
            item: ItemId::from("SKU-1"),
            waited_ms: 250,
        };
        assert_eq!(
            timeout.to_string(),
            "timed out after 250ms waiting for lock on item SKU-1"
        );
    }
}
