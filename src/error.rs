//! Public error type
//!
//! Flattens the internal ledger errors into a stable set of variants.

use thiserror::Error;

/// All stockguard errors.
///
/// A prevented sale or a rejected return is not an error; those come back
/// as [`crate::SaleOutcome`] and [`crate::ReturnOutcome`] values.
#[derive(Debug, Error)]
pub enum Error {
    /// Item or other entity not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed input (bad item id, unknown destination, trial size)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Per-item lock not acquired in time
    #[error("timeout: {0}")]
    Timeout(String),

    /// Storage or journal failure; nothing was committed
    #[error("storage error: {0}")]
    Storage(String),

    /// Journal failed validation during recovery
    #[error("corruption: {0}")]
    Corruption(String),

    /// Bad configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (bug or invariant violation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for stockguard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The request may succeed if simply retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is a serious/unrecoverable error.
    pub fn is_serious(&self) -> bool {
        matches!(self, Error::Corruption(_) | Error::Internal(_))
    }
}

impl From<stockguard_core::Error> for Error {
    fn from(e: stockguard_core::Error) -> Self {
        use stockguard_core::Error as CoreError;
        match e {
            CoreError::InvalidInput(msg) => Error::InvalidInput(msg),
            CoreError::NotFound(msg) => Error::NotFound(msg),
            timeout @ CoreError::LockTimeout { .. } => Error::Timeout(timeout.to_string()),
            CoreError::Storage(msg) => Error::Storage(msg),
            CoreError::Journal(msg) => Error::Storage(format!("journal: {}", msg)),
            CoreError::Corruption(msg) => Error::Corruption(msg),
            CoreError::Config(msg) => Error::Config(msg),
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Io(io_err) => Error::Io(io_err),
            CoreError::Internal(msg) => Error::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockguard_core::ItemId;

    #[test]
    fn test_timeout_is_retryable() {
        let err: Error = stockguard_core::Error::LockTimeout {
            item: ItemId::from("A"),
            waited_ms: 5,
        }
        .into();
        assert!(err.is_retryable());
        assert!(err.to_string().contains("item A"));
    }

    #[test]
    fn test_journal_maps_to_storage() {
        let err: Error = stockguard_core::Error::Journal("disk full".into()).into();
        assert!(matches!(err, Error::Storage(ref m) if m.contains("disk full")));
        assert!(!err.is_retryable());
    }
}
