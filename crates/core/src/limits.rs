//! Input validation applied before any lock or store call

use crate::error::{Error, Result};
use crate::types::ItemId;

/// Maximum item id length in bytes
pub const MAX_ITEM_ID_LEN: usize = 128;

/// Validate a caller-supplied item id
///
/// Rejects empty (or all-whitespace) ids, ids longer than
/// [`MAX_ITEM_ID_LEN`] bytes, and ids containing control characters.
pub fn validate_item_id(id: &ItemId) -> Result<()> {
    let raw = id.as_str();
    if raw.trim().is_empty() {
        return Err(Error::InvalidInput("item id must not be empty".into()));
    }
    if raw.len() > MAX_ITEM_ID_LEN {
        return Err(Error::InvalidInput(format!(
            "item id is {} bytes, limit is {}",
            raw.len(),
            MAX_ITEM_ID_LEN
        )));
    }
    if raw.chars().any(char::is_control) {
        return Err(Error::InvalidInput(
            "item id must not contain control characters".into(),
        ));
    }
    Ok(())
}
