//! Durability mode for journal writes.
//!
//! Defines when a committed mutation reaches stable storage.

use serde::{Deserialize, Serialize};

/// Durability mode for journal writes.
///
/// | Mode | Journal file | fsync | Use Case |
/// |------|--------------|-------|----------|
/// | None | no | never | Tests, demos, ephemeral ledgers |
/// | Buffered | yes | never (flushed to the OS per commit) | Default |
/// | Strict | yes | every commit | Audits, unattended tills |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurabilityMode {
    /// No journal. All data lost when the process exits.
    None,

    /// Journal written and flushed to the OS on every commit.
    ///
    /// Survives a process crash; may lose the tail on power loss.
    #[default]
    Buffered,

    /// Journal fsynced on every commit.
    ///
    /// A sale is reported `Sold` only after its record is on disk.
    Strict,
}

impl DurabilityMode {
    /// Whether this mode keeps a journal file at all
    pub fn requires_journal(&self) -> bool {
        !matches!(self, DurabilityMode::None)
    }

    /// Whether every commit is fsynced
    pub fn requires_immediate_fsync(&self) -> bool {
        matches!(self, DurabilityMode::Strict)
    }

    /// Human-readable description of the mode.
    pub fn description(&self) -> &'static str {
        match self {
            DurabilityMode::None => "No durability (ephemeral, all data lost on exit)",
            DurabilityMode::Buffered => "Buffered (flushed per commit, no fsync)",
            DurabilityMode::Strict => "Strict (fsync per commit)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_mode() {
        let mode = DurabilityMode::None;
        assert!(!mode.requires_journal());
        assert!(!mode.requires_immediate_fsync());
    }

    #[test]
    fn test_strict_mode() {
        let mode = DurabilityMode::Strict;
        assert!(mode.requires_journal());
        assert!(mode.requires_immediate_fsync());
    }

    #[test]
    fn test_default_is_buffered() {
        assert_eq!(DurabilityMode::default(), DurabilityMode::Buffered);
        assert!(!DurabilityMode::default().requires_immediate_fsync());
    }
}
