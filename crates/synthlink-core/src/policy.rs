//! Auto-sync policy: which requests a session may issue on its own.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    /// Regions are read on demand and edits are written back in batches.
    #[default]
    RandomAccess,
    /// The device pushes its editing buffer by itself; only writes are sent.
    PushOnly,
    /// Nothing is sent automatically; transfers need an explicit user action.
    BulkOnly,
}

impl SyncPolicy {
    #[inline]
    pub fn allows_read(self) -> bool {
        matches!(self, SyncPolicy::RandomAccess)
    }

    #[inline]
    pub fn allows_write(self) -> bool {
        matches!(self, SyncPolicy::RandomAccess | SyncPolicy::PushOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_permissions() {
        assert!(SyncPolicy::RandomAccess.allows_read());
        assert!(SyncPolicy::RandomAccess.allows_write());
        assert!(!SyncPolicy::PushOnly.allows_read());
        assert!(SyncPolicy::PushOnly.allows_write());
        assert!(!SyncPolicy::BulkOnly.allows_read());
        assert!(!SyncPolicy::BulkOnly.allows_write());
    }
}
