//! Editor configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest SysEx message any supported device sends, with generous headroom.
pub const DEFAULT_MAX_INBOUND_LEN: usize = 64 * 1024;

/// Settings for a [`SessionManager`](crate::SessionManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Client name announced to the MIDI backend.
    pub client_name: String,
    /// Broadcast an identity request as soon as the manager is built.
    pub identify_on_start: bool,
    /// Capacity of the inbound SysEx queue between the MIDI thread and `poll`.
    pub inbox_capacity: usize,
    /// Inbound buffers longer than this are dropped unread.
    pub max_inbound_len: usize,
    /// Log a hex dump of SysEx nobody claimed.
    pub hexdump_unrecognized: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            client_name: "synthlink".to_string(),
            identify_on_start: true,
            inbox_capacity: 256,
            max_inbound_len: DEFAULT_MAX_INBOUND_LEN,
            hexdump_unrecognized: true,
        }
    }
}

impl EditorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(Error::InvalidConfig("client_name must not be empty".into()));
        }
        if self.inbox_capacity == 0 {
            return Err(Error::InvalidConfig("inbox_capacity must be at least 1".into()));
        }
        if self.max_inbound_len < 6 {
            return Err(Error::InvalidConfig(format!(
                "max_inbound_len {} is shorter than an identity request",
                self.max_inbound_len
            )));
        }
        Ok(())
    }
}
