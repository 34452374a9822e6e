//! Shared queue configuration.

use serde::{Deserialize, Serialize};

/// Default entry time-to-live: 240 minutes.
pub const DEFAULT_ENTRY_TTL_SECS: u64 = 240 * 60;

/// Default admission batch size.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Default short wait when the delivery channel is momentarily empty.
pub const DEFAULT_RECEIVE_WAIT_SECS: u64 = 1;

/// Default sequence group tag for queue notifications.
pub const DEFAULT_SEQUENCE_GROUP: &str = "waiting-room";

/// Default name of the remote waiting-room-enabled flag.
pub const DEFAULT_FLAG_NAME: &str = "waiting-room-enabled";

/// Tunables shared by the enqueue service and the admission processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Seconds until a queue entry is eligible for removal.
    pub entry_ttl_secs: u64,

    /// Maximum messages drained per admission cycle.
    pub batch_size: usize,

    /// Seconds to wait on an empty channel before giving up a cycle.
    pub receive_wait_secs: u64,

    /// Sequence group tag attached to queue notifications.
    pub sequence_group: String,

    /// Name of the remote waiting-room-enabled flag.
    pub flag_name: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            entry_ttl_secs: DEFAULT_ENTRY_TTL_SECS,
            batch_size: DEFAULT_BATCH_SIZE,
            receive_wait_secs: DEFAULT_RECEIVE_WAIT_SECS,
            sequence_group: DEFAULT_SEQUENCE_GROUP.to_string(),
            flag_name: DEFAULT_FLAG_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = QueueConfig::default();
        assert_eq!(config.entry_ttl_secs, 14_400);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.receive_wait_secs, 1);
    }
}
