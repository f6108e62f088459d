use crate::config::{default_exit_grace_ms, default_status_text};

use serde::{Deserialize, Serialize};

/// Application behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviourConfig {
    /// Time given to the exit frame to reach the host before the process ends.
    #[serde(default = "default_exit_grace_ms")]
    pub exit_grace_ms: u64,

    /// Status text the host sends for a folder that is in sync.
    #[serde(default = "default_status_text")]
    pub status_text_default: String,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            exit_grace_ms: default_exit_grace_ms(),
            status_text_default: default_status_text(),
        }
    }
}
