use crate::config::default_ws_url;

use serde::{Deserialize, Serialize};

/// Control-channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// WebSocket URL the host listens on.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
        }
    }
}
