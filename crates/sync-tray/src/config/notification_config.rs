use crate::config::{default_app_name, default_fallback_command, default_notification_timeout_ms};

use serde::{Deserialize, Serialize};

/// Notification popup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Application name shown by the notification daemon.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// How long a popup stays visible.
    #[serde(default = "default_notification_timeout_ms")]
    pub timeout_ms: u32,

    /// Command-line notifier used when the notification service fails.
    #[serde(default = "default_fallback_command")]
    pub fallback_command: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            timeout_ms: default_notification_timeout_ms(),
            fallback_command: default_fallback_command(),
        }
    }
}
