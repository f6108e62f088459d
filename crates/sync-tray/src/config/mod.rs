mod behaviour_config;
#[allow(clippy::module_inception)]
mod config;
mod connection_config;
mod images_config;
mod notification_config;

pub(crate) use {
    behaviour_config::BehaviourConfig, config::Config, connection_config::ConnectionConfig,
    images_config::ImagesConfig, notification_config::NotificationConfig,
};

pub(crate) const DEFAULT_WS_URL: &str = "ws://127.0.0.1:51601/api/ws";
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:51601/api/rs";
pub(crate) const DEFAULT_APP_NAME: &str = "Syncany";
pub(crate) const DEFAULT_NOTIFICATION_TIMEOUT_MS: u32 = 2000;
pub(crate) const DEFAULT_FALLBACK_COMMAND: &str = "notify-send";
pub(crate) const DEFAULT_EXIT_GRACE_MS: u64 = 2000;

pub(crate) fn default_ws_url() -> String {
    DEFAULT_WS_URL.to_string()
}

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

pub(crate) fn default_notification_timeout_ms() -> u32 {
    DEFAULT_NOTIFICATION_TIMEOUT_MS
}

pub(crate) fn default_fallback_command() -> String {
    DEFAULT_FALLBACK_COMMAND.to_string()
}

pub(crate) fn default_exit_grace_ms() -> u64 {
    DEFAULT_EXIT_GRACE_MS
}

pub(crate) fn default_status_text() -> String {
    sync_tray_core::DEFAULT_STATUS_TEXT.to_string()
}
