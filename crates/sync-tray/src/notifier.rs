//! Desktop notification popups.
//!
//! Tries the platform notification service first and falls back to a
//! command-line notifier (`notify-send` by default) if that fails.
//! Delivery problems are logged here and never reach the caller.

use crate::{AppError, AppResult, config::NotificationConfig};

use std::{panic::Location, path::Path, process::Command};

use error_location::ErrorLocation;
use notify_rust::{Notification, Timeout};
use tracing::{debug, error, info, instrument, warn};

/// Shows notification popups with a command-line fallback.
#[derive(Debug, Clone)]
pub struct Notifier {
    config: NotificationConfig,
}

impl Notifier {
    /// Create a notifier from its configuration.
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }

    /// Show a popup, falling back to the external command on failure.
    #[instrument(skip(self))]
    pub fn show(&self, subject: &str, message: &str, icon: Option<&Path>) {
        info!("Creating notification ...");

        let Err(e) = self.deliver(subject, message, icon) else {
            return;
        };

        warn!(error = ?e, "Displaying notification via notification service failed; trying fallback command");

        if let Err(e) = self.deliver_fallback(subject, message, icon) {
            error!(error = ?e, "Fallback notification failed");
        }
    }

    #[track_caller]
    fn deliver(&self, subject: &str, message: &str, icon: Option<&Path>) -> AppResult<()> {
        let mut notification = Notification::new();
        notification
            .appname(&self.config.app_name)
            .summary(subject)
            .body(message)
            .timeout(Timeout::Milliseconds(self.config.timeout_ms));

        if let Some(icon) = icon {
            notification.icon(&icon.to_string_lossy());
        }

        notification
            .show()
            .map(|_| ())
            .map_err(|e| AppError::NotificationDelivery {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Start the fallback notifier and return without waiting for it.
    ///
    /// The child is reaped on a background thread.
    #[track_caller]
    pub(crate) fn deliver_fallback(
        &self,
        subject: &str,
        message: &str,
        icon: Option<&Path>,
    ) -> AppResult<()> {
        let args = fallback_args(self.config.timeout_ms, subject, message, icon);

        debug!(command = %self.config.fallback_command, ?args, "Running fallback notifier");

        let mut child = Command::new(&self.config.fallback_command)
            .args(&args)
            .spawn()
            .map_err(|e| AppError::NotificationDelivery {
                reason: format!("Failed to run {}: {}", self.config.fallback_command, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        let command = self.config.fallback_command.clone();
        std::thread::spawn(move || match child.wait() {
            Ok(status) if status.success() => {}
            Ok(status) => warn!(command = %command, %status, "Fallback notifier failed"),
            Err(e) => warn!(command = %command, error = ?e, "Fallback notifier could not be reaped"),
        });

        Ok(())
    }
}

/// Arguments for a `notify-send`-compatible command, passed without a shell.
pub(crate) fn fallback_args(
    timeout_ms: u32,
    subject: &str,
    message: &str,
    icon: Option<&Path>,
) -> Vec<String> {
    let mut args = vec!["-t".to_string(), timeout_ms.to_string()];

    if let Some(icon) = icon {
        args.push("-i".to_string());
        args.push(icon.to_string_lossy().into_owned());
    }

    args.push(subject.to_string());
    args.push(message.to_string());

    args
}
