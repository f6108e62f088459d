use crate::{AppError, AppResult, TrayCommand};

use std::panic::Location;

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;

/// Thread-safe hand-off of [`TrayCommand`]s to the UI thread.
pub trait TraySink: Clone + Send + 'static {
    /// Queue `command` for the UI thread.
    fn post(&self, command: TrayCommand) -> AppResult<()>;
}

impl TraySink for EventLoopProxy<TrayCommand> {
    #[track_caller]
    fn post(&self, command: TrayCommand) -> AppResult<()> {
        self.send_event(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("UI event loop closed: {:?}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl TraySink for std::sync::mpsc::Sender<TrayCommand> {
    #[track_caller]
    fn post(&self, command: TrayCommand) -> AppResult<()> {
        self.send(command).map_err(|e| AppError::ChannelSendFailed {
            message: format!("UI receiver dropped: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
