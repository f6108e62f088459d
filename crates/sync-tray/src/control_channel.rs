//! WebSocket client for the host's control channel.
//!
//! Runs on the network thread. Owns the [`TrayState`] and the icon cache,
//! applies every inbound frame to the state and posts the resulting menu,
//! icon and notification updates to the UI thread as owned values. Menu
//! clicks come back as [`OutboundAction`]s and leave as frames.
//!
//! There is no reconnect: once the channel closes, the caller ends the
//! process.

use crate::{AppError, AppResult, TrayCommand, TraySink};

use std::{panic::Location, path::PathBuf, time::Duration};

use error_location::ErrorLocation;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use sync_tray_core::{
    ControlEvent, IconCache, OutboundAction, StateChange, TrayState, decode, encode, project,
};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

/// Image the host serves as the default tray and notification icon.
pub const TRAY_ICON: &str = "/tray.png";

/// Lifecycle of the control channel. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Handshake in progress.
    Connecting,
    /// Frames are flowing.
    Open,
    /// Transport gone; the process must end.
    Closed,
}

/// Why the receive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelExit {
    /// The user chose Exit; the exit frame was sent and the cache purged.
    ExitRequested,
    /// The host closed the channel or the transport failed.
    Closed,
}

/// Control-channel client.
pub struct ControlChannel<S, C> {
    state: TrayState,
    images: C,
    tray: S,
    actions: mpsc::Receiver<OutboundAction>,
    channel_state: ChannelState,
    exit_grace: Duration,
}

impl<S: TraySink, C: IconCache> ControlChannel<S, C> {
    /// Create a client that renders through `tray` and sends the actions
    /// arriving on `actions`.
    pub fn new(
        state: TrayState,
        images: C,
        tray: S,
        actions: mpsc::Receiver<OutboundAction>,
        exit_grace: Duration,
    ) -> Self {
        Self {
            state,
            images,
            tray,
            actions,
            channel_state: ChannelState::Connecting,
            exit_grace,
        }
    }

    /// Show the initial icon and menu, connect to `ws_url` and serve the
    /// channel until it closes or the user exits.
    #[instrument(skip(self))]
    pub async fn run(mut self, ws_url: &str) -> AppResult<ChannelExit> {
        self.initialize().await;

        info!("Connecting to Web Socket {}", ws_url);

        let (stream, _response) =
            connect_async(ws_url)
                .await
                .map_err(|e| AppError::Transport {
                    reason: format!("Failed to connect to {}: {}", ws_url, e),
                    location: ErrorLocation::from(Location::caller()),
                })?;

        self.channel_state = ChannelState::Open;
        info!("WS open");

        let (write, read) = stream.split();

        Ok(self.serve(read, write).await)
    }

    /// Initial icon and empty-state menu, shown before the host talks.
    pub(crate) async fn initialize(&mut self) {
        self.refresh_icon(TRAY_ICON).await;
        self.publish_menu();
    }

    /// Receive loop over an open transport.
    pub(crate) async fn serve<R, W>(&mut self, mut read: R, mut write: W) -> ChannelExit
    where
        R: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
        W: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        self.channel_state = ChannelState::Open;

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_frame(text.as_str()).await,
                    Some(Ok(Message::Close(frame))) => {
                        info!(?frame, "WS closed");
                        break;
                    }
                    // Pings are answered by tungstenite; binary frames are not part of the protocol.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!(error = %e, "WS error");
                        break;
                    }
                    None => {
                        info!("WS closed");
                        break;
                    }
                },

                Some(action) = self.actions.recv() => {
                    let exiting = action == OutboundAction::ExitRequested;

                    if let Err(e) = self.send_action(&mut write, &action).await {
                        error!(error = ?e, "Failed to send menu action");
                    }

                    if exiting {
                        self.shutdown().await;
                        return ChannelExit::ExitRequested;
                    }
                }
            }
        }

        self.channel_state = ChannelState::Closed;
        ChannelExit::Closed
    }

    /// Decode one frame, apply it and schedule the matching UI update.
    ///
    /// Never fails: bad frames are logged and dropped.
    #[instrument(skip(self, frame))]
    pub(crate) async fn handle_frame(&mut self, frame: &str) {
        info!("Received request: {}", frame);

        let event = decode(frame);

        match self.state.apply(&event) {
            StateChange::MenuDirty => self.publish_menu(),
            StateChange::IconDirty => {
                if let Some(image_ref) = self.state.icon_ref().map(|name| format!("/{name}")) {
                    self.refresh_icon(&image_ref).await;
                }
            }
            StateChange::NotifyOnly => {
                if let ControlEvent::Notify { subject, message } = event {
                    self.notify(subject, message).await;
                }
            }
            StateChange::Ignored => {
                debug!(kind = %event.kind(), "Frame ignored");
            }
        }
    }

    /// Encode and send one action. A failed send is reported, not fatal.
    pub(crate) async fn send_action<W>(
        &mut self,
        write: &mut W,
        action: &OutboundAction,
    ) -> AppResult<()>
    where
        W: Sink<Message, Error = tungstenite::Error> + Unpin,
    {
        let frame = encode(action);
        info!("Menu item '{}' clicked.", frame);

        write
            .send(Message::Text(frame.into()))
            .await
            .map_err(|e| AppError::Transport {
                reason: format!("Failed to send frame: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn publish_menu(&self) {
        let tree = project(&self.state);

        if let Err(e) = self.tray.post(TrayCommand::SetMenu(tree)) {
            error!(error = ?e, "Failed to post menu update");
        }
    }

    async fn refresh_icon(&mut self, image_ref: &str) {
        match self.images.fetch(image_ref).await {
            Ok(path) => {
                if let Err(e) = self.tray.post(TrayCommand::SetIcon(path)) {
                    error!(error = ?e, "Failed to post icon update");
                }
            }
            Err(e) => warn!(image = %image_ref, error = ?e, "Icon fetch failed, keeping previous icon"),
        }
    }

    async fn notify(&mut self, subject: String, message: String) {
        let icon: Option<PathBuf> = match self.images.fetch(TRAY_ICON).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = ?e, "Notification icon unavailable");
                None
            }
        };

        if let Err(e) = self.tray.post(TrayCommand::Notify {
            subject,
            message,
            icon,
        }) {
            error!(error = ?e, "Failed to post notification");
        }
    }

    /// Orderly exit: purge cached images, let the exit frame flush, then
    /// ask the UI thread to leave its event loop.
    async fn shutdown(&mut self) {
        self.images.purge();
        self.channel_state = ChannelState::Closed;

        tokio::time::sleep(self.exit_grace).await;

        if let Err(e) = self.tray.post(TrayCommand::Shutdown) {
            error!(error = ?e, "Failed to post shutdown");
        }
    }

    /// Current lifecycle state.
    pub fn channel_state(&self) -> ChannelState {
        self.channel_state
    }

    #[cfg(test)]
    pub(crate) fn tray_state(&self) -> &TrayState {
        &self.state
    }
}
