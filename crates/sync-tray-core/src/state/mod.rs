//! Tray state model driven by decoded control events.

mod watch_status;

pub use watch_status::WatchStatus;

use crate::ControlEvent;

use tracing::{debug, instrument, warn};

/// Status text the host reports for a root that is fully synchronized.
pub const DEFAULT_STATUS_TEXT: &str = "All files in sync";

/// What the renderer has to do after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The menu must be re-projected and rebuilt.
    MenuDirty,
    /// The tray icon reference changed.
    IconDirty,
    /// Nothing changed; the event is a notification to display.
    NotifyOnly,
    /// The event was dropped.
    Ignored,
}

/// Everything the tray shows, owned by the control-channel client.
///
/// The client is the only writer. Readers get immutable projections of it
/// (see [`project`](crate::project)), never the state itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayState {
    status_text_default: String,
    watch_status: WatchStatus,
    recent_changes: Vec<String>,
    watch_list: Vec<String>,
    icon_ref: Option<String>,
}

impl Default for TrayState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrayState {
    /// Empty state using [`DEFAULT_STATUS_TEXT`].
    pub fn new() -> Self {
        Self::with_default_status_text(DEFAULT_STATUS_TEXT)
    }

    /// Empty state with a custom "in sync" text, for localized hosts.
    pub fn with_default_status_text(text: impl Into<String>) -> Self {
        Self {
            status_text_default: text.into(),
            watch_status: WatchStatus::default(),
            recent_changes: Vec::new(),
            watch_list: Vec::new(),
            icon_ref: None,
        }
    }

    /// Apply one decoded event and report what needs redrawing.
    #[instrument(skip(self, event), fields(kind = %event.kind()))]
    pub fn apply(&mut self, event: &ControlEvent) -> StateChange {
        match event {
            ControlEvent::Notify { .. } => StateChange::NotifyOnly,
            ControlEvent::UpdateIcon { image_ref } => {
                self.icon_ref = Some(image_ref.clone());
                StateChange::IconDirty
            }
            ControlEvent::UpdateStatusText { root: None, .. } => {
                self.watch_status.clear();
                debug!("Cleared all status texts");
                StateChange::MenuDirty
            }
            ControlEvent::UpdateStatusText {
                root: Some(root),
                text,
            } => {
                let text = text.clone().unwrap_or_default();
                debug!(root = %root, text = %text, "Status text updated");
                self.watch_status.upsert(root.clone(), text);
                StateChange::MenuDirty
            }
            ControlEvent::UpdateRecentChanges { files } => {
                self.recent_changes = files.clone();
                debug!(count = files.len(), "Recent changes replaced");
                StateChange::MenuDirty
            }
            ControlEvent::UpdateWatches { folders } => {
                self.watch_list = folders.clone();
                debug!(count = folders.len(), "Watch list replaced");
                StateChange::MenuDirty
            }
            ControlEvent::Unknown { kind, .. } => {
                warn!(kind = %kind, "Unknown message, ignoring");
                StateChange::Ignored
            }
            ControlEvent::Malformed { reason, .. } => {
                warn!(reason = %reason, "Malformed message, ignoring");
                StateChange::Ignored
            }
        }
    }

    /// Text a root reports when it has nothing left to synchronize.
    pub fn status_text_default(&self) -> &str {
        &self.status_text_default
    }

    /// Per-root status texts in first-seen order.
    pub fn watch_status(&self) -> &WatchStatus {
        &self.watch_status
    }

    /// Recently changed files exactly as last received.
    pub fn recent_changes(&self) -> &[String] {
        &self.recent_changes
    }

    /// Watched folders from the last watch-list update.
    pub fn watch_list(&self) -> &[String] {
        &self.watch_list
    }

    /// Image reference of the current tray icon, if the host set one.
    pub fn icon_ref(&self) -> Option<&str> {
        self.icon_ref.as_deref()
    }
}
