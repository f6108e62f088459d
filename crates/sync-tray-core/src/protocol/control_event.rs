/// One decoded inbound frame from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// Show a notification popup.
    Notify {
        /// Notification title.
        subject: String,
        /// Notification body.
        message: String,
    },
    /// Replace the tray icon with the image the host serves under this name.
    UpdateIcon {
        /// Image file name relative to the image base location.
        image_ref: String,
    },
    /// Upsert the status line of one watched root, or clear all of them.
    UpdateStatusText {
        /// Watched root; `None` clears every status line.
        root: Option<String>,
        /// New status text for `root`.
        text: Option<String>,
    },
    /// Replace the recent-changes list.
    UpdateRecentChanges {
        /// Changed file paths, newest first.
        files: Vec<String>,
    },
    /// Replace the list of watched folders.
    UpdateWatches {
        /// Watched folder paths in host order.
        folders: Vec<String>,
    },
    /// Well-formed frame of a kind this client does not handle.
    Unknown {
        /// Root tag name of the frame.
        kind: String,
        /// The frame as received.
        raw: String,
    },
    /// Frame that could not be parsed at all.
    Malformed {
        /// The frame as received.
        raw: String,
        /// Why decoding failed.
        reason: String,
    },
}

impl ControlEvent {
    /// Root tag name this event travels under on the wire.
    pub fn kind(&self) -> &str {
        match self {
            ControlEvent::Notify { .. } => NOTIFY,
            ControlEvent::UpdateIcon { .. } => UPDATE_ICON,
            ControlEvent::UpdateStatusText { .. } => UPDATE_STATUS_TEXT,
            ControlEvent::UpdateRecentChanges { .. } => UPDATE_RECENT_CHANGES,
            ControlEvent::UpdateWatches { .. } => UPDATE_WATCHES,
            ControlEvent::Unknown { kind, .. } => kind,
            ControlEvent::Malformed { .. } => "malformed",
        }
    }
}

pub(crate) const NOTIFY: &str = "displayNotificationGuiInternalEvent";
pub(crate) const UPDATE_ICON: &str = "updateTrayIconGuiInternalEvent";
pub(crate) const UPDATE_STATUS_TEXT: &str = "updateStatusTextGuiInternalEvent";
pub(crate) const UPDATE_RECENT_CHANGES: &str = "updateRecentChangesGuiInternalEvent";
pub(crate) const UPDATE_WATCHES: &str = "updateWatchesGuiInternalEvent";
