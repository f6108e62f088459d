//! Control-channel wire codec.
//!
//! Every frame is a single XML element whose tag names the event kind and
//! whose children carry the fields:
//!
//! ```xml
//! <updateStatusTextGuiInternalEvent>
//!   <root>/home/u/A</root>
//!   <text>Syncing (3 files)</text>
//! </updateStatusTextGuiInternalEvent>
//! ```

mod control_event;
mod element;
mod outbound_action;

pub use {control_event::ControlEvent, outbound_action::OutboundAction};

use crate::{CoreError, CoreResult};

use std::panic::Location;

use control_event::{NOTIFY, UPDATE_ICON, UPDATE_RECENT_CHANGES, UPDATE_STATUS_TEXT, UPDATE_WATCHES};
use element::Element;
use error_location::ErrorLocation;
use outbound_action::{CLICK_FOLDER, CLICK_MENU, CLICK_RECENT};
use quick_xml::escape::escape;
use tracing::{debug, instrument};

/// Decode one inbound frame, folding parse failures into
/// [`ControlEvent::Malformed`] so a bad frame never ends the receive loop.
#[instrument(skip(frame), fields(frame_len = frame.len()))]
pub fn decode(frame: &str) -> ControlEvent {
    match try_decode(frame) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "Frame could not be decoded");
            ControlEvent::Malformed {
                raw: frame.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// Decode one inbound frame, reporting parse failures as errors.
///
/// A well-formed frame with an unrecognised root tag decodes to
/// [`ControlEvent::Unknown`]; only structural problems and missing required
/// fields are errors.
#[track_caller]
pub fn try_decode(frame: &str) -> CoreResult<ControlEvent> {
    let root = element::parse(frame)?;

    let event = match root.name.as_str() {
        NOTIFY => ControlEvent::Notify {
            subject: root.required_text("subject")?.to_string(),
            message: root.required_text("message")?.to_string(),
        },
        UPDATE_ICON => ControlEvent::UpdateIcon {
            image_ref: root.required_text("filename")?.to_string(),
        },
        UPDATE_STATUS_TEXT => {
            // Only a missing <root> means "clear all"; text is then irrelevant.
            let status_root = root.child_text("root").map(str::to_owned);
            let text = match status_root {
                Some(_) => Some(root.required_text("text")?.to_string()),
                None => root.child_text("text").map(str::to_owned),
            };
            ControlEvent::UpdateStatusText {
                root: status_root,
                text,
            }
        }
        UPDATE_RECENT_CHANGES => ControlEvent::UpdateRecentChanges {
            files: root.descendant_texts("file"),
        },
        UPDATE_WATCHES => ControlEvent::UpdateWatches {
            folders: root.descendant_texts("folder"),
        },
        _ => ControlEvent::Unknown {
            kind: root.name.clone(),
            raw: frame.to_string(),
        },
    };

    Ok(event)
}

/// Serialize a user action into one outbound frame.
pub fn encode(action: &OutboundAction) -> String {
    match action {
        OutboundAction::AddFolderRequested => menu_click("NEW"),
        OutboundAction::BrowseHistoryRequested => menu_click("BROWSE_HISTORY"),
        OutboundAction::PreferencesRequested => menu_click("PREFERENCES"),
        OutboundAction::ReportIssueRequested => menu_click("REPORT_ISSUE"),
        OutboundAction::DonateRequested => menu_click("DONATE"),
        OutboundAction::WebsiteRequested => menu_click("WEBSITE"),
        OutboundAction::ExitRequested => menu_click("EXIT"),
        OutboundAction::OpenFolderRequested { folder } => folder_click("OPEN", folder),
        OutboundAction::CopyFolderLinkRequested { folder } => folder_click("COPY_LINK", folder),
        OutboundAction::RemoveFolderRequested { folder } => folder_click("REMOVE", folder),
        OutboundAction::OpenRecentFileRequested { file } => format!(
            "<{CLICK_RECENT}><file>{}</file></{CLICK_RECENT}>",
            escape(file.as_str())
        ),
    }
}

/// Parse an outbound frame back into the action it encodes.
///
/// This is the host's side of [`encode`].
#[track_caller]
pub fn decode_action(frame: &str) -> CoreResult<OutboundAction> {
    let root = element::parse(frame)?;

    match root.name.as_str() {
        CLICK_MENU => match root.required_text("action")? {
            "NEW" => Ok(OutboundAction::AddFolderRequested),
            "BROWSE_HISTORY" => Ok(OutboundAction::BrowseHistoryRequested),
            "PREFERENCES" => Ok(OutboundAction::PreferencesRequested),
            "REPORT_ISSUE" => Ok(OutboundAction::ReportIssueRequested),
            "DONATE" => Ok(OutboundAction::DonateRequested),
            "WEBSITE" => Ok(OutboundAction::WebsiteRequested),
            "EXIT" => Ok(OutboundAction::ExitRequested),
            other => Err(unknown_action(&root, other)),
        },
        CLICK_FOLDER => {
            let folder = root.required_text("folder")?.to_string();
            match root.required_text("action")? {
                "OPEN" => Ok(OutboundAction::OpenFolderRequested { folder }),
                "COPY_LINK" => Ok(OutboundAction::CopyFolderLinkRequested { folder }),
                "REMOVE" => Ok(OutboundAction::RemoveFolderRequested { folder }),
                other => Err(unknown_action(&root, other)),
            }
        }
        CLICK_RECENT => Ok(OutboundAction::OpenRecentFileRequested {
            file: root.required_text("file")?.to_string(),
        }),
        other => Err(CoreError::ProtocolDecode {
            reason: format!("<{}> is not an outbound action frame", other),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}

fn menu_click(action: &str) -> String {
    format!("<{CLICK_MENU}><action>{action}</action></{CLICK_MENU}>")
}

fn folder_click(action: &str, folder: &str) -> String {
    format!(
        "<{CLICK_FOLDER}><action>{action}</action><folder>{}</folder></{CLICK_FOLDER}>",
        escape(folder)
    )
}

#[track_caller]
fn unknown_action(root: &Element, action: &str) -> CoreError {
    CoreError::ProtocolDecode {
        reason: format!("<{}> carries unknown action {:?}", root.name, action),
        location: ErrorLocation::from(Location::caller()),
    }
}
