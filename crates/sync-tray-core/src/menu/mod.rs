//! Projection of [`TrayState`] into a toolkit-independent menu description.
//!
//! The layout, top to bottom:
//!
//! 1. one disabled line per root that is not in sync (or a single
//!    "in sync" line), then a separator
//! 2. "Add folder…" and "Browse history…"
//! 3. a "Recent changes" submenu, fenced by separators, if any files changed
//! 4. one submenu per watched folder, then a separator if there were any
//! 5. the fixed footer: Preferences, the three web links and Exit
//!
//! Consecutive separators are collapsed into one.

use crate::{OutboundAction, TrayState};

use std::path::Path;

/// Label of the submenu listing recently changed files.
pub const RECENT_CHANGES_LABEL: &str = "Recent changes";

/// A complete menu, ready to be rendered from scratch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    /// Top-level entries in display order.
    pub entries: Vec<MenuEntry>,
}

/// One entry of a [`MenuTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Disabled, informational line.
    Status {
        /// Displayed text, possibly spanning several lines.
        text: String,
    },
    /// Clickable entry.
    Item {
        /// Displayed text.
        label: String,
        /// Hover text, where the toolkit supports it.
        tooltip: Option<String>,
        /// What clicking it sends to the host.
        action: OutboundAction,
    },
    /// Nested menu.
    Submenu {
        /// Displayed text.
        label: String,
        /// Entries of the nested menu.
        entries: Vec<MenuEntry>,
    },
    /// Horizontal divider.
    Separator,
}

impl MenuEntry {
    fn item(label: &str, action: OutboundAction) -> Self {
        MenuEntry::Item {
            label: label.to_string(),
            tooltip: None,
            action,
        }
    }
}

#[derive(Default)]
struct MenuBuilder {
    entries: Vec<MenuEntry>,
}

impl MenuBuilder {
    fn push(&mut self, entry: MenuEntry) {
        self.entries.push(entry);
    }

    fn separator(&mut self) {
        if !matches!(self.entries.last(), None | Some(MenuEntry::Separator)) {
            self.entries.push(MenuEntry::Separator);
        }
    }

    fn build(self) -> MenuTree {
        MenuTree {
            entries: self.entries,
        }
    }
}

/// Build the menu for `state`.
///
/// Pure and deterministic: equal states always yield equal trees, so the
/// renderer can replace the whole menu on every change.
///
/// Separators are emitted collapsed. Where two blocks would each contribute
/// one (the trailing folder separator and the one opening the footer, or the
/// pair around "Recent changes" when no folders follow), the tree holds a
/// single [`MenuEntry::Separator`]. A menu never starts with one.
pub fn project(state: &TrayState) -> MenuTree {
    let mut menu = MenuBuilder::default();

    // Status
    let default_text = state.status_text_default();
    let mut status_lines = 0;

    for (root, text) in state.watch_status().iter() {
        if text != default_text {
            menu.push(MenuEntry::Status {
                text: format!("{}\n{}", basename(root), text),
            });
            status_lines += 1;
        }
    }

    if status_lines == 0 {
        menu.push(MenuEntry::Status {
            text: default_text.to_string(),
        });
    }

    menu.separator();

    // Primary actions
    menu.push(MenuEntry::item("Add folder…", OutboundAction::AddFolderRequested));
    menu.push(MenuEntry::item(
        "Browse history…",
        OutboundAction::BrowseHistoryRequested,
    ));

    // Recent changes
    if !state.recent_changes().is_empty() {
        let entries = state
            .recent_changes()
            .iter()
            .map(|file| MenuEntry::Item {
                label: basename(file).to_string(),
                tooltip: Some(file.clone()),
                action: OutboundAction::OpenRecentFileRequested { file: file.clone() },
            })
            .collect();

        menu.separator();
        menu.push(MenuEntry::Submenu {
            label: RECENT_CHANGES_LABEL.to_string(),
            entries,
        });
        menu.separator();
    }

    // Folders
    for folder in state.watch_list() {
        menu.push(MenuEntry::Submenu {
            label: basename(folder).to_string(),
            entries: vec![
                MenuEntry::item(
                    "Open folder",
                    OutboundAction::OpenFolderRequested {
                        folder: folder.clone(),
                    },
                ),
                MenuEntry::item(
                    "Copy link",
                    OutboundAction::CopyFolderLinkRequested {
                        folder: folder.clone(),
                    },
                ),
                MenuEntry::item(
                    "Remove folder",
                    OutboundAction::RemoveFolderRequested {
                        folder: folder.clone(),
                    },
                ),
            ],
        });
    }

    if !state.watch_list().is_empty() {
        menu.separator();
    }

    // Footer
    menu.separator();
    menu.push(MenuEntry::item(
        "Preferences…",
        OutboundAction::PreferencesRequested,
    ));
    menu.separator();
    menu.push(MenuEntry::item(
        "Report a bug",
        OutboundAction::ReportIssueRequested,
    ));
    menu.push(MenuEntry::item("Buy us a coffee", OutboundAction::DonateRequested));
    menu.push(MenuEntry::item("Visit website", OutboundAction::WebsiteRequested));
    menu.separator();
    menu.push(MenuEntry::item("Exit", OutboundAction::ExitRequested));

    menu.build()
}

/// Last path component, or the whole path when there is none (e.g. `/`).
fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
