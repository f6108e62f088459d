/// User action sent back to the host when a menu entry is clicked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OutboundAction {
    /// "Add folder…" clicked.
    AddFolderRequested,
    /// "Browse history…" clicked.
    BrowseHistoryRequested,
    /// "Open folder" clicked in a folder submenu.
    OpenFolderRequested {
        /// Watched folder the submenu belongs to.
        folder: String,
    },
    /// "Copy link" clicked in a folder submenu.
    CopyFolderLinkRequested {
        /// Watched folder the submenu belongs to.
        folder: String,
    },
    /// "Remove folder" clicked in a folder submenu.
    RemoveFolderRequested {
        /// Watched folder the submenu belongs to.
        folder: String,
    },
    /// A recent-changes entry clicked.
    OpenRecentFileRequested {
        /// Full path of the changed file.
        file: String,
    },
    /// "Preferences…" clicked.
    PreferencesRequested,
    /// "Report a bug" clicked.
    ReportIssueRequested,
    /// "Buy us a coffee" clicked.
    DonateRequested,
    /// "Visit website" clicked.
    WebsiteRequested,
    /// "Exit" clicked.
    ExitRequested,
}

pub(crate) const CLICK_MENU: &str = "clickTrayMenuGuiInternalEvent";
pub(crate) const CLICK_FOLDER: &str = "clickTrayMenuFolderGuiInternalEvent";
pub(crate) const CLICK_RECENT: &str = "clickRecentChangesGuiInternalEvent";
