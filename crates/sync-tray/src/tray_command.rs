use std::path::PathBuf;

use sync_tray_core::MenuTree;
use tray_icon::menu::MenuId;

/// Commands delivered to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`), so
/// every widget mutation and process lifecycle event flows through this
/// enum. Payloads are owned values; nothing shared is read across threads.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Replace the whole context menu.
    SetMenu(MenuTree),
    /// Show the image at this local path as the tray icon.
    SetIcon(PathBuf),
    /// Show a notification popup.
    Notify {
        /// Notification title.
        subject: String,
        /// Notification body.
        message: String,
        /// Local icon file, if one could be fetched.
        icon: Option<PathBuf>,
    },
    /// A menu entry was clicked.
    MenuClicked(MenuId),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
