//! Sync-Tray Core Library
//!
//! Headless half of the desktop sync notifier: the control-channel wire
//! codec, the tray state model, the menu projection and the icon cache.
//! Nothing here touches a UI toolkit, so the binary crate can render the
//! results however its platform requires.
//!
//! # Example
//!
//! ```
//! use sync_tray_core::{StateChange, TrayState, decode, project};
//!
//! let mut state = TrayState::new();
//!
//! let event = decode(
//!     "<updateWatchesGuiInternalEvent><folder>/home/u/A</folder></updateWatchesGuiInternalEvent>",
//! );
//! assert_eq!(state.apply(&event), StateChange::MenuDirty);
//!
//! let menu = project(&state);
//! assert!(!menu.entries.is_empty());
//! ```

mod error;
mod image_cache;
mod menu;
mod protocol;
mod state;

pub use {
    error::CoreError,
    error::Result as CoreResult,
    image_cache::{HttpImageFetcher, IconCache, ImageFetcher, TempImageCache},
    menu::{MenuEntry, MenuTree, project},
    protocol::{ControlEvent, OutboundAction, decode, decode_action, encode, try_decode},
    state::{DEFAULT_STATUS_TEXT, StateChange, TrayState, WatchStatus},
};
