//! System tray icon and context menu.
//!
//! Renders [`MenuTree`]s into `tray-icon` menus, swaps the tray icon and
//! maps menu clicks back to the [`OutboundAction`] they stand for. Lives on
//! the main thread only.

use crate::{AppError, AppResult};

use std::{collections::HashMap, panic::Location, path::Path};

use error_location::ErrorLocation;
use sync_tray_core::{MenuEntry, MenuTree, OutboundAction};
use tracing::{debug, info, instrument};
use tray_icon::menu::{
    Error as MenuError, IsMenuItem, Menu, MenuId, MenuItem, PredefinedMenuItem, Submenu,
};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    actions: HashMap<MenuId, OutboundAction>,
}

impl TrayManager {
    /// Create the tray icon with an empty menu and no image yet.
    #[track_caller]
    #[instrument]
    pub fn new(tooltip: &str) -> AppResult<Self> {
        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip)
            .with_menu(Box::new(Menu::new()))
            .build()
            .map_err(|e| AppError::Tray {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            actions: HashMap::new(),
        })
    }

    /// Replace the whole context menu with `tree`.
    ///
    /// Click mappings of the previous menu are dropped with it.
    #[track_caller]
    #[instrument(skip(self, tree), fields(entries = tree.entries.len()))]
    pub fn set_menu(&mut self, tree: &MenuTree) -> AppResult<()> {
        let menu = Menu::new();
        let mut actions = HashMap::new();

        append_entries(&tree.entries, &mut actions, &|item| menu.append(item))?;

        self.tray_icon.set_menu(Some(Box::new(menu)));
        self.actions = actions;

        debug!(clickable = self.actions.len(), "Menu rebuilt");

        Ok(())
    }

    /// Show the PNG at `path` as the tray icon.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn set_icon(&mut self, path: &Path) -> AppResult<()> {
        let icon = Self::load_icon(path)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::Tray {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Action bound to a clicked menu item of the current menu.
    pub fn action_for(&self, id: &MenuId) -> Option<&OutboundAction> {
        self.actions.get(id)
    }

    #[track_caller]
    fn load_icon(path: &Path) -> AppResult<Icon> {
        let img = image::open(path).map_err(|e| AppError::Tray {
            reason: format!("Failed to decode icon {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::Tray {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Append `entries` through `append`, recording the action of every
/// clickable item. tray-icon menu items have no tooltips, so only labels are
/// rendered.
#[track_caller]
fn append_entries(
    entries: &[MenuEntry],
    actions: &mut HashMap<MenuId, OutboundAction>,
    append: &dyn Fn(&dyn IsMenuItem) -> Result<(), MenuError>,
) -> AppResult<()> {
    for entry in entries {
        let appended = match entry {
            MenuEntry::Status { text } => append(&MenuItem::new(text, false, None)),
            MenuEntry::Item { label, action, .. } => {
                let item = MenuItem::new(label, true, None);
                actions.insert(item.id().clone(), action.clone());
                append(&item)
            }
            MenuEntry::Submenu { label, entries } => {
                let submenu = Submenu::new(label, true);
                append_entries(entries, actions, &|item| submenu.append(item))?;
                append(&submenu)
            }
            MenuEntry::Separator => append(&PredefinedMenuItem::separator()),
        };

        appended.map_err(|e| AppError::Tray {
            reason: format!("Failed to add menu item: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    }

    Ok(())
}
