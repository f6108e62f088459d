//! Sync-Tray: tray icon, context menu and notifications for a local sync
//! daemon, driven over a WebSocket control channel.

mod cli;
mod config;
mod control_channel;
mod error;
mod notifier;
mod parent_stdout;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_manager;
mod tray_sink;

pub(crate) use {
    cli::Cli,
    control_channel::{ChannelExit, ControlChannel},
    error::{AppError, Result as AppResult},
    notifier::Notifier,
    parent_stdout::ParentStdout,
    tray_command::TrayCommand,
    tray_manager::TrayManager,
    tray_sink::TraySink,
};

use crate::config::Config;

use clap::Parser;
use sync_tray_core::{HttpImageFetcher, OutboundAction, TempImageCache, TrayState};
use tao::{
    event::Event,
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tray_icon::menu::MenuEvent;

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sync_tray=debug,sync_tray_core=debug")),
        )
        .with_ansi(false)
        .with_writer(|| ParentStdout)
        .init();

    let cli = Cli::parse();

    let config = match Config::resolve(&cli) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let tray_proxy = event_loop.create_proxy();

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    let mut tray_manager = match TrayManager::new(&config.notifications.app_name) {
        Ok(tm) => tm,
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };

    let notifier = Notifier::new(config.notifications.clone());
    let (action_tx, action_rx) = mpsc::channel::<OutboundAction>(32);

    // Moved into the network thread on Init.
    let mut startup = Some((config, action_rx));

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetMenu(tree) => {
                    if let Err(e) = tray_manager.set_menu(&tree) {
                        error!(error = ?e, "Failed to rebuild tray menu");
                    }
                }
                TrayCommand::SetIcon(path) => {
                    if let Err(e) = tray_manager.set_icon(&path) {
                        error!(error = ?e, "Failed to update tray icon");
                    }
                }
                TrayCommand::Notify {
                    subject,
                    message,
                    icon,
                } => notifier.show(&subject, &message, icon.as_deref()),
                TrayCommand::MenuClicked(id) => match tray_manager.action_for(&id) {
                    Some(action) => {
                        queue_click(&action_tx, action.clone());
                    }
                    None => debug!(id = ?id, "Click on inactive menu item"),
                },
                TrayCommand::Shutdown => {
                    info!("Exiting");
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(tao::event::StartCause::Init) => {
                let Some((config, action_rx)) = startup.take() else {
                    return;
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                forward_menu_events(tray_proxy.clone());

                let tray_proxy = tray_proxy.clone();

                // Spawn tokio runtime on separate thread.
                // TrayManager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    let exit = rt.block_on(async {
                        let images =
                            TempImageCache::new(&config.images.base_url, HttpImageFetcher::new())?;
                        let state = TrayState::with_default_status_text(
                            &config.behaviour.status_text_default,
                        );

                        ControlChannel::new(
                            state,
                            images,
                            tray_proxy,
                            action_rx,
                            config.exit_grace(),
                        )
                        .run(&config.connection.ws_url)
                        .await
                    });

                    match exit {
                        Ok(ChannelExit::ExitRequested) => {}
                        Ok(ChannelExit::Closed) => {
                            error!("Control channel closed, terminating");
                            std::process::exit(1);
                        }
                        Err(e) => {
                            error!(error = ?e, "Control channel failed, terminating");
                            std::process::exit(1);
                        }
                    }
                });
            }
            _ => {}
        }
    });
}

/// Hand a clicked action to the control channel without waiting.
///
/// Runs on the UI thread while the network thread may be stalled on an image
/// download, so a full queue drops the click. Returns whether it was queued.
pub(crate) fn queue_click(
    action_tx: &mpsc::Sender<OutboundAction>,
    action: OutboundAction,
) -> bool {
    match action_tx.try_send(action) {
        Ok(()) => true,
        Err(TrySendError::Full(action)) => {
            warn!(action = ?action, "Click queue full, dropping click");
            false
        }
        Err(TrySendError::Closed(action)) => {
            error!(action = ?action, "Control channel gone, dropping click");
            false
        }
    }
}

/// Forward tray menu clicks into the event loop as [`TrayCommand::MenuClicked`].
///
/// `MenuEvent::receiver()` blocks, so it gets its own thread; the thread
/// ends with the first click after the event loop has gone.
fn forward_menu_events(tray: impl TraySink) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        while let Ok(event) = receiver.recv() {
            if let Err(e) = tray.post(TrayCommand::MenuClicked(event.id)) {
                debug!(error = ?e, "Menu forwarder stopping");
                break;
            }
        }
    });
}
