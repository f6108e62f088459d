use std::path::PathBuf;

use clap::Parser;

/// Tray icon and menu for a local sync daemon, driven over a WebSocket.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "sync-tray", version)]
pub struct Cli {
    /// WebSocket URL of the host's control channel.
    #[arg(long, value_name = "URL")]
    pub ws_url: Option<String>,

    /// Base URL that tray and notification images are fetched from.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Read configuration from this file instead of the per-user one.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
