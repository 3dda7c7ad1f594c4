//! # PartyPad
//!
//! Turn phones into game controllers for your computer.
//!
//! Phones connect over WebSocket, get a player slot and a matching virtual
//! gamepad device, and stream input batches that the server commits to the
//! OS input subsystem (uinput on Linux, ViGEmBus on Windows).

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod config;
mod error;
mod protocol;
mod controller;
mod gamepad;
mod session;
mod server;

use config::Config;
use session::SessionManager;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "partypad.toml";

/// Main entry point for the PartyPad server
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (defaults when no file exists)
///    - Select the virtual gamepad backend for this OS
///
/// 2. **Serving**
///    - Accept phone connections on `/ws`, one session task each
///    - Answer operator status/reset requests on `/api/*`
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C stops the listener
///    - Every remaining slot is released so no virtual controller is left
///      with buttons held down
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("PartyPad v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::load_or_default(CONFIG_PATH)?;
    info!(
        "{} player slots, serving controller page from {}/",
        config.players.max_players, config.server.static_dir
    );

    let sessions = Arc::new(SessionManager::new(
        gamepad::platform_factory(),
        config.players.max_players,
    ));

    server::run(&config, sessions.clone()).await?;

    // Leave no controller in a non-neutral state behind us.
    sessions.release_all().await;
    info!("all controllers released, bye");

    Ok(())
}
