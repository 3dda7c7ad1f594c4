//! # Server Module
//!
//! The HTTP/WebSocket transport adapter.
//!
//! This module handles:
//! - The `/ws` endpoint where phones connect and stream input batches
//! - Status and reset endpoints consumed by the operator UI
//! - Serving the static controller page
//! - Listener setup, local-address announcement and graceful shutdown
//!
//! The core never touches sockets directly: the WebSocket handler delivers
//! decoded batches to the [`SessionManager`](crate::session::SessionManager)
//! and forwards its close notifications back to the wire.

pub mod http;
pub mod ws;

use std::net::UdpSocket;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::session::SessionManager;

/// Shared state handed to every handler.
pub struct AppState {
    pub sessions: Arc<SessionManager>,
}

/// Builds the application router.
#[must_use]
pub fn router(sessions: Arc<SessionManager>, static_dir: &str) -> Router {
    let state = Arc::new(AppState { sessions });

    Router::new()
        .route("/ws", get(ws::websocket_handler))
        .route("/api/status", get(http::status))
        .route("/api/reset", post(http::reset))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until Ctrl+C.
///
/// # Errors
///
/// Returns error if the listen address cannot be bound or the server fails
/// while accepting connections.
pub async fn run(config: &Config, sessions: Arc<SessionManager>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    info!(
        "connect phones to http://{}:{}",
        local_ip(),
        config.server.port
    );

    let app = router(sessions, &config.server.static_dir);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("received Ctrl+C, shutting down...");
}

/// Best-effort LAN address discovery, for showing players where to connect.
///
/// Opens a UDP socket towards a public address to learn which local
/// interface would route there; no packet is actually sent.
#[must_use]
pub fn local_ip() -> String {
    let probe = UdpSocket::bind("0.0.0.0:0").and_then(|socket| {
        socket.connect("8.8.8.8:80")?;
        socket.local_addr()
    });

    match probe {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => "localhost".to_string(),
    }
}
