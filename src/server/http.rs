//! # Operator API Handlers
//!
//! The two endpoints the desktop status UI polls and pokes: the active
//! player count and the reset-all action.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use super::AppState;

/// Current slot occupancy.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub active_players: usize,
    pub max_players: u8,
}

/// `GET /api/status` — read-only player count for the status display.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        active_players: state.sessions.active_players().await,
        max_players: state.sessions.max_players(),
    })
}

/// `POST /api/reset` — operator-triggered release of every controller.
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    info!("operator requested controller reset");
    state.sessions.release_all().await;
    Json(serde_json::json!({ "status": "ok" }))
}
