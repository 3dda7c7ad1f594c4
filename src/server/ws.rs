//! # WebSocket Session Handler
//!
//! One task per connected phone: allocate a slot, greet the client with its
//! player number, then decode/apply/commit each input batch in arrival
//! order until the connection closes, the backend dies, or the operator
//! resets all controllers.
//!
//! Failure policy: every per-session failure ends in exactly one slot
//! release plus a connection close, and never touches another session.
//! Malformed client messages are logged and ignored; a transport fault is
//! treated identically to a client-initiated disconnect.

use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::error::PartyPadError;
use crate::protocol::{decode_batch, ClientMessage, ServerMessage};
use crate::session::{CloseReason, CloseReceiver};

/// Normal closure (RFC 6455).
const CLOSE_NORMAL: u16 = 1000;
/// Unexpected server condition (RFC 6455).
const CLOSE_INTERNAL_ERROR: u16 = 1011;

/// Close reason when every slot is taken.
pub const REASON_SLOTS_FULL: &str = "No available player slots";
/// Close reason for an operator-triggered reset.
pub const REASON_RESET: &str = "reset";
/// Close reason for an unhandled internal fault.
pub const REASON_INTERNAL_ERROR: &str = "Internal server error";

/// How a session loop ended.
enum SessionEnd {
    /// Client closed, transport faulted, or the manager drained the slot.
    Disconnected,
    /// The backend failed mid-session; close with 1011.
    InternalFault,
}

/// Upgrades the connection and hands it to the session task.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (close_tx, mut close_rx) = mpsc::unbounded_channel();

    // Slot allocation is the admission decision for this connection.
    let player = match state.sessions.allocate(close_tx).await {
        Ok(player) => player,
        Err(PartyPadError::SlotsExhausted) => {
            warn!("refusing connection: no available player slots");
            send_close(&mut sender, CLOSE_NORMAL, REASON_SLOTS_FULL).await;
            return;
        }
        Err(e) => {
            error!("failed to create virtual gamepad: {}", e);
            send_close(&mut sender, CLOSE_INTERNAL_ERROR, REASON_INTERNAL_ERROR).await;
            return;
        }
    };
    info!("player {} connected", player);

    let greeting = ServerMessage::PlayerNumber { number: player };
    let greeting_json =
        serde_json::to_string(&greeting).expect("player number greeting always serializes");
    if sender.send(Message::Text(greeting_json.into())).await.is_err() {
        state.sessions.release(player).await;
        return;
    }

    let end = session_loop(&state, player, &mut sender, &mut receiver, &mut close_rx).await;

    if matches!(end, SessionEnd::InternalFault) {
        send_close(&mut sender, CLOSE_INTERNAL_ERROR, REASON_INTERNAL_ERROR).await;
    }

    // Exactly one effective release per session; duplicates are no-ops.
    state.sessions.release(player).await;
    info!("player {} disconnected", player);
}

/// Runs the receive loop until the session ends.
async fn session_loop(
    state: &Arc<AppState>,
    player: u8,
    sender: &mut SplitSink<WebSocket, Message>,
    receiver: &mut SplitStream<WebSocket>,
    close_rx: &mut CloseReceiver,
) -> SessionEnd {
    loop {
        tokio::select! {
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => {
                    if let Some(end) = handle_text(state, player, &text).await {
                        return end;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return SessionEnd::Disconnected,
                Some(Ok(_)) => {
                    // Ping/pong are answered by the protocol layer; binary
                    // frames are not part of the protocol.
                }
                Some(Err(e)) => {
                    debug!("player {} transport fault: {}", player, e);
                    return SessionEnd::Disconnected;
                }
            },

            reason = close_rx.recv() => {
                if let Some(CloseReason::Reset) = reason {
                    info!("player {} closing: operator reset", player);
                    send_close(sender, CLOSE_NORMAL, REASON_RESET).await;
                }
                return SessionEnd::Disconnected;
            }
        }
    }
}

/// Processes one text frame; returns how the session ends, if it does.
async fn handle_text(state: &Arc<AppState>, player: u8, text: &str) -> Option<SessionEnd> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!("player {} sent malformed message: {}", player, e);
            return None;
        }
    };

    let ClientMessage::InputBatch { actions } = message;
    let events = decode_batch(&actions);

    match state.sessions.apply_batch(player, &events).await {
        Ok(()) => None,
        Err(PartyPadError::SlotNotActive(_)) => {
            // The slot was drained underneath us (operator reset); the
            // close notification is already on its way.
            Some(SessionEnd::Disconnected)
        }
        Err(e) => {
            error!("player {} backend failure: {}", player, e);
            Some(SessionEnd::InternalFault)
        }
    }
}

async fn send_close(sender: &mut SplitSink<WebSocket, Message>, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: Utf8Bytes::from_static(reason),
    };
    // The peer may already be gone; closing is best-effort.
    let _ = sender.send(Message::Close(Some(frame))).await;
}
