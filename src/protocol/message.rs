//! # Wire Messages
//!
//! JSON message shapes exchanged over the WebSocket connection.
//!
//! Clients send input batches; the server sends a single unsolicited
//! player-number greeting immediately after slot allocation. Everything else
//! on the wire is connection-lifecycle close frames handled by the transport.

use serde::{Deserialize, Serialize};

/// A message received from a client.
///
/// ```json
/// { "type": "input_batch", "actions": ["BUTTON_A", "LEFT-THUMBSTICK_DUP"] }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// An ordered batch of raw action tokens to apply and commit together.
    InputBatch {
        #[serde(default)]
        actions: Vec<String>,
    },
}

/// A message sent to a client.
///
/// ```json
/// { "type": "player_number", "number": 1 }
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, immediately after a slot is allocated.
    PlayerNumber { number: u8 },
}
