//! # Protocol Module
//!
//! The wire protocol spoken between phones and the server.
//!
//! This module handles:
//! - JSON message framing (input batches from clients, the player-number
//!   greeting to clients)
//! - Decoding raw action tokens into structured controller events
//!
//! Decoding is deterministic, side-effect-free and total: malformed client
//! input decodes to nothing instead of failing, because a misbehaving phone
//! must never be able to crash the server.

pub mod decoder;
pub mod message;

pub use decoder::{decode_action, decode_batch};
pub use message::{ClientMessage, ServerMessage};
