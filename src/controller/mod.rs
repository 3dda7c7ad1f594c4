//! # Controller Module
//!
//! Platform-neutral controller vocabulary and per-player state.
//!
//! This module handles:
//! - The closed [`ButtonId`](event::ButtonId) button enumeration
//! - Decoded [`InputEvent`](event::InputEvent) variants
//! - The canonical per-player [`ControllerState`](state::ControllerState)
//!   snapshot that accumulates events between backend commits
//!
//! Backend-native constants (uinput key codes, XInput button bits) never
//! appear here; each backend translates [`ButtonId`](event::ButtonId) to its
//! own representation privately.

pub mod event;
pub mod state;

pub use event::{ButtonId, InputEvent};
pub use state::ControllerState;
