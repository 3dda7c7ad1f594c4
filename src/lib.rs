//! # PartyPad Library
//!
//! Turn phones into game controllers for a host computer.
//!
//! Each phone opens a WebSocket connection, is assigned a player slot, and
//! streams discrete touch/button/stick action tokens. This library decodes
//! those tokens, accumulates them into per-player controller state, and
//! commits that state to a virtual gamepad device the operating system (and
//! any game) recognizes.

pub mod config;
pub mod error;
pub mod protocol;
pub mod controller;
pub mod gamepad;
pub mod session;
pub mod server;
