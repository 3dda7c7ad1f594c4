//! # Error Types
//!
//! Custom error types for PartyPad using `thiserror`.
//!
//! Every per-session failure (backend creation, backend write, slot
//! exhaustion) is represented here so the session boundary can convert it
//! into a slot release plus connection close without touching other sessions.

use thiserror::Error;

/// Main error type for PartyPad
#[derive(Debug, Error)]
pub enum PartyPadError {
    /// Every player slot is occupied; the connection must be refused
    #[error("no available player slots")]
    SlotsExhausted,

    /// The slot is not (or no longer) active; the owning session must stop
    #[error("player slot {0} is not active")]
    SlotNotActive(u8),

    /// The OS virtual-device channel has been torn down or rejected a write
    #[error("virtual gamepad backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Insufficient OS privilege to create a virtual input device
    #[error("permission denied creating virtual gamepad: {0}")]
    PermissionDenied(String),

    /// No virtual gamepad implementation exists for the running OS
    #[error("virtual gamepads are not supported on {0}")]
    BackendUnsupported(&'static str),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for PartyPad
pub type Result<T> = std::result::Result<T, PartyPadError>;
