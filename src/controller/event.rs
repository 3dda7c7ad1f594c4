//! # Controller Events
//!
//! The platform-neutral button vocabulary and the decoded event variants
//! produced by the protocol decoder.
//!
//! `ButtonId` is a closed enumeration translated once at the protocol
//! boundary; the rest of the crate never dispatches on button name strings.

/// Platform-neutral gamepad button identifier.
///
/// Each virtual gamepad backend maps these to its own native constants
/// (uinput `BTN_*` keys and hat axes on Linux, XInput button bits on
/// Windows).
///
/// Note that the physical shoulder switches L1/R1 are *not* represented
/// here: the protocol decoder translates them into analog trigger events
/// with a binary value, mirroring XInput semantics where the triggers are
/// analog axes even when driven by a digital switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    A,
    B,
    X,
    Y,
    Start,
    Select,
    LeftShoulder,
    RightShoulder,
    LeftThumb,
    RightThumb,
    Guide,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

impl ButtonId {
    /// All button identifiers, in a fixed order.
    ///
    /// Used by backends that need to enumerate every button, e.g. to build
    /// the uinput key capability set or to release everything on reset.
    pub const ALL: [ButtonId; 15] = [
        ButtonId::A,
        ButtonId::B,
        ButtonId::X,
        ButtonId::Y,
        ButtonId::Start,
        ButtonId::Select,
        ButtonId::LeftShoulder,
        ButtonId::RightShoulder,
        ButtonId::LeftThumb,
        ButtonId::RightThumb,
        ButtonId::Guide,
        ButtonId::DpadUp,
        ButtonId::DpadDown,
        ButtonId::DpadLeft,
        ButtonId::DpadRight,
    ];
}

/// One decoded controller event.
///
/// Stateless and immutable; produced by the protocol decoder, applied once
/// to a player's [`ControllerState`](super::ControllerState) and mirrored
/// into that player's virtual gamepad backend.
///
/// Stick components use the signed 16-bit XInput convention (up/right
/// positive); triggers use the unsigned 8-bit XInput range. Any
/// backend-specific sign or range remapping happens inside the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ButtonPress(ButtonId),
    ButtonRelease(ButtonId),
    SetLeftStick { x: i16, y: i16 },
    SetRightStick { x: i16, y: i16 },
    SetLeftTrigger(u8),
    SetRightTrigger(u8),
}
