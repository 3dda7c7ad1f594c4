//! # Action Token Decoder
//!
//! Pure translation from raw client action tokens to structured
//! [`InputEvent`]s.
//!
//! ## Token Grammar
//!
//! Tokens are short machine-generated strings; matching is case-insensitive.
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `BUTTON_<NAME>` | Press edge for `<NAME>` |
//! | `BUTTON_<NAME>_RELEASE` | Release edge for `<NAME>` |
//! | `LEFT-THUMBSTICK-CENTER` | Left stick recentered |
//! | `LEFT-THUMBSTICK_<DIR>` | Left stick deflected towards `<DIR>` |
//! | `RIGHT-THUMBSTICK-CENTER` | Right stick recentered |
//! | `RIGHT-THUMBSTICK_<DIR>` | Right stick deflected towards `<DIR>` |
//!
//! ## Button Names
//!
//! `A B X Y START SELECT GUIDE L2 R2 L3 R3 UP DOWN LEFT RIGHT` map to
//! [`ButtonId`] variants. `L1` and `R1` are special: they decode to analog
//! trigger events with a binary value (255 on press, 0 on release) and never
//! to button events, mirroring XInput where the triggers are analog axes
//! even when driven by a digital switch.
//!
//! ## Stick Directions
//!
//! `<DIR>` is one of the four cardinals `DUP DDOWN DLEFT DRIGHT` or a
//! `-`-joined diagonal such as `DUP-DRIGHT`. Up and right are positive. A
//! cardinal sets one axis to the 16-bit extreme; a diagonal sets both axes
//! to the extreme scaled by 0.7071 (truncated toward zero), so the combined
//! magnitude never exceeds the single-axis maximum.
//!
//! Unrecognized tokens decode to the empty event list. Decoding never fails.

use crate::controller::{ButtonId, InputEvent};

/// Full stick deflection on one axis.
pub const STICK_MAX: i16 = i16::MAX;

/// Full trigger pull.
pub const TRIGGER_MAX: u8 = u8::MAX;

/// Per-axis deflection for diagonal directions: `⌊32767 × 0.7071⌋`.
pub const STICK_DIAGONAL: i16 = 23169;

/// Diagonal scale factor 0.7071 (≈ √2⁄2) as an integer ratio.
const DIAGONAL_NUM: i32 = 7071;
const DIAGONAL_DEN: i32 = 10_000;

/// Decodes one raw action token into zero or more events.
///
/// Pure and total: any input yields a (possibly empty) event list.
///
/// # Examples
///
/// ```
/// use partypad::controller::{ButtonId, InputEvent};
/// use partypad::protocol::decode_action;
///
/// assert_eq!(
///     decode_action("BUTTON_A"),
///     vec![InputEvent::ButtonPress(ButtonId::A)]
/// );
/// assert!(decode_action("not-a-token").is_empty());
/// ```
#[must_use]
pub fn decode_action(token: &str) -> Vec<InputEvent> {
    let token = token.trim().to_ascii_uppercase();

    if token.contains("THUMBSTICK") {
        decode_thumbstick(&token)
    } else if let Some(rest) = token.strip_prefix("BUTTON_") {
        decode_button(rest)
    } else {
        Vec::new()
    }
}

/// Decodes an ordered batch of tokens into an ordered event list.
///
/// The caller applies the whole list and then commits the backend once per
/// batch, bounding the backend-update frequency to the client's batching
/// rate rather than the number of discrete inputs.
#[must_use]
pub fn decode_batch<S: AsRef<str>>(actions: &[S]) -> Vec<InputEvent> {
    actions
        .iter()
        .flat_map(|action| decode_action(action.as_ref()))
        .collect()
}

/// Decodes a (normalized, uppercase) thumbstick token.
fn decode_thumbstick(token: &str) -> Vec<InputEvent> {
    let right_stick = token.contains("RIGHT-THUMBSTICK");

    let (x, y) = if token.contains("-CENTER") {
        (0, 0)
    } else {
        // The direction is the last underscore-separated segment.
        let direction = token.rsplit('_').next().unwrap_or("");
        decode_direction(direction)
    };

    if right_stick {
        vec![InputEvent::SetRightStick { x, y }]
    } else {
        vec![InputEvent::SetLeftStick { x, y }]
    }
}

/// Maps a direction segment (`DUP`, `DDOWN-DLEFT`, ...) to stick axes.
fn decode_direction(direction: &str) -> (i16, i16) {
    let mut x: i32 = 0;
    let mut y: i32 = 0;

    if direction.contains("DLEFT") {
        x = -i32::from(STICK_MAX);
    }
    if direction.contains("DRIGHT") {
        x = i32::from(STICK_MAX);
    }
    if direction.contains("DUP") {
        y = i32::from(STICK_MAX);
    }
    if direction.contains("DDOWN") {
        y = -i32::from(STICK_MAX);
    }

    // A joined pair is a diagonal: scale both axes so the combined
    // magnitude stays within the single-axis maximum.
    if direction.contains('-') {
        x = x * DIAGONAL_NUM / DIAGONAL_DEN;
        y = y * DIAGONAL_NUM / DIAGONAL_DEN;
    }

    (x as i16, y as i16)
}

/// Decodes the remainder of a `BUTTON_`-prefixed token.
fn decode_button(rest: &str) -> Vec<InputEvent> {
    let (name, release) = match rest.strip_suffix("_RELEASE") {
        Some(name) => (name, true),
        None => (rest, false),
    };

    // Shoulder switches drive the analog triggers with a binary value.
    match name {
        "L1" => {
            let value = if release { 0 } else { TRIGGER_MAX };
            return vec![InputEvent::SetLeftTrigger(value)];
        }
        "R1" => {
            let value = if release { 0 } else { TRIGGER_MAX };
            return vec![InputEvent::SetRightTrigger(value)];
        }
        _ => {}
    }

    match button_id(name) {
        Some(button) if release => vec![InputEvent::ButtonRelease(button)],
        Some(button) => vec![InputEvent::ButtonPress(button)],
        None => Vec::new(),
    }
}

/// Maps a wire button name to the closed [`ButtonId`] enumeration.
fn button_id(name: &str) -> Option<ButtonId> {
    match name {
        "A" => Some(ButtonId::A),
        "B" => Some(ButtonId::B),
        "X" => Some(ButtonId::X),
        "Y" => Some(ButtonId::Y),
        "START" => Some(ButtonId::Start),
        "SELECT" => Some(ButtonId::Select),
        "L2" => Some(ButtonId::LeftShoulder),
        "R2" => Some(ButtonId::RightShoulder),
        "L3" => Some(ButtonId::LeftThumb),
        "R3" => Some(ButtonId::RightThumb),
        "GUIDE" => Some(ButtonId::Guide),
        "UP" => Some(ButtonId::DpadUp),
        "DOWN" => Some(ButtonId::DpadDown),
        "LEFT" => Some(ButtonId::DpadLeft),
        "RIGHT" => Some(ButtonId::DpadRight),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Button Tests ====================

    #[test]
    fn test_decode_button_press() {
        assert_eq!(
            decode_action("BUTTON_A"),
            vec![InputEvent::ButtonPress(ButtonId::A)]
        );
        assert_eq!(
            decode_action("BUTTON_GUIDE"),
            vec![InputEvent::ButtonPress(ButtonId::Guide)]
        );
    }

    #[test]
    fn test_decode_button_release() {
        assert_eq!(
            decode_action("BUTTON_B_RELEASE"),
            vec![InputEvent::ButtonRelease(ButtonId::B)]
        );
    }

    #[test]
    fn test_decode_is_case_insensitive() {
        assert_eq!(
            decode_action("button_start"),
            vec![InputEvent::ButtonPress(ButtonId::Start)]
        );
        assert_eq!(
            decode_action("Button_Select_Release"),
            vec![InputEvent::ButtonRelease(ButtonId::Select)]
        );
    }

    #[test]
    fn test_decode_dpad_buttons() {
        assert_eq!(
            decode_action("BUTTON_UP"),
            vec![InputEvent::ButtonPress(ButtonId::DpadUp)]
        );
        assert_eq!(
            decode_action("BUTTON_DOWN_RELEASE"),
            vec![InputEvent::ButtonRelease(ButtonId::DpadDown)]
        );
        assert_eq!(
            decode_action("BUTTON_LEFT"),
            vec![InputEvent::ButtonPress(ButtonId::DpadLeft)]
        );
        assert_eq!(
            decode_action("BUTTON_RIGHT"),
            vec![InputEvent::ButtonPress(ButtonId::DpadRight)]
        );
    }

    #[test]
    fn test_decode_second_row_shoulders_and_thumbs() {
        // L2/R2 are the boolean shoulder buttons; L3/R3 the stick clicks.
        assert_eq!(
            decode_action("BUTTON_L2"),
            vec![InputEvent::ButtonPress(ButtonId::LeftShoulder)]
        );
        assert_eq!(
            decode_action("BUTTON_R2"),
            vec![InputEvent::ButtonPress(ButtonId::RightShoulder)]
        );
        assert_eq!(
            decode_action("BUTTON_L3"),
            vec![InputEvent::ButtonPress(ButtonId::LeftThumb)]
        );
        assert_eq!(
            decode_action("BUTTON_R3_RELEASE"),
            vec![InputEvent::ButtonRelease(ButtonId::RightThumb)]
        );
    }

    // ==================== Shoulder-As-Trigger Tests ====================

    #[test]
    fn test_l1_decodes_to_left_trigger() {
        assert_eq!(
            decode_action("BUTTON_L1"),
            vec![InputEvent::SetLeftTrigger(255)]
        );
        assert_eq!(
            decode_action("BUTTON_L1_RELEASE"),
            vec![InputEvent::SetLeftTrigger(0)]
        );
    }

    #[test]
    fn test_r1_decodes_to_right_trigger() {
        assert_eq!(
            decode_action("BUTTON_R1"),
            vec![InputEvent::SetRightTrigger(255)]
        );
        assert_eq!(
            decode_action("BUTTON_R1_RELEASE"),
            vec![InputEvent::SetRightTrigger(0)]
        );
    }

    #[test]
    fn test_l1_never_yields_button_events() {
        for token in ["BUTTON_L1", "BUTTON_L1_RELEASE", "BUTTON_R1"] {
            for event in decode_action(token) {
                assert!(
                    !matches!(
                        event,
                        InputEvent::ButtonPress(_) | InputEvent::ButtonRelease(_)
                    ),
                    "{} decoded to a button event",
                    token
                );
            }
        }
    }

    // ==================== Thumbstick Tests ====================

    #[test]
    fn test_decode_stick_cardinals() {
        assert_eq!(
            decode_action("LEFT-THUMBSTICK_DUP"),
            vec![InputEvent::SetLeftStick { x: 0, y: 32767 }]
        );
        assert_eq!(
            decode_action("LEFT-THUMBSTICK_DDOWN"),
            vec![InputEvent::SetLeftStick { x: 0, y: -32767 }]
        );
        assert_eq!(
            decode_action("RIGHT-THUMBSTICK_DLEFT"),
            vec![InputEvent::SetRightStick { x: -32767, y: 0 }]
        );
        assert_eq!(
            decode_action("RIGHT-THUMBSTICK_DRIGHT"),
            vec![InputEvent::SetRightStick { x: 32767, y: 0 }]
        );
    }

    #[test]
    fn test_decode_stick_diagonal_is_normalized() {
        // 32767 × 0.7071 truncated toward zero.
        assert_eq!(
            decode_action("LEFT-THUMBSTICK_DUP-DRIGHT"),
            vec![InputEvent::SetLeftStick { x: 23169, y: 23169 }]
        );
        assert_eq!(
            decode_action("LEFT-THUMBSTICK_DDOWN-DLEFT"),
            vec![InputEvent::SetLeftStick {
                x: -23169,
                y: -23169
            }]
        );
        assert_eq!(
            decode_action("RIGHT-THUMBSTICK_DUP-DLEFT"),
            vec![InputEvent::SetRightStick {
                x: -23169,
                y: 23169
            }]
        );
    }

    #[test]
    fn test_diagonal_constant_matches_scale() {
        let scaled = i32::from(STICK_MAX) * DIAGONAL_NUM / DIAGONAL_DEN;
        assert_eq!(scaled, i32::from(STICK_DIAGONAL));
    }

    #[test]
    fn test_decode_stick_center() {
        assert_eq!(
            decode_action("LEFT-THUMBSTICK-CENTER"),
            vec![InputEvent::SetLeftStick { x: 0, y: 0 }]
        );
        assert_eq!(
            decode_action("RIGHT-THUMBSTICK-CENTER"),
            vec![InputEvent::SetRightStick { x: 0, y: 0 }]
        );
    }

    #[test]
    fn test_stick_side_defaults_to_left() {
        // Anything naming a thumbstick that is not explicitly the right one
        // is treated as the left stick.
        assert_eq!(
            decode_action("THUMBSTICK_DUP"),
            vec![InputEvent::SetLeftStick { x: 0, y: 32767 }]
        );
    }

    // ==================== Totality Tests ====================

    #[test]
    fn test_unknown_tokens_decode_to_nothing() {
        for token in [
            "",
            "   ",
            "BUTTON_",
            "BUTTON_Q",
            "BUTTON__RELEASE",
            "JUMP",
            "L1",
            "{\"type\":\"input_batch\"}",
            "BUTTON_A_EXTRA_RELEASE",
            "\u{1F3AE}",
        ] {
            assert!(
                decode_action(token).is_empty(),
                "token {:?} should decode to nothing",
                token
            );
        }
    }

    #[test]
    fn test_malformed_stick_token_recenters() {
        // A thumbstick token with no parseable direction falls back to
        // center rather than being dropped, like the original protocol.
        assert_eq!(
            decode_action("LEFT-THUMBSTICK_SIDEWAYS"),
            vec![InputEvent::SetLeftStick { x: 0, y: 0 }]
        );
    }

    // ==================== Batch Tests ====================

    #[test]
    fn test_decode_batch_preserves_order() {
        let actions = ["BUTTON_A", "LEFT-THUMBSTICK_DUP", "BUTTON_A_RELEASE"];
        let events = decode_batch(&actions);
        assert_eq!(
            events,
            vec![
                InputEvent::ButtonPress(ButtonId::A),
                InputEvent::SetLeftStick { x: 0, y: 32767 },
                InputEvent::ButtonRelease(ButtonId::A),
            ]
        );
    }

    #[test]
    fn test_decode_batch_skips_unknown_tokens() {
        let actions = ["garbage", "BUTTON_Y", "???"];
        let events = decode_batch(&actions);
        assert_eq!(events, vec![InputEvent::ButtonPress(ButtonId::Y)]);
    }

    #[test]
    fn test_decode_empty_batch() {
        let actions: [&str; 0] = [];
        assert!(decode_batch(&actions).is_empty());
    }
}
