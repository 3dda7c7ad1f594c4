//! # Controller State
//!
//! The canonical gamepad snapshot for one player.
//!
//! The state accumulates decoded [`InputEvent`]s between backend commits and
//! is the single source of truth for what a player's virtual controller
//! currently reports: held buttons, stick positions and trigger levels.
//!
//! Value ranges are enforced by the field types themselves (`i16` stick
//! components, `u8` triggers), so `apply` has no error path; all inputs are
//! pre-validated by construction of [`InputEvent`]. The diagonal-magnitude
//! invariant (combined stick magnitude never exceeds the single-axis
//! maximum) is guaranteed by the protocol decoder, which is the only event
//! producer.

use std::collections::HashSet;

use super::event::{ButtonId, InputEvent};

/// Canonical gamepad snapshot for one player.
///
/// Mutated only by decoded events for its owning slot; read only to mirror
/// into a backend commit.
///
/// # Examples
///
/// ```
/// use partypad::controller::{ButtonId, ControllerState, InputEvent};
///
/// let mut state = ControllerState::new();
/// state.apply(InputEvent::ButtonPress(ButtonId::A));
/// assert!(state.is_pressed(ButtonId::A));
///
/// state.apply(InputEvent::ButtonRelease(ButtonId::A));
/// assert!(!state.is_pressed(ButtonId::A));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerState {
    buttons: HashSet<ButtonId>,
    left_stick: (i16, i16),
    right_stick: (i16, i16),
    left_trigger: u8,
    right_trigger: u8,
}

impl ControllerState {
    /// Creates a neutral state: no buttons held, sticks centered, triggers
    /// released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one decoded event to the snapshot.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::ButtonPress(button) => {
                self.buttons.insert(button);
            }
            InputEvent::ButtonRelease(button) => {
                self.buttons.remove(&button);
            }
            InputEvent::SetLeftStick { x, y } => self.left_stick = (x, y),
            InputEvent::SetRightStick { x, y } => self.right_stick = (x, y),
            InputEvent::SetLeftTrigger(value) => self.left_trigger = value,
            InputEvent::SetRightTrigger(value) => self.right_trigger = value,
        }
    }

    /// Restores the neutral snapshot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns whether `button` is currently held.
    #[must_use]
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.buttons.contains(&button)
    }

    /// Currently held buttons.
    #[must_use]
    pub fn buttons(&self) -> &HashSet<ButtonId> {
        &self.buttons
    }

    /// Left stick position as `(x, y)`, up/right positive.
    #[must_use]
    pub fn left_stick(&self) -> (i16, i16) {
        self.left_stick
    }

    /// Right stick position as `(x, y)`, up/right positive.
    #[must_use]
    pub fn right_stick(&self) -> (i16, i16) {
        self.right_stick
    }

    /// Left trigger level, 0 = released.
    #[must_use]
    pub fn left_trigger(&self) -> u8 {
        self.left_trigger
    }

    /// Right trigger level, 0 = released.
    #[must_use]
    pub fn right_trigger(&self) -> u8 {
        self.right_trigger
    }

    /// Returns whether the snapshot equals the neutral state.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }
}
