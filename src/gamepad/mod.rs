//! # Virtual Gamepad Module
//!
//! The platform seam: one capability set, one implementation per OS.
//!
//! This module handles:
//! - The [`VirtualGamepad`] trait every backend implements
//! - Selecting the backend for the running OS once at startup
//!   ([`platform_factory`])
//! - Mirroring decoded events into a backend ([`apply_event`])
//!
//! Backends own their native range/sign conventions privately: the Linux
//! uinput backend remaps the signed 16-bit canonical sticks to an unsigned
//! half-range with an inverted Y axis, while the Windows ViGEmBus backend
//! passes XInput values through unchanged. Callers only ever see the
//! canonical representation.
//!
//! The commit contract tolerates both immediate and batching backends:
//! callers always call [`VirtualGamepad::commit`] after a batch of state
//! changes (and after [`VirtualGamepad::reset`]) and never assume the OS saw
//! anything before that.

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(windows)]
pub mod windows;

use std::sync::Arc;

use crate::controller::{ButtonId, InputEvent};
use crate::error::Result;

#[cfg(not(any(target_os = "linux", windows)))]
use crate::error::PartyPadError;

/// One virtual gamepad presented to the operating system.
///
/// All methods accept canonical values: signed 16-bit stick components
/// (up/right positive) and unsigned 8-bit triggers. State-changing calls may
/// be buffered; `commit` makes everything since the previous commit visible
/// to the OS in one logical update.
#[cfg_attr(test, mockall::automock)]
pub trait VirtualGamepad: Send {
    /// Registers a button press in backend-native terms.
    fn press(&mut self, button: ButtonId) -> Result<()>;

    /// Registers a button release in backend-native terms.
    fn release(&mut self, button: ButtonId) -> Result<()>;

    /// Positions the left stick, `x`/`y` in [-32768, 32767].
    fn set_left_stick(&mut self, x: i16, y: i16) -> Result<()>;

    /// Positions the right stick, `x`/`y` in [-32768, 32767].
    fn set_right_stick(&mut self, x: i16, y: i16) -> Result<()>;

    /// Sets the left trigger level in [0, 255].
    fn set_left_trigger(&mut self, value: u8) -> Result<()>;

    /// Sets the right trigger level in [0, 255].
    fn set_right_trigger(&mut self, value: u8) -> Result<()>;

    /// Atomically pushes all pending values to the OS.
    fn commit(&mut self) -> Result<()>;

    /// Registers the neutral state (no buttons, sticks centered, triggers
    /// zero). Like every other state change, it becomes visible on the next
    /// `commit`.
    fn reset(&mut self) -> Result<()>;
}

/// Mirrors one decoded event into a backend.
pub fn apply_event(gamepad: &mut dyn VirtualGamepad, event: InputEvent) -> Result<()> {
    match event {
        InputEvent::ButtonPress(button) => gamepad.press(button),
        InputEvent::ButtonRelease(button) => gamepad.release(button),
        InputEvent::SetLeftStick { x, y } => gamepad.set_left_stick(x, y),
        InputEvent::SetRightStick { x, y } => gamepad.set_right_stick(x, y),
        InputEvent::SetLeftTrigger(value) => gamepad.set_left_trigger(value),
        InputEvent::SetRightTrigger(value) => gamepad.set_right_trigger(value),
    }
}

/// Creates one virtual gamepad for the given player number.
///
/// The player number is informational (logging, device naming); backends are
/// otherwise identical across slots.
pub type GamepadFactory = Arc<dyn Fn(u8) -> Result<Box<dyn VirtualGamepad>> + Send + Sync>;

/// Returns the gamepad factory for the running OS.
///
/// Selected once at process start; the rest of the crate only ever sees the
/// [`VirtualGamepad`] trait. On unsupported platforms every allocation fails
/// with `BackendUnsupported`, which is fatal to that player's session only.
#[must_use]
pub fn platform_factory() -> GamepadFactory {
    #[cfg(target_os = "linux")]
    {
        Arc::new(linux::LinuxGamepad::create)
    }

    #[cfg(windows)]
    {
        Arc::new(windows::WindowsGamepad::create)
    }

    #[cfg(not(any(target_os = "linux", windows)))]
    {
        Arc::new(|_player| -> Result<Box<dyn VirtualGamepad>> {
            Err(PartyPadError::BackendUnsupported(std::env::consts::OS))
        })
    }
}

#[cfg(test)]
pub mod fakes {
    //! Hand-rolled stateful fake for session-level tests.
    //!
    //! Unlike the generated `MockVirtualGamepad`, the fake models the commit
    //! contract: state changes accumulate in a pending shadow and become the
    //! committed snapshot only when `commit` runs, so tests can assert both
    //! what was committed and how often.

    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::PartyPadError;

    /// Committed/pending shadow of a fake gamepad.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct FakePadShadow {
        pub buttons: HashSet<ButtonId>,
        pub left_stick: (i16, i16),
        pub right_stick: (i16, i16),
        pub left_trigger: u8,
        pub right_trigger: u8,
    }

    /// Shared, inspectable innards of a [`FakeGamepad`].
    #[derive(Debug, Default)]
    pub struct FakePadState {
        pub pending: FakePadShadow,
        pub committed: FakePadShadow,
        pub commits: usize,
        pub resets: usize,
        pub fail_commit: bool,
        pub fail_reset: bool,
    }

    /// Handle for inspecting a fake after it has been boxed away.
    pub type FakePadHandle = Arc<Mutex<FakePadState>>;

    /// Fake virtual gamepad recording every interaction.
    pub struct FakeGamepad {
        state: FakePadHandle,
    }

    impl FakeGamepad {
        pub fn new() -> (Self, FakePadHandle) {
            let state = Arc::new(Mutex::new(FakePadState::default()));
            (
                Self {
                    state: state.clone(),
                },
                state,
            )
        }
    }

    impl VirtualGamepad for FakeGamepad {
        fn press(&mut self, button: ButtonId) -> Result<()> {
            self.state.lock().unwrap().pending.buttons.insert(button);
            Ok(())
        }

        fn release(&mut self, button: ButtonId) -> Result<()> {
            self.state.lock().unwrap().pending.buttons.remove(&button);
            Ok(())
        }

        fn set_left_stick(&mut self, x: i16, y: i16) -> Result<()> {
            self.state.lock().unwrap().pending.left_stick = (x, y);
            Ok(())
        }

        fn set_right_stick(&mut self, x: i16, y: i16) -> Result<()> {
            self.state.lock().unwrap().pending.right_stick = (x, y);
            Ok(())
        }

        fn set_left_trigger(&mut self, value: u8) -> Result<()> {
            self.state.lock().unwrap().pending.left_trigger = value;
            Ok(())
        }

        fn set_right_trigger(&mut self, value: u8) -> Result<()> {
            self.state.lock().unwrap().pending.right_trigger = value;
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            if state.fail_commit {
                return Err(PartyPadError::BackendUnavailable(
                    "fake commit failure".to_string(),
                ));
            }
            state.committed = state.pending.clone();
            state.commits += 1;
            Ok(())
        }

        fn reset(&mut self) -> Result<()> {
            let mut state = self.state.lock().unwrap();
            state.resets += 1;
            if state.fail_reset {
                return Err(PartyPadError::BackendUnavailable(
                    "fake reset failure".to_string(),
                ));
            }
            state.pending = FakePadShadow::default();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeGamepad;
    use super::*;

    #[test]
    fn test_apply_event_dispatch() {
        let (mut pad, handle) = FakeGamepad::new();

        apply_event(&mut pad, InputEvent::ButtonPress(ButtonId::A)).unwrap();
        apply_event(&mut pad, InputEvent::SetLeftStick { x: 5, y: -5 }).unwrap();
        apply_event(&mut pad, InputEvent::SetRightTrigger(128)).unwrap();

        let state = handle.lock().unwrap();
        assert!(state.pending.buttons.contains(&ButtonId::A));
        assert_eq!(state.pending.left_stick, (5, -5));
        assert_eq!(state.pending.right_trigger, 128);
        // Nothing visible to the "OS" before commit.
        assert_eq!(state.commits, 0);
        assert_eq!(state.committed, Default::default());
    }

    #[test]
    fn test_commit_publishes_pending_state() {
        let (mut pad, handle) = FakeGamepad::new();

        pad.press(ButtonId::Start).unwrap();
        pad.commit().unwrap();

        let state = handle.lock().unwrap();
        assert_eq!(state.commits, 1);
        assert!(state.committed.buttons.contains(&ButtonId::Start));
    }

    #[test]
    fn test_reset_requires_commit_to_publish() {
        let (mut pad, handle) = FakeGamepad::new();

        pad.set_left_trigger(255).unwrap();
        pad.commit().unwrap();
        pad.reset().unwrap();

        assert_eq!(handle.lock().unwrap().committed.left_trigger, 255);

        pad.commit().unwrap();
        assert_eq!(handle.lock().unwrap().committed.left_trigger, 0);
    }
}
