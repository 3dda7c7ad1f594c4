//! # Linux Virtual Gamepad Backend
//!
//! Presents one virtual Xbox-style controller to the OS through the uinput
//! subsystem, using the `evdev` crate.
//!
//! ## Native Conventions
//!
//! The uinput device is registered with the same capabilities the original
//! kernel `xpad` driver exposes, and the backend owns all remapping from the
//! canonical representation:
//!
//! | Canonical | Native |
//! |-----------|--------|
//! | Stick axis -32768..32767, up/right positive | ABS axis 0..32767, **Y inverted** |
//! | Trigger 0..255 | ABS_Z / ABS_RZ 0..255 |
//! | D-pad buttons | ABS_HAT0X / ABS_HAT0Y in {-1, 0, 1} |
//! | Other buttons | BTN_* key events |
//!
//! ## Commit Batching
//!
//! uinput applies events as they are written, so this backend buffers every
//! state change and writes the whole batch in a single `emit` call per
//! [`commit`](super::VirtualGamepad::commit). The kernel sees one SYN_REPORT
//! per batch, which keeps multi-event batches (e.g. a diagonal stick move
//! plus a button edge) atomic for readers.

use std::time::Duration;

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{
    AbsInfo, AbsoluteAxisType, AttributeSet, EventType, InputEvent as EvdevEvent, Key,
    UinputAbsSetup,
};
use tracing::{debug, info};

use super::VirtualGamepad;
use crate::controller::ButtonId;
use crate::error::{PartyPadError, Result};

/// Device name visible in `/proc/bus/input/devices` and to applications.
const DEVICE_NAME: &str = "Virtual Xbox Controller";

/// Native stick range exposed over uinput.
const STICK_NATIVE_MIN: i32 = 0;
const STICK_NATIVE_MAX: i32 = 32767;
const STICK_NATIVE_CENTER: i32 = 16384;

/// Native trigger range exposed over uinput.
const TRIGGER_NATIVE_MAX: i32 = 255;

/// Virtual gamepad backed by a uinput device.
pub struct LinuxGamepad {
    device: VirtualDevice,
    pending: Vec<EvdevEvent>,
}

impl LinuxGamepad {
    /// Creates the uinput device for one player slot.
    ///
    /// # Errors
    ///
    /// - `PermissionDenied` when `/dev/uinput` is not writable (the user is
    ///   typically missing membership in the `input` group)
    /// - `BackendUnavailable` for any other device-creation failure
    pub fn create(player: u8) -> Result<Box<dyn VirtualGamepad>> {
        let mut keys = AttributeSet::<Key>::new();
        for button in ButtonId::ALL {
            if let Some(key) = button_key(button) {
                keys.insert(key);
            }
        }

        let stick_info = AbsInfo::new(STICK_NATIVE_CENTER, STICK_NATIVE_MIN, STICK_NATIVE_MAX, 0, 0, 0);
        let trigger_info = AbsInfo::new(0, 0, TRIGGER_NATIVE_MAX, 0, 0, 0);
        let hat_info = AbsInfo::new(0, -1, 1, 0, 0, 0);

        let device = VirtualDeviceBuilder::new()
            .map_err(creation_error)?
            .name(DEVICE_NAME)
            .with_keys(&keys)
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_X, stick_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_Y, stick_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_RX, stick_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_RY, stick_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_Z, trigger_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_RZ, trigger_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_HAT0X, hat_info))
            .map_err(creation_error)?
            .with_absolute_axis(&UinputAbsSetup::new(AbsoluteAxisType::ABS_HAT0Y, hat_info))
            .map_err(creation_error)?
            .build()
            .map_err(creation_error)?;

        // Give udev a moment to create the device node before games probe it.
        std::thread::sleep(Duration::from_millis(100));

        info!("created uinput gamepad \"{}\" for player {}", DEVICE_NAME, player);

        Ok(Box::new(Self {
            device,
            pending: Vec::new(),
        }))
    }

    fn push_key(&mut self, key: Key, pressed: bool) {
        self.pending.push(EvdevEvent::new(
            EventType::KEY,
            key.code(),
            i32::from(pressed),
        ));
    }

    fn push_abs(&mut self, axis: AbsoluteAxisType, value: i32) {
        self.pending
            .push(EvdevEvent::new(EventType::ABSOLUTE, axis.0, value));
    }

    fn push_button(&mut self, button: ButtonId, pressed: bool) {
        if let Some(key) = button_key(button) {
            self.push_key(key, pressed);
        } else if let Some((axis, pressed_value)) = dpad_axis(button) {
            let value = if pressed { pressed_value } else { 0 };
            self.push_abs(axis, value);
        }
    }
}

impl VirtualGamepad for LinuxGamepad {
    fn press(&mut self, button: ButtonId) -> Result<()> {
        self.push_button(button, true);
        Ok(())
    }

    fn release(&mut self, button: ButtonId) -> Result<()> {
        self.push_button(button, false);
        Ok(())
    }

    fn set_left_stick(&mut self, x: i16, y: i16) -> Result<()> {
        self.push_abs(AbsoluteAxisType::ABS_X, stick_x_to_native(x));
        self.push_abs(AbsoluteAxisType::ABS_Y, stick_y_to_native(y));
        Ok(())
    }

    fn set_right_stick(&mut self, x: i16, y: i16) -> Result<()> {
        self.push_abs(AbsoluteAxisType::ABS_RX, stick_x_to_native(x));
        self.push_abs(AbsoluteAxisType::ABS_RY, stick_y_to_native(y));
        Ok(())
    }

    fn set_left_trigger(&mut self, value: u8) -> Result<()> {
        self.push_abs(AbsoluteAxisType::ABS_Z, i32::from(value));
        Ok(())
    }

    fn set_right_trigger(&mut self, value: u8) -> Result<()> {
        self.push_abs(AbsoluteAxisType::ABS_RZ, i32::from(value));
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        debug!("committing {} uinput events", self.pending.len());
        self.device
            .emit(&self.pending)
            .map_err(|e| PartyPadError::BackendUnavailable(format!("uinput write failed: {e}")))?;
        self.pending.clear();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        for button in ButtonId::ALL {
            if let Some(key) = button_key(button) {
                self.push_key(key, false);
            }
        }
        self.push_abs(AbsoluteAxisType::ABS_HAT0X, 0);
        self.push_abs(AbsoluteAxisType::ABS_HAT0Y, 0);
        self.push_abs(AbsoluteAxisType::ABS_X, STICK_NATIVE_CENTER);
        self.push_abs(AbsoluteAxisType::ABS_Y, STICK_NATIVE_CENTER);
        self.push_abs(AbsoluteAxisType::ABS_RX, STICK_NATIVE_CENTER);
        self.push_abs(AbsoluteAxisType::ABS_RY, STICK_NATIVE_CENTER);
        self.push_abs(AbsoluteAxisType::ABS_Z, 0);
        self.push_abs(AbsoluteAxisType::ABS_RZ, 0);
        Ok(())
    }
}

/// Maps a device-creation failure to the error taxonomy.
fn creation_error(e: std::io::Error) -> PartyPadError {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        PartyPadError::PermissionDenied(
            "cannot open /dev/uinput; add your user to the 'input' group \
             (sudo usermod -a -G input $USER) and log in again"
                .to_string(),
        )
    } else {
        PartyPadError::BackendUnavailable(format!("uinput device creation failed: {e}"))
    }
}

/// Maps a non-d-pad button to its uinput key.
fn button_key(button: ButtonId) -> Option<Key> {
    match button {
        ButtonId::A => Some(Key::BTN_SOUTH),
        ButtonId::B => Some(Key::BTN_EAST),
        ButtonId::X => Some(Key::BTN_NORTH),
        ButtonId::Y => Some(Key::BTN_WEST),
        ButtonId::Start => Some(Key::BTN_START),
        ButtonId::Select => Some(Key::BTN_SELECT),
        ButtonId::LeftShoulder => Some(Key::BTN_TL),
        ButtonId::RightShoulder => Some(Key::BTN_TR),
        ButtonId::LeftThumb => Some(Key::BTN_THUMBL),
        ButtonId::RightThumb => Some(Key::BTN_THUMBR),
        ButtonId::Guide => Some(Key::BTN_MODE),
        ButtonId::DpadUp
        | ButtonId::DpadDown
        | ButtonId::DpadLeft
        | ButtonId::DpadRight => None,
    }
}

/// Maps a d-pad button to its hat axis and pressed value.
fn dpad_axis(button: ButtonId) -> Option<(AbsoluteAxisType, i32)> {
    match button {
        ButtonId::DpadUp => Some((AbsoluteAxisType::ABS_HAT0Y, -1)),
        ButtonId::DpadDown => Some((AbsoluteAxisType::ABS_HAT0Y, 1)),
        ButtonId::DpadLeft => Some((AbsoluteAxisType::ABS_HAT0X, -1)),
        ButtonId::DpadRight => Some((AbsoluteAxisType::ABS_HAT0X, 1)),
        _ => None,
    }
}

/// Remaps a canonical X component to the unsigned native range.
fn stick_x_to_native(value: i16) -> i32 {
    ((i32::from(value) + 32768) / 2).clamp(STICK_NATIVE_MIN, STICK_NATIVE_MAX)
}

/// Remaps a canonical Y component to the unsigned native range, inverting
/// the axis (uinput expects 0 = up).
fn stick_y_to_native(value: i16) -> i32 {
    ((32768 - i32::from(value)) / 2).clamp(STICK_NATIVE_MIN, STICK_NATIVE_MAX)
}
