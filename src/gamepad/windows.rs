//! # Windows Virtual Gamepad Backend
//!
//! Presents one virtual Xbox 360 controller to the OS through the ViGEmBus
//! driver, using the `vigem-client` crate.
//!
//! ViGEmBus consumes whole XInput reports, so this backend keeps a shadow
//! [`XGamepad`] report: state-changing calls mutate the shadow and
//! [`commit`](super::VirtualGamepad::commit) submits it in one `update`
//! call, which is already atomic on the bus side. Canonical stick and
//! trigger values are native XInput values and pass through unchanged.

use tracing::info;
use vigem_client::{Client, TargetId, XButtons, XGamepad, Xbox360Wired};

use super::VirtualGamepad;
use crate::controller::ButtonId;
use crate::error::{PartyPadError, Result};

/// Virtual gamepad backed by a ViGEmBus Xbox 360 target.
pub struct WindowsGamepad {
    target: Xbox360Wired<Client>,
    report: XGamepad,
}

impl WindowsGamepad {
    /// Connects to ViGEmBus and plugs in one Xbox 360 target.
    ///
    /// # Errors
    ///
    /// `BackendUnavailable` when the ViGEmBus driver is not installed or the
    /// target cannot be plugged in.
    pub fn create(player: u8) -> Result<Box<dyn VirtualGamepad>> {
        let client = Client::connect()
            .map_err(|e| PartyPadError::BackendUnavailable(format!("ViGEmBus connect: {e}")))?;

        let mut target = Xbox360Wired::new(client, TargetId::XBOX360_WIRED);
        target
            .plugin()
            .map_err(|e| PartyPadError::BackendUnavailable(format!("ViGEmBus plugin: {e}")))?;
        target
            .wait_ready()
            .map_err(|e| PartyPadError::BackendUnavailable(format!("ViGEmBus ready: {e}")))?;

        info!("created ViGEmBus Xbox 360 target for player {}", player);

        Ok(Box::new(Self {
            target,
            report: XGamepad::default(),
        }))
    }
}

impl VirtualGamepad for WindowsGamepad {
    fn press(&mut self, button: ButtonId) -> Result<()> {
        self.report.buttons.raw |= button_bit(button);
        Ok(())
    }

    fn release(&mut self, button: ButtonId) -> Result<()> {
        self.report.buttons.raw &= !button_bit(button);
        Ok(())
    }

    fn set_left_stick(&mut self, x: i16, y: i16) -> Result<()> {
        self.report.thumb_lx = x;
        self.report.thumb_ly = y;
        Ok(())
    }

    fn set_right_stick(&mut self, x: i16, y: i16) -> Result<()> {
        self.report.thumb_rx = x;
        self.report.thumb_ry = y;
        Ok(())
    }

    fn set_left_trigger(&mut self, value: u8) -> Result<()> {
        self.report.left_trigger = value;
        Ok(())
    }

    fn set_right_trigger(&mut self, value: u8) -> Result<()> {
        self.report.right_trigger = value;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.target
            .update(&self.report)
            .map_err(|e| PartyPadError::BackendUnavailable(format!("ViGEmBus update: {e}")))
    }

    fn reset(&mut self) -> Result<()> {
        self.report = XGamepad::default();
        Ok(())
    }
}

/// Maps a platform-neutral button to its XInput button bit.
fn button_bit(button: ButtonId) -> u16 {
    match button {
        ButtonId::A => XButtons::A,
        ButtonId::B => XButtons::B,
        ButtonId::X => XButtons::X,
        ButtonId::Y => XButtons::Y,
        ButtonId::Start => XButtons::START,
        ButtonId::Select => XButtons::BACK,
        ButtonId::LeftShoulder => XButtons::LB,
        ButtonId::RightShoulder => XButtons::RB,
        ButtonId::LeftThumb => XButtons::LTHUMB,
        ButtonId::RightThumb => XButtons::RTHUMB,
        ButtonId::Guide => XButtons::GUIDE,
        ButtonId::DpadUp => XButtons::UP,
        ButtonId::DpadDown => XButtons::DOWN,
        ButtonId::DpadLeft => XButtons::LEFT,
        ButtonId::DpadRight => XButtons::RIGHT,
    }
}
