//! # Session Module
//!
//! Player-slot lifecycle under concurrent connect/disconnect.
//!
//! The [`SessionManager`] owns the pool of numbered player slots, each
//! pairing one connection with one [`ControllerState`] and one virtual
//! gamepad backend. The slot registry is the only state shared across
//! session tasks and every mutation goes through a single `tokio` mutex, so
//! allocate / apply / release / release-all are atomic sections.
//!
//! Slot lifecycle: `Unallocated → Active → Draining → Unallocated`. Draining
//! (backend reset + commit during release) runs synchronously under the
//! registry lock; a session task whose slot was drained by someone else
//! (operator reset) observes `SlotNotActive` on its next batch and stops.
//!
//! Released backends are parked rather than destroyed and reused when the
//! slot number is next allocated, so reconnecting players do not pay the
//! device-creation cost again.

use std::collections::HashMap;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::controller::{ControllerState, InputEvent};
use crate::error::{PartyPadError, Result};
use crate::gamepad::{apply_event, GamepadFactory, VirtualGamepad};

/// Default number of concurrent players.
pub const DEFAULT_MAX_PLAYERS: u8 = 4;

/// Why the manager is asking a session's transport to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Operator-triggered reset of all controllers.
    Reset,
}

/// Sender half of a session's close-notification channel.
///
/// The manager does not own sockets; it asks the transport task to close by
/// sending on this channel.
pub type CloseSender = mpsc::UnboundedSender<CloseReason>;

/// Receiver half of a session's close-notification channel.
pub type CloseReceiver = mpsc::UnboundedReceiver<CloseReason>;

/// One active player slot.
struct PlayerSlot {
    state: ControllerState,
    gamepad: Box<dyn VirtualGamepad>,
    close_tx: CloseSender,
}

/// Process-wide slot registry, guarded by the manager's mutex.
#[derive(Default)]
struct Registry {
    /// Active slots by player number. `len() ≤ max_players` always.
    active: HashMap<u8, PlayerSlot>,
    /// Backends kept alive across releases, by player number.
    parked: HashMap<u8, Box<dyn VirtualGamepad>>,
}

/// Allocates and releases player slots safely under concurrency.
pub struct SessionManager {
    factory: GamepadFactory,
    max_players: u8,
    registry: Mutex<Registry>,
}

impl SessionManager {
    /// Creates a manager with an empty registry.
    #[must_use]
    pub fn new(factory: GamepadFactory, max_players: u8) -> Self {
        Self {
            factory,
            max_players,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Configured slot capacity.
    #[must_use]
    pub fn max_players(&self) -> u8 {
        self.max_players
    }

    /// Current number of active players (read-only status query).
    pub async fn active_players(&self) -> usize {
        self.registry.lock().await.active.len()
    }

    /// Allocates the lowest free slot number.
    ///
    /// The scan, the backend acquisition and the active-set insertion happen
    /// as one atomic step under the registry lock.
    ///
    /// # Errors
    ///
    /// - `SlotsExhausted` when all slots are occupied; the caller must
    ///   refuse the connection
    /// - Backend construction errors (`PermissionDenied`,
    ///   `BackendUnavailable`, `BackendUnsupported`); the slot stays free
    pub async fn allocate(&self, close_tx: CloseSender) -> Result<u8> {
        let mut registry = self.registry.lock().await;

        for number in 1..=self.max_players {
            if registry.active.contains_key(&number) {
                continue;
            }

            let gamepad = match registry.parked.remove(&number) {
                Some(gamepad) => {
                    debug!("reusing parked backend for player {}", number);
                    gamepad
                }
                None => (self.factory)(number)?,
            };

            registry.active.insert(
                number,
                PlayerSlot {
                    state: ControllerState::new(),
                    gamepad,
                    close_tx,
                },
            );
            info!(
                "allocated player slot {} ({}/{} active)",
                number,
                registry.active.len(),
                self.max_players
            );
            return Ok(number);
        }

        Err(PartyPadError::SlotsExhausted)
    }

    /// Applies a decoded batch to a player's state and backend, then commits
    /// the backend exactly once.
    ///
    /// Events are applied in order; an empty batch commits nothing.
    ///
    /// # Errors
    ///
    /// - `SlotNotActive` when the slot was released concurrently; the owning
    ///   session task must stop processing input
    /// - `BackendUnavailable` when the backend rejects a write; fatal to
    ///   this session only
    pub async fn apply_batch(&self, number: u8, events: &[InputEvent]) -> Result<()> {
        let mut registry = self.registry.lock().await;
        let slot = registry
            .active
            .get_mut(&number)
            .ok_or(PartyPadError::SlotNotActive(number))?;

        if events.is_empty() {
            return Ok(());
        }

        for &event in events {
            slot.state.apply(event);
            apply_event(slot.gamepad.as_mut(), event)?;
        }
        slot.gamepad.commit()
    }

    /// Releases a slot. Idempotent: releasing an inactive slot is a no-op.
    pub async fn release(&self, number: u8) {
        let mut registry = self.registry.lock().await;
        release_slot(&mut registry, number);
    }

    /// Releases every active slot, asking each session's transport to close
    /// first (operator reset / process shutdown).
    pub async fn release_all(&self) {
        let mut registry = self.registry.lock().await;

        let numbers: Vec<u8> = registry.active.keys().copied().collect();
        if numbers.is_empty() {
            return;
        }
        info!("releasing all {} active player slots", numbers.len());

        for number in numbers {
            if let Some(slot) = registry.active.get(&number) {
                // The transport owns the socket; ignore already-gone tasks.
                let _ = slot.close_tx.send(CloseReason::Reset);
            }
            release_slot(&mut registry, number);
        }
    }

    /// Clone of a player's current state, if active. Used by tests and
    /// diagnostics.
    pub async fn state_snapshot(&self, number: u8) -> Option<ControllerState> {
        self.registry
            .lock()
            .await
            .active
            .get(&number)
            .map(|slot| slot.state.clone())
    }
}

/// Drains and frees one slot. Must run under the registry lock.
///
/// The backend is reset to neutral and committed before the slot is freed; a
/// failing backend is dropped instead of parked so it can never prevent slot
/// reuse.
fn release_slot(registry: &mut Registry, number: u8) {
    let Some(mut slot) = registry.active.remove(&number) else {
        debug!("release of inactive slot {} ignored", number);
        return;
    };

    let reset = slot
        .gamepad
        .reset()
        .and_then(|()| slot.gamepad.commit());
    match reset {
        Ok(()) => {
            registry.parked.insert(number, slot.gamepad);
        }
        Err(e) => {
            warn!("backend reset failed while releasing slot {}: {}", number, e);
        }
    }

    info!("released player slot {}", number);
}
