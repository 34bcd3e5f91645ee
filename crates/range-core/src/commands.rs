//! Player commands sent from the input host to the simulation.
//!
//! Commands are queued and applied at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Aim and movement ---
    /// Relative look motion in pixels.
    Look { dx: f64, dy: f64, source: LookSource },
    /// Held movement axes (-1, 0 or 1), applied every tick until changed.
    SetMovement { forward: i8, strafe: i8 },

    // --- Weapons ---
    /// Trigger pressed: starts a burst with the held weapon.
    FirePressed,
    /// Trigger released: re-arms the trigger for the next burst.
    FireReleased,
    /// Reload the held weapon.
    Reload,
    /// Select a specific weapon.
    SwitchWeapon { weapon: WeaponKind },
    /// Swap to the other weapon.
    ToggleWeapon,
    /// Throw a grenade along the aim direction.
    ThrowGrenade,

    // --- Flow ---
    /// Leave the intro or the between-rounds screen.
    Continue,
}
