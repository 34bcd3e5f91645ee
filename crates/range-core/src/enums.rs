//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Weapon kinds the player can carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Three-round burst, single bullet per shot, with drop.
    #[default]
    Pistol,
    /// Single shell per trigger press, five-pellet spread.
    Shotgun,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Pistol, WeaponKind::Shotgun];

    /// The other weapon (for the toggle binding).
    pub fn toggled(self) -> Self {
        match self {
            WeaponKind::Pistol => WeaponKind::Shotgun,
            WeaponKind::Shotgun => WeaponKind::Pistol,
        }
    }

    /// Stable index into per-weapon tables.
    pub fn index(self) -> usize {
        match self {
            WeaponKind::Pistol => 0,
            WeaponKind::Shotgun => 1,
        }
    }
}

/// What the held weapon is currently doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponActivity {
    #[default]
    Idle,
    /// A burst is in progress.
    Firing,
    /// A reload is in progress (blocks firing).
    Reloading,
}

/// Source of a look delta. Each source has its own sensitivity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookSource {
    /// Relative pointer motion while the pointer is locked.
    #[default]
    PointerLock,
    /// Mouse-drag fallback when pointer lock is unavailable.
    Drag,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first input.
    #[default]
    Intro,
    /// A round is being played.
    Round,
    /// Between rounds, waiting for the player to continue.
    RoundEnd,
    /// All rounds played; credits roll.
    GameOver,
}
