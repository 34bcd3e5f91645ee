//! Rejected-action categories.
//!
//! None of these are fatal: the engine treats every rejection as a no-op.

use thiserror::Error;

use crate::enums::{GamePhase, WeaponKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("{0:?} magazine is empty")]
    InsufficientAmmo(WeaponKind),
    #[error("{0:?} does not need a reload (magazine full or reserve empty)")]
    ReloadNotNeeded(WeaponKind),
    #[error("a reload is already in progress")]
    ReloadInProgress,
    #[error("trigger must be released before the next burst")]
    TriggerNotReset,
    #[error("round index {0} is past the last round")]
    InvalidRoundIndex(usize),
    #[error("no grenades left")]
    NoGrenades,
    #[error("action not available during {0:?}")]
    WrongPhase(GamePhase),
}
