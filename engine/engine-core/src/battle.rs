//! The battle engine operations the search relies on.
//!
//! The search never looks inside a battle. It only clones it, feeds it
//! choices, advances it by one turn and reads back the outcome or a fresh
//! perspective. Every state-changing call may fail.

use thiserror::Error;

use crate::choice::Choice;
use crate::ids::SideId;
use crate::perspective::Perspective;

#[derive(Debug, Error)]
pub enum BattleError {
    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("Invalid choice for {side:?}: {reason}")]
    InvalidChoice { side: SideId, reason: String },

    #[error("Turn could not be resolved: {0}")]
    TurnFailed(String),

    #[error("Battle is already over")]
    AlreadyEnded,
}

pub trait Battle {
    /// Deep clone of the authoritative state.
    fn copy(&self) -> Result<Self, BattleError>
    where
        Self: Sized;

    /// Record `side`'s choice for the pending turn.
    fn choose(&mut self, side: SideId, choice: &Choice) -> Result<(), BattleError>;

    /// Let the engine pick a default choice for `side`.
    fn auto_choose(&mut self, side: SideId) -> Result<(), BattleError>;

    /// Resolve the pending turn once both sides have chosen.
    fn commit_choices(&mut self) -> Result<(), BattleError>;

    fn ended(&self) -> bool;

    /// Name of the winning player; `None` while running or on a tie.
    fn winner_name(&self) -> Option<&str>;

    fn perspective(&self, side: SideId) -> Result<Perspective, BattleError>;
}
