//! Choice requests the battle engine sends to a player.

use crate::ids::{MoveId, MoveTarget, TeraType};

/// One move slot of an active Pokémon, as offered by a move request.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSlot {
    pub id: MoveId,
    pub target: MoveTarget,
    pub disabled: bool,
}

/// Per-active-slot data of a move request.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRequest {
    pub moves: Vec<MoveSlot>,
    /// Type this Pokémon may terastallize into this turn, if any.
    pub can_terastallize: Option<TeraType>,
    pub trapped: bool,
}

/// A team member as listed in the side part of a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPokemon {
    pub active: bool,
    pub fainted: bool,
    pub reviving: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideRequest {
    pub name: String,
    pub pokemon: Vec<RequestPokemon>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    /// One entry per active slot; `None` when that slot has nothing to do.
    pub active: Vec<Option<ActiveRequest>>,
    pub side: SideRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchRequest {
    /// One flag per active slot that must be replaced.
    pub force_switch: Vec<bool>,
    pub side: SideRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamPreviewRequest {
    pub side: SideRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceRequest {
    Move(MoveRequest),
    Switch(SwitchRequest),
    TeamPreview(TeamPreviewRequest),
}

impl ChoiceRequest {
    pub fn side(&self) -> &SideRequest {
        match self {
            ChoiceRequest::Move(r) => &r.side,
            ChoiceRequest::Switch(r) => &r.side,
            ChoiceRequest::TeamPreview(r) => &r.side,
        }
    }
}
