//! Core types shared between the battle engine and the search.
//!
//! This crate provides the contracts the MCTS engine consumes:
//! - `Battle`: clone / choose / advance / inspect operations on a battle
//! - `Perspective`: the one-sided view used as model input
//! - `ChoiceRequest`: what the engine asks a player to decide
//! - `Choice`: what a player submits back
//! - `Dex`: the species and move tables stable ids refer to

pub mod battle;
pub mod choice;
pub mod dex;
pub mod ids;
pub mod perspective;
pub mod request;

// Re-export main types for convenience
pub use battle::{Battle, BattleError};
pub use choice::{Choice, ChosenAction};
pub use dex::{Dex, MoveData, SpeciesData};
pub use ids::{
    MoveId, MoveTarget, SideCondition, SideId, SpeciesId, Status, TeraType, Terrain, Weather,
};
pub use perspective::{Boosts, FieldPerspective, Perspective, PokemonPerspective, SidePerspective};
pub use request::{
    ActiveRequest, ChoiceRequest, MoveRequest, MoveSlot, RequestPokemon, SideRequest,
    SwitchRequest, TeamPreviewRequest,
};
