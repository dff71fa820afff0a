//! One-sided, hidden-information-respecting view of a battle.
//!
//! A perspective is what a player is allowed to see: its own side in full
//! and whatever has been revealed about the opponent.

use std::collections::HashMap;

use crate::ids::{SideCondition, SpeciesId, Status, TeraType, Terrain, Weather};

/// Stat stage modifiers, each in -6..=6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boosts {
    pub atk: i8,
    pub def: i8,
    pub spa: i8,
    pub spd: i8,
    pub spe: i8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PokemonPerspective {
    pub species: SpeciesId,
    pub hp: u32,
    pub max_hp: u32,
    pub fainted: bool,
    pub status: Option<Status>,
    pub boosts: Boosts,
    pub terastallized: Option<TeraType>,
    pub is_active: bool,
}

impl PokemonPerspective {
    /// A healthy, unboosted Pokémon at full HP.
    pub fn new(species: SpeciesId, max_hp: u32) -> Self {
        Self {
            species,
            hp: max_hp,
            max_hp,
            fainted: false,
            status: None,
            boosts: Boosts::default(),
            terastallized: None,
            is_active: false,
        }
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            0.0
        } else {
            self.hp as f32 / self.max_hp as f32
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SidePerspective {
    pub name: String,
    /// Active slots in position order; `None` for an empty slot.
    pub active: Vec<Option<PokemonPerspective>>,
    /// Whole team in team order, active members included.
    pub pokemon: Vec<PokemonPerspective>,
    /// Side conditions with their remaining duration, if known.
    pub side_conditions: HashMap<SideCondition, Option<u8>>,
}

impl SidePerspective {
    pub fn active_slot(&self, slot: usize) -> Option<&PokemonPerspective> {
        self.active.get(slot).and_then(|p| p.as_ref())
    }

    pub fn has_condition(&self, condition: SideCondition) -> bool {
        self.side_conditions.contains_key(&condition)
    }

    /// First `limit` team members that are not currently active.
    pub fn bench(&self, limit: usize) -> Vec<&PokemonPerspective> {
        self.pokemon
            .iter()
            .filter(|p| !p.is_active)
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPerspective {
    pub weather: Option<Weather>,
    pub terrain: Option<Terrain>,
    pub trick_room: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perspective {
    pub player_side: SidePerspective,
    pub opponent_side: SidePerspective,
    pub field: FieldPerspective,
    pub turn: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hp_fraction() {
        let mut p = PokemonPerspective::new(SpeciesId(3), 200);
        p.hp = 50;
        assert!((p.hp_fraction() - 0.25).abs() < 1e-6);

        let zero = PokemonPerspective::new(SpeciesId(3), 0);
        assert_eq!(zero.hp_fraction(), 0.0);
    }

    #[test]
    fn test_bench_skips_active() {
        let mut side = SidePerspective::default();
        for i in 0..4 {
            let mut p = PokemonPerspective::new(SpeciesId(i), 100);
            p.is_active = i == 0 || i == 2;
            side.pokemon.push(p);
        }
        let bench = side.bench(2);
        assert_eq!(bench.len(), 2);
        assert_eq!(bench[0].species, SpeciesId(1));
        assert_eq!(bench[1].species, SpeciesId(3));
    }
}
