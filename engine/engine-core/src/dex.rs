//! Game library: the species and move tables that stable ids index into.

use std::collections::HashMap;

use crate::ids::{MoveId, MoveTarget, SpeciesId};

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub id: SpeciesId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveData {
    pub id: MoveId,
    pub name: String,
    pub target: MoveTarget,
}

/// Species and move tables. Ids are assigned densely in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dex {
    species: Vec<SpeciesData>,
    moves: Vec<MoveData>,
    species_by_name: HashMap<String, SpeciesId>,
    moves_by_name: HashMap<String, MoveId>,
}

impl Dex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a species, returning its id. Re-adding a name returns the existing id.
    pub fn add_species(&mut self, name: impl Into<String>) -> SpeciesId {
        let name = name.into();
        if let Some(id) = self.species_by_name.get(&name) {
            return *id;
        }
        let id = SpeciesId(self.species.len() as u16);
        self.species_by_name.insert(name.clone(), id);
        self.species.push(SpeciesData { id, name });
        id
    }

    /// Register a move, returning its id. Re-adding a name returns the existing id.
    pub fn add_move(&mut self, name: impl Into<String>, target: MoveTarget) -> MoveId {
        let name = name.into();
        if let Some(id) = self.moves_by_name.get(&name) {
            return *id;
        }
        let id = MoveId(self.moves.len() as u16);
        self.moves_by_name.insert(name.clone(), id);
        self.moves.push(MoveData { id, name, target });
        id
    }

    pub fn species(&self) -> &[SpeciesData] {
        &self.species
    }

    pub fn moves(&self) -> &[MoveData] {
        &self.moves
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn get_species(&self, id: SpeciesId) -> Option<&SpeciesData> {
        self.species.get(id.index())
    }

    pub fn get_move(&self, id: MoveId) -> Option<&MoveData> {
        self.moves.get(id.index())
    }

    pub fn species_id(&self, name: &str) -> Option<SpeciesId> {
        self.species_by_name.get(name).copied()
    }

    pub fn move_id(&self, name: &str) -> Option<MoveId> {
        self.moves_by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense() {
        let mut dex = Dex::new();
        let a = dex.add_species("Incineroar");
        let b = dex.add_species("Rillaboom");
        assert_eq!(a, SpeciesId(0));
        assert_eq!(b, SpeciesId(1));
        assert_eq!(dex.species_count(), 2);

        let m = dex.add_move("Fake Out", MoveTarget::Normal);
        assert_eq!(m, MoveId(0));
        assert_eq!(dex.get_move(m).map(|d| d.target), Some(MoveTarget::Normal));
    }

    #[test]
    fn test_duplicate_names_reuse_id() {
        let mut dex = Dex::new();
        let a = dex.add_species("Amoonguss");
        let again = dex.add_species("Amoonguss");
        assert_eq!(a, again);
        assert_eq!(dex.species_count(), 1);
        assert_eq!(dex.species_id("Amoonguss"), Some(a));
        assert_eq!(dex.species_id("Missing"), None);
    }
}
