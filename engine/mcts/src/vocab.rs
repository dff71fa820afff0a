//! Action and species vocabulary shared with the trained model.
//!
//! The vocabulary maps stable game identifiers to the fixed integer positions
//! the network was trained on. It is loaded once from the model's companion
//! JSON file and never mutated afterwards.
//!
//! # File Format
//!
//! ```json
//! {
//!   "species": { "<pad>": 0, "<unknown>": 1, "Incineroar": 2 },
//!   "actions": { "<pad>": 0, "<none>": 1, "<cant>": 2, "move:Fake Out": 3, "switch:Incineroar": 4 },
//!   "num_species": 3,
//!   "num_actions": 5
//! }
//! ```
//!
//! Every lookup is total: identifiers the model never saw map to the
//! reserved unknown/none indices instead of failing.

use std::collections::HashMap;
use std::path::Path;

use engine_core::{Dex, MoveId, SpeciesId};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Padding index for empty species slots and unused action positions.
pub const PAD_INDEX: usize = 0;
/// Species the model has no embedding for.
pub const UNKNOWN_SPECIES_INDEX: usize = 1;
/// The "no-op" action.
pub const NONE_ACTION_INDEX: usize = 1;
/// The "could not act" action.
pub const CANT_ACTION_INDEX: usize = 2;

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("Failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed vocabulary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Action '{key}' has index {index}, outside 0..{num_actions}")]
    ActionIndexOutOfRange {
        key: String,
        index: usize,
        num_actions: usize,
    },

    #[error("Species '{name}' has index {index}, outside 0..{num_species}")]
    SpeciesIndexOutOfRange {
        name: String,
        index: usize,
        num_species: usize,
    },
}

#[derive(Debug, Deserialize)]
struct VocabFile {
    species: HashMap<String, usize>,
    actions: HashMap<String, usize>,
    num_species: usize,
    num_actions: usize,
}

/// Immutable species/action vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    num_species: usize,
    num_actions: usize,
    species_by_name: HashMap<String, usize>,
    actions_by_key: HashMap<String, usize>,
    action_keys: Vec<String>,
    /// SpeciesId -> species index
    species_lookup: Vec<usize>,
    /// MoveId -> action index
    move_lookup: Vec<usize>,
    /// SpeciesId -> switch action index
    switch_lookup: Vec<usize>,
}

impl Vocabulary {
    /// Load the vocabulary file at `path`, resolving dex ids against it.
    pub fn load<P: AsRef<Path>>(path: P, dex: &Dex) -> Result<Self, VocabError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let vocab = Self::from_json_str(&json, dex)?;
        info!(
            path = %path.display(),
            num_species = vocab.num_species,
            num_actions = vocab.num_actions,
            "Vocabulary loaded"
        );
        Ok(vocab)
    }

    /// Parse a vocabulary from its JSON text.
    pub fn from_json_str(json: &str, dex: &Dex) -> Result<Self, VocabError> {
        let file: VocabFile = serde_json::from_str(json)?;
        Self::build(file, dex)
    }

    fn build(file: VocabFile, dex: &Dex) -> Result<Self, VocabError> {
        let out_of_range = file
            .species
            .iter()
            .find(|&(_, &i)| i >= file.num_species);
        if let Some((name, &index)) = out_of_range {
            return Err(VocabError::SpeciesIndexOutOfRange {
                name: name.clone(),
                index,
                num_species: file.num_species,
            });
        }

        let mut action_keys = vec![String::new(); file.num_actions];
        for (key, &index) in &file.actions {
            match action_keys.get_mut(index) {
                Some(slot) => *slot = key.clone(),
                None => {
                    return Err(VocabError::ActionIndexOutOfRange {
                        key: key.clone(),
                        index,
                        num_actions: file.num_actions,
                    })
                }
            }
        }

        let mut species_lookup = vec![UNKNOWN_SPECIES_INDEX; dex.species_count()];
        let mut switch_lookup = vec![NONE_ACTION_INDEX; dex.species_count()];
        for species in dex.species() {
            if let Some(&idx) = file.species.get(&species.name) {
                species_lookup[species.id.index()] = idx;
            }
            if let Some(&idx) = file.actions.get(&format!("switch:{}", species.name)) {
                switch_lookup[species.id.index()] = idx;
            }
        }

        let mut move_lookup = vec![NONE_ACTION_INDEX; dex.move_count()];
        for mv in dex.moves() {
            if let Some(&idx) = file.actions.get(&format!("move:{}", mv.name)) {
                move_lookup[mv.id.index()] = idx;
            }
        }

        let unmapped_moves = move_lookup
            .iter()
            .filter(|&&i| i == NONE_ACTION_INDEX)
            .count();
        debug!(
            species = dex.species_count(),
            moves = dex.move_count(),
            unmapped_moves,
            "Built vocabulary lookup tables"
        );

        Ok(Self {
            num_species: file.num_species,
            num_actions: file.num_actions,
            species_by_name: file.species,
            actions_by_key: file.actions,
            action_keys,
            species_lookup,
            move_lookup,
            switch_lookup,
        })
    }

    #[inline]
    pub fn num_species(&self) -> usize {
        self.num_species
    }

    /// Size of each policy head.
    #[inline]
    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Species embedding index, `UNKNOWN_SPECIES_INDEX` when unmapped.
    #[inline]
    pub fn species_index(&self, id: SpeciesId) -> usize {
        self.species_lookup
            .get(id.index())
            .copied()
            .unwrap_or(UNKNOWN_SPECIES_INDEX)
    }

    /// Policy index of a move, `NONE_ACTION_INDEX` when unmapped.
    #[inline]
    pub fn move_action_index(&self, id: MoveId) -> usize {
        self.move_lookup
            .get(id.index())
            .copied()
            .unwrap_or(NONE_ACTION_INDEX)
    }

    /// Policy index of switching to `species`, `NONE_ACTION_INDEX` when unmapped.
    #[inline]
    pub fn switch_action_index(&self, species: SpeciesId) -> usize {
        self.switch_lookup
            .get(species.index())
            .copied()
            .unwrap_or(NONE_ACTION_INDEX)
    }

    /// Species index by canonical name.
    pub fn species_index_by_name(&self, name: &str) -> Option<usize> {
        self.species_by_name.get(name).copied()
    }

    /// Human-readable key of a policy index, for logging.
    pub fn action_key(&self, index: usize) -> String {
        match self.action_keys.get(index) {
            Some(key) => key.clone(),
            None => format!("<out-of-range:{}>", index),
        }
    }

    pub fn try_action_index(&self, key: &str) -> Option<usize> {
        self.actions_by_key.get(key).copied()
    }
}
