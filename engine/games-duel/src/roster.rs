//! Species, moves and teams of the toy battle.

use engine_core::{Dex, MoveId, MoveTarget, SpeciesId, TeraType};
use serde_json::{json, Map, Value};

/// A [`Dex`] plus the base power of every move.
#[derive(Debug, Clone, Default)]
pub struct DuelDex {
    dex: Dex,
    power: Vec<u32>,
}

impl DuelDex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_species(&mut self, name: &str) -> SpeciesId {
        self.dex.add_species(name)
    }

    pub fn add_move(&mut self, name: &str, target: MoveTarget, power: u32) -> MoveId {
        let id = self.dex.add_move(name, target);
        if id.index() == self.power.len() {
            self.power.push(power);
        }
        id
    }

    pub fn dex(&self) -> &Dex {
        &self.dex
    }

    /// Base power; 0 for status moves and unknown ids.
    pub fn power(&self, id: MoveId) -> u32 {
        self.power.get(id.index()).copied().unwrap_or(0)
    }

    pub fn target(&self, id: MoveId) -> MoveTarget {
        self.dex
            .get_move(id)
            .map(|m| m.target)
            .unwrap_or(MoveTarget::Normal)
    }

    /// A handful of doubles regulars with simplified moves.
    pub fn standard() -> Self {
        let mut d = Self::new();
        for name in [
            "Incineroar",
            "Rillaboom",
            "Amoonguss",
            "Flutter Mane",
            "Urshifu",
            "Tornadus",
        ] {
            d.add_species(name);
        }
        d.add_move("Fake Out", MoveTarget::Normal, 20);
        d.add_move("Flare Blitz", MoveTarget::Normal, 60);
        d.add_move("Wood Hammer", MoveTarget::Normal, 60);
        d.add_move("Grassy Glide", MoveTarget::Normal, 40);
        d.add_move("Spore", MoveTarget::Normal, 0);
        d.add_move("Pollen Puff", MoveTarget::Normal, 50);
        d.add_move("Moonblast", MoveTarget::Normal, 55);
        d.add_move("Dazzling Gleam", MoveTarget::AllAdjacentFoes, 45);
        d.add_move("Surging Strikes", MoveTarget::Normal, 65);
        d.add_move("Close Combat", MoveTarget::Normal, 70);
        d.add_move("Bleakwind Storm", MoveTarget::AllAdjacentFoes, 45);
        d.add_move("Tailwind", MoveTarget::AllySide, 0);
        d.add_move("Helping Hand", MoveTarget::AdjacentAlly, 0);
        d.add_move("Protect", MoveTarget::User, 0);
        d
    }

    /// Vocabulary JSON covering every species and move of this dex, in the
    /// format the search loads.
    pub fn vocabulary_json(&self) -> String {
        let mut species = Map::new();
        species.insert("<pad>".to_string(), json!(0));
        species.insert("<unknown>".to_string(), json!(1));
        for s in self.dex.species() {
            let next = species.len();
            species.insert(s.name.clone(), json!(next));
        }

        let mut actions = Map::new();
        for reserved in ["<pad>", "<none>", "<cant>"] {
            let next = actions.len();
            actions.insert(reserved.to_string(), json!(next));
        }
        for m in self.dex.moves() {
            let next = actions.len();
            actions.insert(format!("move:{}", m.name), json!(next));
        }
        for s in self.dex.species() {
            let next = actions.len();
            actions.insert(format!("switch:{}", s.name), json!(next));
        }

        let num_species = species.len();
        let num_actions = actions.len();
        json!({
            "species": Value::Object(species),
            "actions": Value::Object(actions),
            "num_species": num_species,
            "num_actions": num_actions,
        })
        .to_string()
    }
}

/// One team member as brought to the battle.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub species: SpeciesId,
    pub max_hp: u32,
    pub speed: u32,
    pub moves: Vec<MoveId>,
    pub tera: TeraType,
}

/// A player name and team.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSetup {
    pub name: String,
    pub team: Vec<TeamMember>,
}

fn member(
    dex: &DuelDex,
    species: &str,
    max_hp: u32,
    speed: u32,
    moves: &[&str],
    tera: TeraType,
) -> TeamMember {
    TeamMember {
        species: dex.dex().species_id(species).unwrap_or(SpeciesId(0)),
        max_hp,
        speed,
        moves: moves.iter().filter_map(|m| dex.dex().move_id(m)).collect(),
        tera,
    }
}

/// Two three-member teams built from [`DuelDex::standard`].
pub fn standard_teams(dex: &DuelDex) -> [SideSetup; 2] {
    let alice = vec![
        member(
            dex,
            "Incineroar",
            200,
            60,
            &["Fake Out", "Flare Blitz", "Helping Hand", "Protect"],
            TeraType::Ghost,
        ),
        member(
            dex,
            "Rillaboom",
            190,
            85,
            &["Fake Out", "Wood Hammer", "Grassy Glide", "Protect"],
            TeraType::Fire,
        ),
        member(
            dex,
            "Amoonguss",
            220,
            30,
            &["Spore", "Pollen Puff", "Protect"],
            TeraType::Water,
        ),
    ];
    let bob = vec![
        member(
            dex,
            "Flutter Mane",
            130,
            135,
            &["Moonblast", "Dazzling Gleam", "Protect"],
            TeraType::Fairy,
        ),
        member(
            dex,
            "Urshifu",
            175,
            97,
            &["Surging Strikes", "Close Combat", "Protect"],
            TeraType::Water,
        ),
        member(
            dex,
            "Tornadus",
            160,
            111,
            &["Bleakwind Storm", "Tailwind", "Protect"],
            TeraType::Flying,
        ),
    ];
    [
        SideSetup {
            name: "Alice".to_string(),
            team: alice,
        },
        SideSetup {
            name: "Bob".to_string(),
            team: bob,
        },
    ]
}
