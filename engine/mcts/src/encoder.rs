//! Perspective to tensor encoding.
//!
//! The layout below is a fixed contract with the trained network. Offsets,
//! slot order and the normalization constants must not change without
//! retraining.
//!
//! ```text
//! numeric[0..140]    4 active blocks of 35   (my A, my B, opp A, opp B)
//! numeric[140..180]  4 bench blocks of 10    (my 1, my 2, opp 1, opp 2)
//! numeric[180..200]  field block of 20
//!
//! species_ids        my A, my B, opp A, opp B, my bench 1, my bench 2,
//!                    opp bench 1, opp bench 2
//! ```

use std::sync::Arc;

use engine_core::{
    FieldPerspective, Perspective, PokemonPerspective, SideCondition, SidePerspective, Status,
    TeraType, Terrain, Weather,
};

use crate::vocab::{Vocabulary, PAD_INDEX};

pub const NUM_SPECIES_SLOTS: usize = 8;
pub const ACTIVE_DIM: usize = 35;
pub const BENCH_DIM: usize = 10;
pub const FIELD_DIM: usize = 20;
pub const NUMERIC_DIM: usize = 4 * ACTIVE_DIM + 4 * BENCH_DIM + FIELD_DIM;

const BENCH_OFFSET: usize = 4 * ACTIVE_DIM;
const FIELD_OFFSET: usize = BENCH_OFFSET + 4 * BENCH_DIM;

const BOOST_SCALE: f32 = 6.0;
const TURN_SCALE: f32 = 20.0;

/// Model input for one perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedState {
    pub species_ids: [i64; NUM_SPECIES_SLOTS],
    pub numeric: [f32; NUMERIC_DIM],
}

impl Default for EncodedState {
    fn default() -> Self {
        Self {
            species_ids: [PAD_INDEX as i64; NUM_SPECIES_SLOTS],
            numeric: [0.0; NUMERIC_DIM],
        }
    }
}

#[derive(Debug, Clone)]
pub struct StateEncoder {
    vocab: Arc<Vocabulary>,
}

impl StateEncoder {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Encode `perspective`. Never fails: missing Pokémon produce zero blocks
    /// and padded species slots.
    pub fn encode(&self, perspective: &Perspective) -> EncodedState {
        let mut out = EncodedState::default();
        let me = &perspective.player_side;
        let opp = &perspective.opponent_side;

        let actives = [
            me.active_slot(0),
            me.active_slot(1),
            opp.active_slot(0),
            opp.active_slot(1),
        ];
        for (i, p) in actives.iter().enumerate() {
            out.species_ids[i] = self.species_slot(*p);
            if let Some(p) = p {
                encode_active(&mut out.numeric[i * ACTIVE_DIM..(i + 1) * ACTIVE_DIM], p);
            }
        }

        let my_bench = me.bench(2);
        let opp_bench = opp.bench(2);
        let benches = [
            my_bench.first().copied(),
            my_bench.get(1).copied(),
            opp_bench.first().copied(),
            opp_bench.get(1).copied(),
        ];
        for (i, p) in benches.iter().enumerate() {
            out.species_ids[4 + i] = self.species_slot(*p);
            if let Some(p) = p {
                let off = BENCH_OFFSET + i * BENCH_DIM;
                encode_bench(&mut out.numeric[off..off + BENCH_DIM], p);
            }
        }

        encode_field(
            &mut out.numeric[FIELD_OFFSET..FIELD_OFFSET + FIELD_DIM],
            &perspective.field,
            me,
            opp,
            perspective.turn,
        );

        out
    }

    fn species_slot(&self, p: Option<&PokemonPerspective>) -> i64 {
        match p {
            Some(p) => self.vocab.species_index(p.species) as i64,
            None => PAD_INDEX as i64,
        }
    }
}

fn encode_active(feat: &mut [f32], p: &PokemonPerspective) {
    feat[0] = p.hp_fraction();
    feat[1] = if p.fainted { 1.0 } else { 0.0 };
    feat[2 + status_index(p.status)] = 1.0;

    feat[9] = p.boosts.atk as f32 / BOOST_SCALE;
    feat[10] = p.boosts.def as f32 / BOOST_SCALE;
    feat[11] = p.boosts.spa as f32 / BOOST_SCALE;
    feat[12] = p.boosts.spd as f32 / BOOST_SCALE;
    feat[13] = p.boosts.spe as f32 / BOOST_SCALE;

    // [15..35]: slot 0 is "not terastallized", 1..=19 the tera types
    match p.terastallized {
        Some(t) => {
            feat[14] = 1.0;
            feat[15 + tera_index(t)] = 1.0;
        }
        None => feat[15] = 1.0,
    }
}

fn encode_bench(feat: &mut [f32], p: &PokemonPerspective) {
    feat[0] = p.hp_fraction();
    feat[1] = if p.fainted { 1.0 } else { 0.0 };
    feat[2 + status_index(p.status)] = 1.0;
    feat[9] = 1.0;
}

fn encode_field(
    feat: &mut [f32],
    field: &FieldPerspective,
    me: &SidePerspective,
    opp: &SidePerspective,
    turn: u32,
) {
    feat[weather_index(field.weather)] = 1.0;
    feat[5 + terrain_index(field.terrain)] = 1.0;
    if field.trick_room {
        feat[10] = 1.0;
    }

    let paired = [
        SideCondition::Tailwind,
        SideCondition::Reflect,
        SideCondition::LightScreen,
        SideCondition::AuroraVeil,
    ];
    for (i, condition) in paired.iter().enumerate() {
        feat[11 + 2 * i] = flag(me.has_condition(*condition));
        feat[12 + 2 * i] = flag(opp.has_condition(*condition));
    }

    feat[19] = turn as f32 / TURN_SCALE;
}

#[inline]
fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn status_index(status: Option<Status>) -> usize {
    match status {
        None => 0,
        Some(Status::Paralysis) => 1,
        Some(Status::Burn) => 2,
        Some(Status::Sleep) => 3,
        Some(Status::Poison) => 4,
        Some(Status::Toxic) => 5,
        Some(Status::Freeze) => 6,
    }
}

/// 0 = clear or unmodelled weather.
fn weather_index(weather: Option<Weather>) -> usize {
    match weather {
        Some(Weather::SunnyDay | Weather::DesolateLand) => 1,
        Some(Weather::RainDance | Weather::PrimordialSea) => 2,
        Some(Weather::Sandstorm) => 3,
        Some(Weather::Snowscape) => 4,
        Some(Weather::DeltaStream) | None => 0,
    }
}

fn terrain_index(terrain: Option<Terrain>) -> usize {
    match terrain {
        None => 0,
        Some(Terrain::Electric) => 1,
        Some(Terrain::Grassy) => 2,
        Some(Terrain::Psychic) => 3,
        Some(Terrain::Misty) => 4,
    }
}

#[inline]
fn tera_index(t: TeraType) -> usize {
    t as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{Boosts, Dex, MoveTarget, SpeciesId};

    fn setup() -> (Dex, StateEncoder) {
        let mut dex = Dex::new();
        for name in ["Incineroar", "Rillaboom", "Flutter Mane", "Amoonguss", "Urshifu"] {
            dex.add_species(name);
        }
        dex.add_move("Fake Out", MoveTarget::Normal);
        let json = r#"{
            "species": {"<pad>": 0, "<unknown>": 1, "Incineroar": 2, "Rillaboom": 3,
                        "Flutter Mane": 4, "Amoonguss": 5},
            "actions": {"<pad>": 0, "<none>": 1, "<cant>": 2},
            "num_species": 6,
            "num_actions": 3
        }"#;
        let vocab = Vocabulary::from_json_str(json, &dex).unwrap();
        (dex, StateEncoder::new(Arc::new(vocab)))
    }

    fn mon(dex: &Dex, name: &str, active: bool) -> PokemonPerspective {
        let mut p = PokemonPerspective::new(dex.species_id(name).unwrap(), 100);
        p.is_active = active;
        p
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(NUMERIC_DIM, 200);
        assert_eq!(BENCH_OFFSET, 140);
        assert_eq!(FIELD_OFFSET, 180);
    }

    #[test]
    fn test_empty_perspective() {
        let (_, encoder) = setup();
        let enc = encoder.encode(&Perspective::default());

        assert_eq!(enc.species_ids, [PAD_INDEX as i64; NUM_SPECIES_SLOTS]);
        // Only the "no weather" and "no terrain" one-hots are set.
        let set: Vec<usize> = (0..NUMERIC_DIM).filter(|&i| enc.numeric[i] != 0.0).collect();
        assert_eq!(set, vec![FIELD_OFFSET, FIELD_OFFSET + 5]);
    }

    #[test]
    fn test_active_block() {
        let (dex, encoder) = setup();
        let mut p = mon(&dex, "Incineroar", true);
        p.hp = 25;
        p.status = Some(Status::Burn);
        p.boosts = Boosts {
            atk: -1,
            def: 0,
            spa: 0,
            spd: 2,
            spe: 6,
        };

        let mut perspective = Perspective::default();
        perspective.player_side.active = vec![Some(p.clone()), None];
        perspective.player_side.pokemon = vec![p];

        let enc = encoder.encode(&perspective);
        assert_eq!(enc.species_ids[0], 2);
        assert_eq!(enc.species_ids[1], PAD_INDEX as i64);

        let block = &enc.numeric[0..ACTIVE_DIM];
        assert!((block[0] - 0.25).abs() < 1e-6);
        assert_eq!(block[1], 0.0);
        assert_eq!(block[2 + 2], 1.0);
        assert_eq!(block[2..9].iter().sum::<f32>(), 1.0);
        assert!((block[9] + 1.0 / 6.0).abs() < 1e-6);
        assert!((block[12] - 2.0 / 6.0).abs() < 1e-6);
        assert!((block[13] - 1.0).abs() < 1e-6);
        assert_eq!(block[14], 0.0);
        assert_eq!(block[15], 1.0);

        // Slot B is empty.
        assert!(enc.numeric[ACTIVE_DIM..2 * ACTIVE_DIM].iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_terastallized() {
        let (dex, encoder) = setup();
        let mut p = mon(&dex, "Flutter Mane", true);
        p.terastallized = Some(TeraType::Fairy);

        let mut perspective = Perspective::default();
        perspective.opponent_side.active = vec![None, Some(p)];

        let enc = encoder.encode(&perspective);
        assert_eq!(enc.species_ids[3], 4);

        let off = 3 * ACTIVE_DIM;
        assert_eq!(enc.numeric[off + 14], 1.0);
        assert_eq!(enc.numeric[off + 15], 0.0);
        assert_eq!(enc.numeric[off + 15 + TeraType::Fairy as usize + 1], 1.0);
    }

    #[test]
    fn test_bench_and_unknown_species() {
        let (dex, encoder) = setup();
        let active = mon(&dex, "Incineroar", true);
        let mut fainted = mon(&dex, "Rillaboom", false);
        fainted.hp = 0;
        fainted.fainted = true;
        let unknown = mon(&dex, "Urshifu", false);
        let third = mon(&dex, "Amoonguss", false);

        let mut perspective = Perspective::default();
        perspective.player_side.active = vec![Some(active.clone())];
        perspective.player_side.pokemon = vec![active, fainted, unknown, third];

        let enc = encoder.encode(&perspective);
        assert_eq!(enc.species_ids[4], 3);
        assert_eq!(enc.species_ids[5], 1);
        assert_eq!(enc.species_ids[6], PAD_INDEX as i64);

        let b0 = &enc.numeric[BENCH_OFFSET..BENCH_OFFSET + BENCH_DIM];
        assert_eq!(b0[0], 0.0);
        assert_eq!(b0[1], 1.0);
        assert_eq!(b0[2], 1.0);
        assert_eq!(b0[9], 1.0);

        let b1 = &enc.numeric[BENCH_OFFSET + BENCH_DIM..BENCH_OFFSET + 2 * BENCH_DIM];
        assert_eq!(b1[0], 1.0);
        assert_eq!(b1[9], 1.0);

        // Opponent bench blocks stay empty, including the presence flag.
        assert!(enc.numeric[BENCH_OFFSET + 2 * BENCH_DIM..FIELD_OFFSET]
            .iter()
            .all(|&x| x == 0.0));
    }

    #[test]
    fn test_field_block() {
        let (_, encoder) = setup();
        let mut perspective = Perspective::default();
        perspective.field.weather = Some(Weather::PrimordialSea);
        perspective.field.terrain = Some(Terrain::Psychic);
        perspective.field.trick_room = true;
        perspective
            .player_side
            .side_conditions
            .insert(SideCondition::Tailwind, Some(3));
        perspective
            .opponent_side
            .side_conditions
            .insert(SideCondition::AuroraVeil, None);
        perspective
            .opponent_side
            .side_conditions
            .insert(SideCondition::StealthRock, None);
        perspective.turn = 5;

        let enc = encoder.encode(&perspective);
        let field = &enc.numeric[FIELD_OFFSET..];
        assert_eq!(field[..5], [0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(field[5..10], [0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(field[10], 1.0);
        assert_eq!(field[11..19], [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert!((field[19] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let (dex, encoder) = setup();
        let mut perspective = Perspective::default();
        perspective.player_side.active = vec![Some(mon(&dex, "Amoonguss", true))];
        perspective.opponent_side.pokemon = vec![PokemonPerspective::new(SpeciesId(42), 10)];

        assert_eq!(encoder.encode(&perspective), encoder.encode(&perspective));
    }
}
