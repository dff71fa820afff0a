//! A small deterministic battle implementing the engine-core `Battle` trait.
//!
//! This crate is the reference battle the search is tested and benchmarked
//! against. The rules are deliberately tiny:
//!
//! - Moves deal their base power as damage (x1.5 once terastallized);
//!   spread moves deal 3/4 of it to every foe.
//! - Switches happen before moves; moves go in speed order, ties broken by
//!   side then slot.
//! - A fainted active Pokémon is replaced by the first healthy bench member
//!   at the end of the turn.
//! - A side with nothing left standing loses. Reaching the turn limit, or
//!   both sides fainting together, is a tie.
//!
//! # Usage
//!
//! ```rust
//! use engine_core::{Battle, SideId};
//! use games_duel::{DuelBattle, Format};
//!
//! let mut battle = DuelBattle::standard(Format::Doubles);
//! battle.auto_choose(SideId::P1).unwrap();
//! battle.auto_choose(SideId::P2).unwrap();
//! battle.commit_choices().unwrap();
//! assert_eq!(battle.turn(), 1);
//! ```

use std::cmp::Reverse;
use std::sync::Arc;

use engine_core::{
    ActiveRequest, Battle, BattleError, Choice, ChoiceRequest, ChosenAction, MoveId, MoveRequest,
    MoveSlot, MoveTarget, Perspective, PokemonPerspective, RequestPokemon, SideId, SidePerspective,
    SideRequest, SpeciesId, TeraType,
};
use tracing::debug;

pub mod roster;

pub use roster::{standard_teams, DuelDex, SideSetup, TeamMember};

pub const DEFAULT_TURN_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Singles,
    Doubles,
}

impl Format {
    pub fn active_per_side(self) -> usize {
        match self {
            Format::Singles => 1,
            Format::Doubles => 2,
        }
    }
}

#[derive(Debug, Clone)]
struct Mon {
    info: TeamMember,
    hp: u32,
    fainted: bool,
    terastallized: Option<TeraType>,
}

impl Mon {
    fn new(info: TeamMember) -> Self {
        Self {
            hp: info.max_hp,
            info,
            fainted: false,
            terastallized: None,
        }
    }

    fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.fainted = true;
        }
    }
}

#[derive(Debug, Clone)]
struct Side {
    name: String,
    team: Vec<Mon>,
    /// Team index per active slot.
    active: Vec<Option<usize>>,
    tera_used: bool,
}

impl Side {
    fn new(setup: SideSetup, slots: usize) -> Self {
        let team: Vec<Mon> = setup.team.into_iter().map(Mon::new).collect();
        let active = (0..slots)
            .map(|i| if i < team.len() { Some(i) } else { None })
            .collect();
        Self {
            name: setup.name,
            team,
            active,
            tera_used: false,
        }
    }

    fn active_mon(&self, slot: usize) -> Option<&Mon> {
        self.active
            .get(slot)
            .copied()
            .flatten()
            .map(|i| &self.team[i])
            .filter(|m| !m.fainted)
    }

    fn is_active(&self, index: usize) -> bool {
        self.active.contains(&Some(index))
    }

    fn all_fainted(&self) -> bool {
        self.team.iter().all(|m| m.fainted)
    }

    fn next_replacement(&self) -> Option<usize> {
        (0..self.team.len()).find(|&i| !self.team[i].fainted && !self.is_active(i))
    }
}

/// One queued move, resolved in speed order.
struct QueuedMove {
    speed: u32,
    side: usize,
    slot: usize,
    move_id: MoveId,
    target: i8,
}

/// Toy battle state. Cloning is the deep copy the search relies on.
#[derive(Debug, Clone)]
pub struct DuelBattle {
    dex: Arc<DuelDex>,
    format: Format,
    sides: [Side; 2],
    pending: [Option<Choice>; 2],
    turn: u32,
    turn_limit: u32,
    ended: bool,
    winner: Option<usize>,
}

impl DuelBattle {
    pub fn new(dex: Arc<DuelDex>, format: Format, setups: [SideSetup; 2]) -> Self {
        let slots = format.active_per_side();
        let [p1, p2] = setups;
        Self {
            dex,
            format,
            sides: [Side::new(p1, slots), Side::new(p2, slots)],
            pending: [None, None],
            turn: 0,
            turn_limit: DEFAULT_TURN_LIMIT,
            ended: false,
            winner: None,
        }
    }

    /// Standard dex and teams.
    pub fn standard(format: Format) -> Self {
        let dex = DuelDex::standard();
        let teams = standard_teams(&dex);
        Self::new(Arc::new(dex), format, teams)
    }

    pub fn with_turn_limit(mut self, limit: u32) -> Self {
        self.turn_limit = limit;
        self
    }

    pub fn dex(&self) -> &DuelDex {
        &self.dex
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn side_name(&self, side: SideId) -> &str {
        &self.sides[side.index()].name
    }

    /// Current HP of team member `index` of `side`.
    pub fn hp(&self, side: SideId, index: usize) -> Option<u32> {
        self.sides[side.index()].team.get(index).map(|m| m.hp)
    }

    /// Species id in each active slot of `side`.
    pub fn active_species(&self, side: SideId) -> Vec<Option<SpeciesId>> {
        let s = &self.sides[side.index()];
        (0..s.active.len())
            .map(|slot| s.active_mon(slot).map(|m| m.info.species))
            .collect()
    }

    /// The move request `side` has to answer this turn.
    pub fn request(&self, side: SideId) -> ChoiceRequest {
        let s = &self.sides[side.index()];
        let active = (0..s.active.len())
            .map(|slot| {
                s.active_mon(slot).map(|mon| ActiveRequest {
                    moves: mon
                        .info
                        .moves
                        .iter()
                        .map(|&id| MoveSlot {
                            id,
                            target: self.dex.target(id),
                            disabled: false,
                        })
                        .collect(),
                    can_terastallize: if s.tera_used {
                        None
                    } else {
                        Some(mon.info.tera)
                    },
                    trapped: false,
                })
            })
            .collect();

        ChoiceRequest::Move(MoveRequest {
            active,
            side: SideRequest {
                name: s.name.clone(),
                pokemon: s
                    .team
                    .iter()
                    .enumerate()
                    .map(|(i, m)| RequestPokemon {
                        active: s.is_active(i),
                        fainted: m.fainted,
                        reviving: false,
                    })
                    .collect(),
            },
        })
    }

    fn validate(&self, side: SideId, choice: &Choice) -> Result<(), BattleError> {
        let invalid = |reason: String| BattleError::InvalidChoice { side, reason };
        let s = &self.sides[side.index()];

        if choice.actions.len() != s.active.len() {
            return Err(invalid(format!(
                "expected {} actions, got {}",
                s.active.len(),
                choice.actions.len()
            )));
        }

        let mut switching_in = Vec::new();
        let mut tera_count = 0;
        for (slot, action) in choice.actions.iter().enumerate() {
            match action {
                ChosenAction::Pass => {}
                ChosenAction::Move {
                    move_id,
                    target,
                    terastallize,
                } => {
                    let mon = s
                        .active_mon(slot)
                        .ok_or_else(|| invalid(format!("slot {} has nothing to move", slot)))?;
                    if !mon.info.moves.contains(move_id) {
                        return Err(invalid(format!("move {} is not known", move_id.0)));
                    }
                    if !(-2..=2).contains(target) {
                        return Err(invalid(format!("target {} out of range", target)));
                    }
                    if let Some(t) = terastallize {
                        if s.tera_used || *t != mon.info.tera {
                            return Err(invalid(format!("cannot terastallize into {:?}", t)));
                        }
                        tera_count += 1;
                    }
                }
                ChosenAction::Switch { index } => {
                    let target = s
                        .team
                        .get(*index)
                        .ok_or_else(|| invalid(format!("no team member {}", index)))?;
                    if target.fainted || s.is_active(*index) || switching_in.contains(index) {
                        return Err(invalid(format!("cannot switch to {}", index)));
                    }
                    switching_in.push(*index);
                }
                ChosenAction::Team { .. } => {
                    return Err(invalid("team order outside team preview".to_string()));
                }
            }
        }
        if tera_count > 1 {
            return Err(invalid("only one terastallization per battle".to_string()));
        }
        Ok(())
    }

    fn default_choice(&self, side: SideId) -> Choice {
        let s = &self.sides[side.index()];
        let actions = (0..s.active.len())
            .map(|slot| {
                let Some(mon) = s.active_mon(slot) else {
                    return ChosenAction::Pass;
                };
                match mon.info.moves.first() {
                    Some(&move_id) => ChosenAction::Move {
                        move_id,
                        target: default_target(self.dex.target(move_id)),
                        terastallize: None,
                    },
                    None => ChosenAction::Pass,
                }
            })
            .collect();
        Choice::new(actions)
    }

    fn apply_move(&mut self, mv: &QueuedMove) {
        let attacker = match self.sides[mv.side].active_mon(mv.slot) {
            Some(m) => m,
            None => return,
        };
        let mut damage = self.dex.power(mv.move_id);
        if attacker.terastallized.is_some() {
            damage = damage * 3 / 2;
        }
        if damage == 0 {
            return;
        }

        let foe = 1 - mv.side;
        match self.dex.target(mv.move_id) {
            MoveTarget::Normal
            | MoveTarget::Any
            | MoveTarget::AdjacentFoe
            | MoveTarget::RandomNormal => {
                let wanted = if mv.target > 0 {
                    (mv.target - 1) as usize
                } else {
                    0
                };
                let foe_side = &self.sides[foe];
                let slot = if foe_side.active_mon(wanted).is_some() {
                    Some(wanted)
                } else {
                    (0..foe_side.active.len()).find(|&s| foe_side.active_mon(s).is_some())
                };
                if let Some(slot) = slot {
                    self.hit(foe, slot, damage);
                }
            }
            MoveTarget::AllAdjacentFoes | MoveTarget::AllAdjacent => {
                for slot in 0..self.sides[foe].active.len() {
                    self.hit(foe, slot, damage * 3 / 4);
                }
            }
            _ => {}
        }
    }

    fn hit(&mut self, side: usize, slot: usize, damage: u32) {
        let s = &mut self.sides[side];
        if let Some(index) = s.active.get(slot).copied().flatten() {
            let mon = &mut s.team[index];
            if !mon.fainted {
                mon.take_damage(damage);
                if mon.fainted {
                    debug!(side = %s.name, slot, "Pokémon fainted");
                }
            }
        }
    }

    fn replace_fainted(&mut self) {
        for side in &mut self.sides {
            for slot in 0..side.active.len() {
                let fainted = side.active[slot]
                    .map(|i| side.team[i].fainted)
                    .unwrap_or(false);
                if fainted {
                    side.active[slot] = side.next_replacement();
                }
            }
        }
    }

    fn check_end(&mut self) {
        let p1_out = self.sides[0].all_fainted();
        let p2_out = self.sides[1].all_fainted();
        self.winner = match (p1_out, p2_out) {
            (false, true) => Some(0),
            (true, false) => Some(1),
            _ => None,
        };
        self.ended = p1_out || p2_out || self.turn >= self.turn_limit;
        if self.ended {
            debug!(
                turn = self.turn,
                winner = self.winner_name().unwrap_or("<tie>"),
                "Battle ended"
            );
        }
    }

    fn side_perspective(&self, side: usize) -> SidePerspective {
        let s = &self.sides[side];
        let view = |i: usize| {
            let m = &s.team[i];
            let mut p = PokemonPerspective::new(m.info.species, m.info.max_hp);
            p.hp = m.hp;
            p.fainted = m.fainted;
            p.terastallized = m.terastallized;
            p.is_active = s.is_active(i);
            p
        };
        SidePerspective {
            name: s.name.clone(),
            active: s
                .active
                .iter()
                .map(|slot| slot.map(&view))
                .collect(),
            pokemon: (0..s.team.len()).map(&view).collect(),
            side_conditions: Default::default(),
        }
    }
}

/// Target used when the engine picks a move on a player's behalf.
fn default_target(target: MoveTarget) -> i8 {
    match target {
        MoveTarget::Normal | MoveTarget::Any | MoveTarget::AdjacentFoe => 1,
        MoveTarget::AdjacentAlly | MoveTarget::AdjacentAllyOrSelf => -1,
        _ => 0,
    }
}

impl Battle for DuelBattle {
    fn copy(&self) -> Result<Self, BattleError> {
        Ok(self.clone())
    }

    fn choose(&mut self, side: SideId, choice: &Choice) -> Result<(), BattleError> {
        if self.ended {
            return Err(BattleError::AlreadyEnded);
        }
        self.validate(side, choice)?;
        self.pending[side.index()] = Some(choice.clone());
        Ok(())
    }

    fn auto_choose(&mut self, side: SideId) -> Result<(), BattleError> {
        let choice = self.default_choice(side);
        self.choose(side, &choice)
    }

    fn commit_choices(&mut self) -> Result<(), BattleError> {
        if self.ended {
            return Err(BattleError::AlreadyEnded);
        }
        if self.pending.iter().any(Option::is_none) {
            return Err(BattleError::TurnFailed(
                "both sides must choose before the turn resolves".to_string(),
            ));
        }
        let choices = [self.pending[0].take(), self.pending[1].take()];

        // Switches and terastallization resolve before any move.
        let mut queue = Vec::new();
        for (side, choice) in choices.iter().enumerate() {
            let Some(choice) = choice else { continue };
            for (slot, action) in choice.actions.iter().enumerate() {
                match action {
                    ChosenAction::Switch { index } => {
                        self.sides[side].active[slot] = Some(*index);
                    }
                    ChosenAction::Move {
                        move_id,
                        target,
                        terastallize,
                    } => {
                        let s = &mut self.sides[side];
                        let Some(index) = s.active[slot] else { continue };
                        if let Some(t) = terastallize {
                            s.team[index].terastallized = Some(*t);
                            s.tera_used = true;
                        }
                        queue.push(QueuedMove {
                            speed: s.team[index].info.speed,
                            side,
                            slot,
                            move_id: *move_id,
                            target: *target,
                        });
                    }
                    ChosenAction::Pass | ChosenAction::Team { .. } => {}
                }
            }
        }

        queue.sort_by_key(|m| (Reverse(m.speed), m.side, m.slot));
        for mv in &queue {
            self.apply_move(mv);
        }

        self.replace_fainted();
        self.turn += 1;
        self.check_end();
        Ok(())
    }

    fn ended(&self) -> bool {
        self.ended
    }

    fn winner_name(&self) -> Option<&str> {
        self.winner.map(|w| self.sides[w].name.as_str())
    }

    fn perspective(&self, side: SideId) -> Result<Perspective, BattleError> {
        Ok(Perspective {
            player_side: self.side_perspective(side.index()),
            opponent_side: self.side_perspective(side.opponent().index()),
            field: Default::default(),
            turn: self.turn,
        })
    }
}
