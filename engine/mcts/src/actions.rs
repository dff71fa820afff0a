//! Legal action enumeration and mapping to the model's action space.
//!
//! Each active slot gets an ordered list of [`LegalAction`]s. Every legal
//! action carries the policy index the network scores it under; several
//! legal actions may share one index (a move with and without
//! terastallization).

use std::sync::Arc;

use engine_core::{
    ActiveRequest, Choice, ChoiceRequest, ChosenAction, MoveId, MoveRequest, MoveTarget,
    Perspective, SideRequest, SwitchRequest, TeraType,
};
use rand::Rng;
use tracing::trace;

use crate::vocab::{Vocabulary, NONE_ACTION_INDEX};

/// Kind-specific payload of a legal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Move {
        move_id: MoveId,
        /// Relative target: 1/2 for foes, -1/-2 for allies, 0 for auto.
        target: i8,
        terastallize: Option<TeraType>,
    },
    Switch {
        /// Team position of the incoming Pokémon.
        slot: usize,
    },
    Pass,
}

/// One selectable sub-action for one active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegalAction {
    pub vocab_index: usize,
    pub kind: ActionKind,
}

impl LegalAction {
    pub fn pass() -> Self {
        Self {
            vocab_index: NONE_ACTION_INDEX,
            kind: ActionKind::Pass,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self.kind, ActionKind::Switch { .. })
    }

    /// Team position this action switches in, if it is a switch.
    pub fn switch_slot(&self) -> Option<usize> {
        match self.kind {
            ActionKind::Switch { slot } => Some(slot),
            _ => None,
        }
    }

    /// Whether `self` and `other` would send in the same Pokémon.
    pub fn collides_with(&self, other: &LegalAction) -> bool {
        match (self.switch_slot(), other.switch_slot()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Legal actions for both active slots of one decision.
///
/// `slot_b` is empty in singles and whenever only one slot has to act.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegalActionSet {
    pub slot_a: Vec<LegalAction>,
    pub slot_b: Vec<LegalAction>,
}

impl LegalActionSet {
    /// True when there is exactly one feasible joint action.
    pub fn is_forced(&self) -> bool {
        self.slot_a.len() == 1 && self.slot_b.len() <= 1
    }
}

/// Translates between choice requests and the model's action vocabulary.
#[derive(Debug, Clone)]
pub struct ActionMapper {
    vocab: Arc<Vocabulary>,
}

impl ActionMapper {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Enumerate the legal actions of `request`.
    ///
    /// Directional move targets are drawn from `rng`, so the same seed gives
    /// the same action set.
    pub fn legal_actions<R: Rng + ?Sized>(
        &self,
        request: &ChoiceRequest,
        perspective: &Perspective,
        rng: &mut R,
    ) -> LegalActionSet {
        let set = match request {
            ChoiceRequest::Move(r) => self.move_request_actions(r, perspective, rng),
            ChoiceRequest::Switch(r) => self.switch_request_actions(r, perspective),
            ChoiceRequest::TeamPreview(_) => LegalActionSet {
                slot_a: vec![LegalAction::pass()],
                slot_b: Vec::new(),
            },
        };
        trace!(
            slot_a = set.slot_a.len(),
            slot_b = set.slot_b.len(),
            "Enumerated legal actions"
        );
        set
    }

    fn move_request_actions<R: Rng + ?Sized>(
        &self,
        request: &MoveRequest,
        perspective: &Perspective,
        rng: &mut R,
    ) -> LegalActionSet {
        let mut slots = request
            .active
            .iter()
            .take(2)
            .map(|active| self.slot_actions(active.as_ref(), &request.side, perspective, rng));

        let slot_a = slots.next().unwrap_or_else(|| vec![LegalAction::pass()]);
        let slot_b = slots.next().unwrap_or_default();
        LegalActionSet { slot_a, slot_b }
    }

    fn slot_actions<R: Rng + ?Sized>(
        &self,
        active: Option<&ActiveRequest>,
        side: &SideRequest,
        perspective: &Perspective,
        rng: &mut R,
    ) -> Vec<LegalAction> {
        let Some(active) = active else {
            return vec![LegalAction::pass()];
        };

        let mut actions = Vec::new();
        for slot in active.moves.iter().filter(|m| !m.disabled) {
            let vocab_index = self.vocab.move_action_index(slot.id);
            let target = resolve_target(slot.target, rng);
            actions.push(LegalAction {
                vocab_index,
                kind: ActionKind::Move {
                    move_id: slot.id,
                    target,
                    terastallize: None,
                },
            });
            if let Some(tera) = active.can_terastallize {
                actions.push(LegalAction {
                    vocab_index,
                    kind: ActionKind::Move {
                        move_id: slot.id,
                        target,
                        terastallize: Some(tera),
                    },
                });
            }
        }

        if !active.trapped {
            self.push_switches(&mut actions, side, perspective);
        }

        // Everything disabled: the engine will use Struggle through the first slot.
        if actions.is_empty() {
            if let Some(first) = active.moves.first() {
                actions.push(LegalAction {
                    vocab_index: self.vocab.move_action_index(first.id),
                    kind: ActionKind::Move {
                        move_id: first.id,
                        target: resolve_target(first.target, rng),
                        terastallize: None,
                    },
                });
            }
        }

        if actions.is_empty() {
            actions.push(LegalAction::pass());
        }
        actions
    }

    fn switch_request_actions(
        &self,
        request: &SwitchRequest,
        perspective: &Perspective,
    ) -> LegalActionSet {
        let needs = |slot: usize| request.force_switch.get(slot).copied().unwrap_or(false);

        let forced = |this: &Self| {
            let mut actions = Vec::new();
            this.push_switches(&mut actions, &request.side, perspective);
            if actions.is_empty() {
                actions.push(LegalAction::pass());
            }
            actions
        };

        let slot_b = if needs(1) { forced(self) } else { Vec::new() };
        // Slot A still submits an action when only slot B has to switch.
        let slot_a = if needs(0) {
            forced(self)
        } else {
            vec![LegalAction::pass()]
        };
        LegalActionSet { slot_a, slot_b }
    }

    fn push_switches(
        &self,
        actions: &mut Vec<LegalAction>,
        side: &SideRequest,
        perspective: &Perspective,
    ) {
        for (i, member) in side.pokemon.iter().enumerate() {
            if member.active || member.fainted || member.reviving {
                continue;
            }
            let vocab_index = perspective
                .player_side
                .pokemon
                .get(i)
                .map(|p| self.vocab.switch_action_index(p.species))
                .unwrap_or(NONE_ACTION_INDEX);
            actions.push(LegalAction {
                vocab_index,
                kind: ActionKind::Switch { slot: i },
            });
        }
    }

    /// Mask over the policy head with `true` at every action's index.
    pub fn build_legal_mask(&self, actions: &[LegalAction]) -> Vec<bool> {
        let mut mask = vec![false; self.vocab.num_actions()];
        for action in actions {
            if let Some(m) = mask.get_mut(action.vocab_index) {
                *m = true;
            }
        }
        mask
    }

    /// Convert the selected per-slot actions into an engine choice.
    pub fn build_choice(&self, slot_a: &LegalAction, slot_b: Option<&LegalAction>) -> Choice {
        let mut actions = vec![to_chosen(slot_a)];
        if let Some(b) = slot_b {
            actions.push(to_chosen(b));
        }
        Choice::new(actions)
    }
}

fn to_chosen(action: &LegalAction) -> ChosenAction {
    match action.kind {
        ActionKind::Move {
            move_id,
            target,
            terastallize,
        } => ChosenAction::Move {
            move_id,
            target,
            terastallize,
        },
        ActionKind::Switch { slot } => ChosenAction::Switch { index: slot },
        ActionKind::Pass => ChosenAction::Pass,
    }
}

/// Random adjacent target for directional moves; 0 lets the engine pick.
fn resolve_target<R: Rng + ?Sized>(target: MoveTarget, rng: &mut R) -> i8 {
    match target {
        MoveTarget::Normal | MoveTarget::Any | MoveTarget::AdjacentFoe => rng.gen_range(1..=2),
        MoveTarget::AdjacentAlly | MoveTarget::AdjacentAllyOrSelf => -rng.gen_range(1..=2),
        _ => 0,
    }
}
