//! Full toy battles between two search players.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use engine_core::{
    Battle, Choice, ChoiceRequest, ChosenAction, RequestPokemon, SideId, SideRequest,
    TeamPreviewRequest,
};
use games_duel::{standard_teams, DuelBattle, DuelDex, Format, TeamMember};
use mcts::Evaluator;
use tracing::{debug, info};

use crate::mcts_player::MctsPlayer;
use crate::resources::MctsResources;

#[derive(Debug, Clone, PartialEq)]
pub struct DuelOutcome {
    /// `None` on a tie.
    pub winner: Option<String>,
    pub turns: u32,
}

impl DuelOutcome {
    /// Winner names compare case-insensitively, as in the search's terminal
    /// value.
    pub fn won_by(&self, name: &str) -> bool {
        self.winner
            .as_deref()
            .is_some_and(|w| w.eq_ignore_ascii_case(name))
    }
}

/// Play one battle between `players[0]` (P1) and `players[1]` (P2).
///
/// Each player orders its standard team at preview, then both search every
/// turn against the same state before the turn is committed.
pub fn play_duel<E: Evaluator>(
    players: &mut [MctsPlayer<E>; 2],
    format: Format,
    turn_limit: u32,
) -> Result<DuelOutcome> {
    let dex = DuelDex::standard();
    let teams = standard_teams(&dex);

    // Preview needs some battle to hand the player; the unordered one will do.
    let preview_battle = DuelBattle::new(Arc::new(dex.clone()), format, teams.clone());
    let mut setups = teams;
    for (player, setup) in players.iter_mut().zip(setups.iter_mut()) {
        let perspective = preview_battle.perspective(player.side())?;
        let request = preview_request(player.name(), setup.team.len());
        let order = player.choose(&request, &preview_battle, &perspective)?;
        setup.team = apply_team_order(&setup.team, &order)?;
        setup.name = player.name().to_string();
    }

    let mut battle = DuelBattle::new(Arc::new(dex), format, setups).with_turn_limit(turn_limit);
    info!(
        p1 = %players[0].name(),
        p2 = %players[1].name(),
        ?format,
        "Battle started"
    );

    while !battle.ended() {
        let mut choices: Vec<Choice> = Vec::with_capacity(2);
        for player in players.iter_mut() {
            let side = player.side();
            let request = battle.request(side);
            let perspective = battle.perspective(side)?;
            choices.push(player.choose(&request, &battle, &perspective)?);
        }
        for (player, choice) in players.iter().zip(&choices) {
            battle.choose(player.side(), choice)?;
        }
        battle.commit_choices()?;
        debug!(
            turn = battle.turn(),
            p1 = %choices[0],
            p2 = %choices[1],
            "Turn resolved"
        );
    }

    let outcome = DuelOutcome {
        winner: battle.winner_name().map(str::to_string),
        turns: battle.turn(),
    };
    info!(
        winner = outcome.winner.as_deref().unwrap_or("tie"),
        turns = outcome.turns,
        "Battle finished"
    );
    Ok(outcome)
}

fn preview_request(name: &str, team_size: usize) -> ChoiceRequest {
    let pokemon = (0..team_size)
        .map(|_| RequestPokemon {
            active: false,
            fainted: false,
            reviving: false,
        })
        .collect();
    ChoiceRequest::TeamPreview(TeamPreviewRequest {
        side: SideRequest {
            name: name.to_string(),
            pokemon,
        },
    })
}

/// Reorder `team` according to a team preview choice.
fn apply_team_order(team: &[TeamMember], order: &Choice) -> Result<Vec<TeamMember>> {
    if order.actions.len() != team.len() {
        bail!(
            "team order has {} entries for a team of {}",
            order.actions.len(),
            team.len()
        );
    }
    let mut slots: Vec<Option<TeamMember>> = vec![None; team.len()];
    for action in &order.actions {
        let ChosenAction::Team {
            index,
            original_index,
            ..
        } = action
        else {
            bail!("expected a team action, got {}", action);
        };
        let member = team
            .get(*original_index)
            .ok_or_else(|| anyhow!("team index {} out of range", original_index))?;
        let Some(slot) = slots.get_mut(*index) else {
            bail!("team position {} out of range", index);
        };
        if slot.is_some() {
            bail!("team position {} is taken twice", index);
        }
        *slot = Some(member.clone());
    }
    slots
        .into_iter()
        .map(|m| m.ok_or_else(|| anyhow!("team order left a position empty")))
        .collect()
}

/// Players for a series of battles: `name` on P1, `opponent` on P2.
///
/// Reusing the same players across battles keeps their RNG streams running,
/// so a seeded series still plays different games.
pub fn duel_players<E: Evaluator>(
    resources: &Arc<MctsResources<E>>,
    name: &str,
    opponent: &str,
) -> [MctsPlayer<E>; 2] {
    [
        MctsPlayer::new(resources.clone(), SideId::P1, name),
        MctsPlayer::new(resources.clone(), SideId::P2, opponent),
    ]
}
