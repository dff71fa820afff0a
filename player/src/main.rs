//! Player - runs toy duel battles between two MCTS players
//!
//! Loads the central configuration, builds one set of search resources
//! shared by both sides, plays the requested number of battles and logs a
//! win/tie tally.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mcts::{Evaluator, Vocabulary};
use player::{duel_players, init_tracing, play_duel, MctsResources, RunConfig};
use tracing::info;

fn run_series<E: Evaluator>(config: &RunConfig, resources: MctsResources<E>) -> Result<()> {
    let resources = Arc::new(resources);
    let opponent = config.opponent_name();
    let mut players = duel_players(&resources, &config.name, &opponent);

    let (mut wins, mut losses, mut ties) = (0u32, 0u32, 0u32);
    for battle in 1..=config.battles {
        let outcome = play_duel(&mut players, config.format.into(), config.turn_limit)?;
        if outcome.won_by(&config.name) {
            wins += 1;
        } else if outcome.winner.is_some() {
            losses += 1;
        } else {
            ties += 1;
        }
        info!(
            battle,
            winner = outcome.winner.as_deref().unwrap_or("tie"),
            turns = outcome.turns,
            "Battle complete"
        );
    }

    info!(
        player = %config.name,
        wins,
        losses,
        ties,
        "Series complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    let config = RunConfig::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let central = config.central();
    info!(
        battles = config.battles,
        format = ?config.format,
        num_iterations = central.mcts.num_iterations,
        seed = ?central.mcts.seed,
        "Starting battle series"
    );

    if config.onnx {
        #[cfg(feature = "onnx")]
        {
            let dex = games_duel::DuelDex::standard();
            let resources = MctsResources::load(&central, dex.dex())?;
            return run_series(&config, resources);
        }
    }

    let dex = games_duel::DuelDex::standard();
    let vocab = Arc::new(Vocabulary::from_json_str(
        &dex.vocabulary_json(),
        dex.dex(),
    )?);
    run_series(&config, MctsResources::uniform(&central, vocab)?)
}
