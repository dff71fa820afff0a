//! MCTS battle player.
//!
//! Wires the search into something that can sit in a battle loop:
//! - [`MctsResources`]: search configuration, vocabulary and model, loaded
//!   once from the central config and shared by every player
//! - [`MctsPlayer`]: answers choice requests (random team order at preview,
//!   search-backed choices otherwise)
//! - [`play_duel`]: runs a full toy battle between two players

use anyhow::Result;

pub mod config;
pub mod duel;
pub mod mcts_player;
pub mod resources;

pub use config::{FormatArg, RunConfig};
pub use duel::{duel_players, play_duel, DuelOutcome};
pub use mcts_player::MctsPlayer;
pub use resources::{load_vocabulary, search_config, MctsResources};

/// Install the global tracing subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()?;

    Ok(())
}
