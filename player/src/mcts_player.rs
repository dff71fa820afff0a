//! Search-backed player.
//!
//! One [`MctsPlayer`] per battle side. Team preview is answered with a random
//! ordering; every other request runs a joint-action search against the
//! authoritative battle.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use engine_core::{Battle, Choice, ChoiceRequest, ChosenAction, Perspective, SideId};
use mcts::{Evaluator, MctsSearch};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, info};

use crate::resources::MctsResources;

pub struct MctsPlayer<E> {
    resources: Arc<MctsResources<E>>,
    side: SideId,
    /// Matched against the battle winner; must equal the side's player name.
    name: String,
    rng: ChaCha20Rng,
}

impl<E> std::fmt::Debug for MctsPlayer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsPlayer")
            .field("side", &self.side)
            .field("name", &self.name)
            .field("num_iterations", &self.resources.config().num_iterations)
            .finish()
    }
}

impl<E: Evaluator> MctsPlayer<E> {
    /// Seeded from the configured seed (offset by side so both players of
    /// one battle draw different streams), or from entropy when unset.
    pub fn new(resources: Arc<MctsResources<E>>, side: SideId, name: impl Into<String>) -> Self {
        let rng = match resources.seed() {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed.wrapping_add(side.index() as u64)),
            None => ChaCha20Rng::from_entropy(),
        };
        Self {
            resources,
            side,
            name: name.into(),
            rng,
        }
    }

    pub fn with_seed(
        resources: Arc<MctsResources<E>>,
        side: SideId,
        name: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self {
            resources,
            side,
            name: name.into(),
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn side(&self) -> SideId {
        self.side
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Answer `request` for the current state of `battle`.
    pub fn choose<B: Battle>(
        &mut self,
        request: &ChoiceRequest,
        battle: &B,
        perspective: &Perspective,
    ) -> Result<Choice> {
        if let ChoiceRequest::TeamPreview(preview) = request {
            return Ok(self.team_order(preview.side.pokemon.len()));
        }

        let search = MctsSearch::new(
            self.resources.config().clone(),
            self.resources.model(),
            self.resources.mapper(),
        )
        .map_err(|e| anyhow!("MCTS setup failed: {}", e))?;

        let result = search
            .search(
                battle,
                self.side,
                &self.name,
                request,
                perspective,
                &mut self.rng,
            )
            .map_err(|e| anyhow!("MCTS search failed: {}", e))?;

        let choice = self
            .resources
            .mapper()
            .build_choice(&result.action_a, result.action_b.as_ref());

        if self.resources.print_debug() {
            let vocab = self.resources.vocab();
            info!(
                player = %self.name,
                slot_a = %vocab.action_key(result.action_a.vocab_index),
                slot_b = %result
                    .action_b
                    .map(|b| vocab.action_key(b.vocab_index))
                    .unwrap_or_else(|| "-".to_string()),
                iterations = result.stats.iterations,
                discarded = result.stats.discarded,
                root_value = result.stats.root_value,
                "MCTS choice"
            );
        } else {
            debug!(
                player = %self.name,
                choice = %choice,
                iterations = result.stats.iterations,
                "MCTS choice"
            );
        }

        Ok(choice)
    }

    /// Uniformly random team order (Fisher-Yates over team positions).
    fn team_order(&mut self, team_size: usize) -> Choice {
        let mut order: Vec<usize> = (0..team_size).collect();
        order.shuffle(&mut self.rng);
        let actions = order
            .into_iter()
            .enumerate()
            .map(|(position, original_index)| ChosenAction::Team {
                index: position,
                original_index,
                priority: -(position as i32),
            })
            .collect();
        Choice::new(actions)
    }
}
