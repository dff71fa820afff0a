//! Joint-action search.
//!
//! One call builds a single-ply root over the joint actions of the searching
//! side, then repeats:
//! 1. Selection: pick the root edge with the highest PUCT score
//! 2. Simulation: copy the battle, play the edge's choice against the
//!    engine's default choice for the opponent, advance one turn
//! 3. Evaluation: terminal result, or the model value of the new state
//! 4. Update: add the value to the edge and bump the root visit count
//!
//! The most visited edge is returned.

use engine_core::{Battle, BattleError, ChoiceRequest, Perspective, SideId};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::actions::{ActionMapper, LegalAction};
use crate::config::{ConfigError, MctsConfig};
use crate::evaluator::{masked_softmax, Evaluator, EvaluatorError, ModelEvaluator};
use crate::node::SearchEdge;
use crate::tree::{self, TreeStats};

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),

    #[error("Battle error: {0}")]
    Battle(#[from] BattleError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("No joint action available at the root")]
    EmptyRoot,
}

/// Diagnostics of one search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Iterations whose value was backed up.
    pub iterations: u32,

    /// Iterations abandoned because copying, choosing, advancing or
    /// evaluating failed.
    pub discarded: u32,

    /// Model value of the root perspective.
    pub root_value: f32,

    pub tree: TreeStats,

    /// Only one joint action was legal, so no search ran.
    pub forced: bool,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub action_a: LegalAction,

    /// `None` when only one slot acts.
    pub action_b: Option<LegalAction>,

    pub stats: SearchStats,
}

/// Search configuration bound to a model and an action mapper.
///
/// Holds no per-call state; every `search` builds and drops its own root.
pub struct MctsSearch<'a, E> {
    config: MctsConfig,
    model: &'a ModelEvaluator<E>,
    mapper: &'a ActionMapper,
}

impl<'a, E: Evaluator> MctsSearch<'a, E> {
    pub fn new(
        config: MctsConfig,
        model: &'a ModelEvaluator<E>,
        mapper: &'a ActionMapper,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            model,
            mapper,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Choose the joint action for `side`.
    ///
    /// `battle` is only ever copied, never advanced. `player_name` is matched
    /// case-insensitively against the winner of terminal simulations.
    pub fn search<B: Battle, R: Rng + ?Sized>(
        &self,
        battle: &B,
        side: SideId,
        player_name: &str,
        request: &ChoiceRequest,
        perspective: &Perspective,
        rng: &mut R,
    ) -> Result<SearchResult, SearchError> {
        let legal = self.mapper.legal_actions(request, perspective, rng);

        if legal.is_forced() {
            let action_a = legal.slot_a[0];
            let action_b = legal.slot_b.first().map(|b| {
                if action_a.collides_with(b) {
                    LegalAction::pass()
                } else {
                    *b
                }
            });
            debug!(side = ?side, "Single legal joint action, skipping search");
            return Ok(SearchResult {
                action_a,
                action_b,
                stats: SearchStats {
                    forced: true,
                    ..Default::default()
                },
            });
        }

        // The root evaluation is not guarded: without a working model there
        // is nothing to search with.
        let output = self.model.evaluate(perspective)?;
        let mask_a = self.mapper.build_legal_mask(&legal.slot_a);
        let mask_b = self.mapper.build_legal_mask(&legal.slot_b);
        let probs_a = masked_softmax(&output.policy_a, &mask_a);
        let probs_b = masked_softmax(&output.policy_b, &mask_b);

        let mut root = tree::build_root(&legal, &probs_a, &probs_b);
        if root.is_empty() {
            return Err(SearchError::EmptyRoot);
        }
        if self.config.noise_enabled() {
            tree::apply_dirichlet_noise(
                &mut root,
                self.config.dirichlet_alpha,
                self.config.dirichlet_epsilon,
                rng,
            );
        }

        let mut completed = 0;
        let mut discarded = 0;
        for iteration in 0..self.config.num_iterations {
            let Some(idx) = root.select_edge(self.config.c_puct) else {
                return Err(SearchError::EmptyRoot);
            };

            match self.simulate(battle, side, player_name, &root.edges[idx]) {
                Ok(value) => {
                    root.record(idx, value);
                    completed += 1;
                    trace!(iteration, edge = idx, value, "Iteration complete");
                }
                Err(e) => {
                    // No statistics are written; the edge stays selectable.
                    discarded += 1;
                    debug!(iteration, edge = idx, error = %e, "Discarding iteration");
                }
            }
        }

        let best = root.best_edge().ok_or(SearchError::EmptyRoot)?;
        let edge = &root.edges[best];
        let stats = SearchStats {
            iterations: completed,
            discarded,
            root_value: output.value,
            tree: tree::stats(&root),
            forced: false,
        };
        debug!(
            side = ?side,
            edges = stats.tree.num_edges,
            iterations = stats.iterations,
            discarded = stats.discarded,
            root_value = stats.root_value,
            best_visits = stats.tree.max_edge_visits,
            best_value = stats.tree.best_value,
            "Search complete"
        );

        Ok(SearchResult {
            action_a: edge.action_a,
            action_b: edge.action_b,
            stats,
        })
    }

    /// Play one edge for a single turn and return the leaf value for `side`.
    fn simulate<B: Battle>(
        &self,
        battle: &B,
        side: SideId,
        player_name: &str,
        edge: &SearchEdge,
    ) -> Result<f32, SearchError> {
        let mut sim = battle.copy()?;
        let choice = self
            .mapper
            .build_choice(&edge.action_a, edge.action_b.as_ref());
        sim.choose(side, &choice)?;
        sim.auto_choose(side.opponent())?;
        sim.commit_choices()?;

        if sim.ended() {
            return Ok(terminal_value(sim.winner_name(), player_name));
        }
        let perspective = sim.perspective(side)?;
        Ok(self.model.evaluate(&perspective)?.value)
    }
}

/// 1.0 for a win, 0.0 for a loss, 0.5 for a tie.
pub fn terminal_value(winner: Option<&str>, player_name: &str) -> f32 {
    match winner {
        Some(name) if name.eq_ignore_ascii_case(player_name) => 1.0,
        Some(_) => 0.0,
        None => 0.5,
    }
}

/// Convenience function to run a single search.
#[allow(clippy::too_many_arguments)]
pub fn run_mcts<B: Battle, E: Evaluator, R: Rng + ?Sized>(
    model: &ModelEvaluator<E>,
    mapper: &ActionMapper,
    config: MctsConfig,
    battle: &B,
    side: SideId,
    player_name: &str,
    request: &ChoiceRequest,
    rng: &mut R,
) -> Result<SearchResult, SearchError> {
    let perspective = battle.perspective(side)?;
    let search = MctsSearch::new(config, model, mapper)?;
    search.search(battle, side, player_name, request, &perspective, rng)
}
