//! Neural-network-guided Monte Carlo Tree Search over the joint actions of a
//! singles or doubles battle.
//!
//! This crate works with any battle implementing the `engine-core` Battle
//! trait and any policy/value model implementing [`Evaluator`].
//!
//! # Overview
//!
//! A search call takes the authoritative battle, the pending choice request
//! and the searching side's perspective, and returns one action per active
//! slot:
//!
//! 1. **Enumeration**: [`ActionMapper`] lists the legal actions of each slot
//!    and maps them to vocabulary indices
//! 2. **Priors**: the model scores the perspective once; per-slot masked
//!    softmax gives the priors of the joint root, optionally perturbed with
//!    Dirichlet noise
//! 3. **Iterations**: PUCT picks a root edge, a copy of the battle plays it
//!    for one turn, and the resulting value is backed up into the edge
//! 4. **Selection**: the most visited edge wins
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use engine_core::{Battle, SideId};
//! use games_duel::{DuelBattle, Format};
//! use mcts::{run_mcts, ActionMapper, MctsConfig, ModelEvaluator, StateEncoder,
//!            UniformEvaluator, Vocabulary};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let battle = DuelBattle::standard(Format::Doubles);
//! let dex = battle.dex();
//! let vocab = Arc::new(Vocabulary::from_json_str(&dex.vocabulary_json(), dex.dex())?);
//!
//! let model = ModelEvaluator::new(
//!     StateEncoder::new(vocab.clone()),
//!     UniformEvaluator::new(vocab.num_actions()),
//! );
//! let mapper = ActionMapper::new(vocab);
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let request = battle.request(SideId::P1);
//! let result = run_mcts(
//!     &model,
//!     &mapper,
//!     MctsConfig::for_testing(),
//!     &battle,
//!     SideId::P1,
//!     "Alice",
//!     &request,
//!     &mut rng,
//! )?;
//!
//! let choice = mapper.build_choice(&result.action_a, result.action_b.as_ref());
//! println!("Choice: {}", choice);
//! ```
//!
//! # Configuration
//!
//! The [`MctsConfig`] struct controls search behavior:
//!
//! - `num_iterations`: Iterations per search (default: 200)
//! - `c_puct`: Exploration constant for PUCT (default: 1.5)
//! - `dirichlet_alpha`: Root noise concentration, 0 disables noise (default: 0.3)
//! - `dirichlet_epsilon`: Weight of the noise in the root priors (default: 0.25)
//!
//! # Evaluators
//!
//! - [`UniformEvaluator`]: flat logits and value 0.5 (for testing)
//! - `OnnxEvaluator`: ONNX Runtime inference, behind the `onnx` feature

pub mod actions;
pub mod config;
pub mod encoder;
pub mod evaluator;
pub mod node;
pub mod noise;
pub mod search;
pub mod tree;
pub mod vocab;

#[cfg(feature = "onnx")]
pub mod onnx;

// Re-export main types
pub use actions::{ActionKind, ActionMapper, LegalAction, LegalActionSet};
pub use config::{ConfigError, MctsConfig};
pub use encoder::{EncodedState, StateEncoder, NUMERIC_DIM, NUM_SPECIES_SLOTS};
pub use evaluator::{
    masked_softmax, Evaluator, EvaluatorError, ModelEvaluator, ModelOutput, UniformEvaluator,
};
pub use node::{SearchEdge, SearchNode};
pub use search::{run_mcts, terminal_value, MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::TreeStats;
pub use vocab::{VocabError, Vocabulary};

#[cfg(feature = "onnx")]
pub use onnx::{OnnxEvaluator, OnnxStats};
