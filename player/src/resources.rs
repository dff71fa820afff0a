//! Shared search resources.
//!
//! Loaded once per process and shared (behind an `Arc`) by every player, so
//! a vocabulary file or ONNX session is never opened twice.

use std::sync::Arc;

use anyhow::{Context, Result};
use engine_config::CentralConfig;
use engine_core::Dex;
use mcts::{
    ActionMapper, Evaluator, MctsConfig, ModelEvaluator, StateEncoder, UniformEvaluator,
    Vocabulary,
};
#[cfg(feature = "onnx")]
use tracing::info;

/// Convert the `[mcts]` section of the central config into a validated
/// search configuration.
pub fn search_config(central: &CentralConfig) -> Result<MctsConfig> {
    let mcts = &central.mcts;
    let config = MctsConfig {
        num_iterations: mcts.num_iterations,
        c_puct: mcts.c_puct as f32,
        num_determinizations: mcts.num_determinizations,
        dirichlet_alpha: mcts.dirichlet_alpha as f32,
        dirichlet_epsilon: mcts.dirichlet_epsilon as f32,
    };
    config.validate().context("invalid [mcts] configuration")?;
    Ok(config)
}

/// Load the vocabulary named by `[model] vocab_path`, resolved against `dex`.
pub fn load_vocabulary(central: &CentralConfig, dex: &Dex) -> Result<Arc<Vocabulary>> {
    let path = &central.model.vocab_path;
    let vocab = Vocabulary::load(path, dex)
        .with_context(|| format!("failed to load vocabulary from {}", path))?;
    Ok(Arc::new(vocab))
}

/// Everything a player needs to run a search.
pub struct MctsResources<E> {
    config: MctsConfig,
    model: ModelEvaluator<E>,
    mapper: ActionMapper,
    print_debug: bool,
    seed: Option<u64>,
}

impl<E: Evaluator> MctsResources<E> {
    pub fn new(central: &CentralConfig, vocab: Arc<Vocabulary>, evaluator: E) -> Result<Self> {
        Ok(Self {
            config: search_config(central)?,
            model: ModelEvaluator::new(StateEncoder::new(vocab.clone()), evaluator),
            mapper: ActionMapper::new(vocab),
            print_debug: central.player.print_debug,
            seed: central.mcts.seed,
        })
    }
}

impl<E> MctsResources<E> {
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn model(&self) -> &ModelEvaluator<E> {
        &self.model
    }

    pub fn mapper(&self) -> &ActionMapper {
        &self.mapper
    }

    pub fn vocab(&self) -> &Vocabulary {
        self.mapper.vocab()
    }

    pub fn print_debug(&self) -> bool {
        self.print_debug
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl MctsResources<UniformEvaluator> {
    /// Resources backed by the uniform evaluator (flat priors, value 0.5).
    pub fn uniform(central: &CentralConfig, vocab: Arc<Vocabulary>) -> Result<Self> {
        let evaluator = UniformEvaluator::new(vocab.num_actions());
        Self::new(central, vocab, evaluator)
    }
}

#[cfg(feature = "onnx")]
impl MctsResources<mcts::OnnxEvaluator> {
    /// Load the vocabulary and ONNX model named by the `[model]` section.
    pub fn load(central: &CentralConfig, dex: &Dex) -> Result<Self> {
        let vocab = load_vocabulary(central, dex)?;
        let path = &central.model.model_path;
        let evaluator = mcts::OnnxEvaluator::load(path, central.model.onnx_intra_threads)
            .with_context(|| format!("failed to load model from {}", path))?;
        info!(path = %path, "Loaded ONNX model");
        Self::new(central, vocab, evaluator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_duel::DuelDex;
    use std::io::Write;

    fn central() -> CentralConfig {
        let mut central = CentralConfig::default();
        central.mcts.num_iterations = 16;
        central.mcts.c_puct = 1.5;
        central.mcts.num_determinizations = 1;
        central.mcts.dirichlet_alpha = 0.3;
        central.mcts.dirichlet_epsilon = 0.25;
        central
    }

    #[test]
    fn search_config_converts_mcts_section() {
        let config = search_config(&central()).unwrap();
        assert_eq!(config.num_iterations, 16);
        assert!((config.c_puct - 1.5).abs() < 1e-6);
        assert!((config.dirichlet_alpha - 0.3).abs() < 1e-6);
        assert!((config.dirichlet_epsilon - 0.25).abs() < 1e-6);
    }

    #[test]
    fn search_config_rejects_multiple_determinizations() {
        let mut central = central();
        central.mcts.num_determinizations = 4;
        let err = search_config(&central).unwrap_err();
        assert!(err.to_string().contains("[mcts]"));
    }

    #[test]
    fn search_config_rejects_bad_epsilon() {
        let mut central = central();
        central.mcts.dirichlet_epsilon = 1.5;
        assert!(search_config(&central).is_err());
    }

    #[test]
    fn load_vocabulary_reads_file() {
        let dex = DuelDex::standard();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(dex.vocabulary_json().as_bytes()).unwrap();

        let mut central = central();
        central.model.vocab_path = file.path().to_string_lossy().into_owned();
        let vocab = load_vocabulary(&central, dex.dex()).unwrap();
        assert_eq!(vocab.num_species(), 8);
    }

    #[test]
    fn load_vocabulary_reports_missing_file() {
        let dex = DuelDex::standard();
        let mut central = central();
        central.model.vocab_path = "/nonexistent/vocab.json".into();
        let err = load_vocabulary(&central, dex.dex()).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/vocab.json"));
    }

    #[test]
    fn uniform_resources_carry_player_settings() {
        let dex = DuelDex::standard();
        let vocab = Arc::new(Vocabulary::from_json_str(&dex.vocabulary_json(), dex.dex()).unwrap());
        let mut central = central();
        central.mcts.seed = Some(3);
        central.player.print_debug = true;

        let resources = MctsResources::uniform(&central, vocab).unwrap();
        assert_eq!(resources.seed(), Some(3));
        assert!(resources.print_debug());
        assert_eq!(resources.config().num_iterations, 16);
        assert_eq!(resources.vocab().num_actions(), 23);
    }
}
