//! Sanity check for an exported battle model.
//!
//! Loads the vocabulary and ONNX model, scores the opening position of a
//! standard doubles battle, and prints the value and the most likely legal
//! actions of each slot.

use anyhow::Result;
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use engine_core::{Battle, SideId};
use games_duel::{DuelBattle, DuelDex, Format};
use mcts::{masked_softmax, LegalAction, Vocabulary};
use once_cell::sync::Lazy;
use player::{init_tracing, MctsResources};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_model_path() -> String {
    CENTRAL_CONFIG.model.model_path.clone()
}

fn default_vocab_path() -> String {
    CENTRAL_CONFIG.model.vocab_path.clone()
}

fn default_threads() -> usize {
    CENTRAL_CONFIG.model.onnx_intra_threads
}

#[derive(Parser, Debug)]
#[command(name = "model-check")]
#[command(about = "Load a battle model and score the opening position")]
struct Args {
    /// ONNX model file
    #[arg(long, env = "VGC_MODEL_MODEL_PATH", default_value_t = default_model_path())]
    model: String,

    /// Vocabulary JSON file
    #[arg(long, env = "VGC_MODEL_VOCAB_PATH", default_value_t = default_vocab_path())]
    vocab: String,

    /// ONNX Runtime intra-op threads
    #[arg(long, default_value_t = default_threads())]
    threads: usize,

    /// Number of actions to print per slot
    #[arg(long, default_value_t = 5)]
    top: usize,
}

fn top_actions(
    vocab: &Vocabulary,
    legal: &[LegalAction],
    probs: &[f32],
    top: usize,
) -> Vec<(String, f32)> {
    // Targets and tera variants share a vocabulary index.
    let mut indices: Vec<usize> = legal.iter().map(|a| a.vocab_index).collect();
    indices.sort_unstable();
    indices.dedup();

    let mut scored: Vec<(String, f32)> = indices
        .into_iter()
        .map(|i| (vocab.action_key(i), probs.get(i).copied().unwrap_or(0.0)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top);
    scored
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&CENTRAL_CONFIG.common.log_level)?;

    let mut central = CENTRAL_CONFIG.clone();
    central.model.model_path = args.model.clone();
    central.model.vocab_path = args.vocab.clone();
    central.model.onnx_intra_threads = args.threads;

    let dex = DuelDex::standard();
    let resources = MctsResources::load(&central, dex.dex())?;

    let battle = DuelBattle::standard(Format::Doubles);
    let request = battle.request(SideId::P1);
    let perspective = battle.perspective(SideId::P1)?;
    let output = resources.model().evaluate(&perspective)?;

    let mut rng = ChaCha20Rng::seed_from_u64(0);
    let legal = resources
        .mapper()
        .legal_actions(&request, &perspective, &mut rng);
    let mapper = resources.mapper();
    let probs_a = masked_softmax(&output.policy_a, &mapper.build_legal_mask(&legal.slot_a));
    let probs_b = masked_softmax(&output.policy_b, &mapper.build_legal_mask(&legal.slot_b));

    println!("model: {}", args.model);
    println!("value (P1 win probability): {:.4}", output.value);
    for (label, actions, probs) in [("A", &legal.slot_a, &probs_a), ("B", &legal.slot_b, &probs_b)] {
        println!("slot {}:", label);
        for (key, p) in top_actions(resources.vocab(), actions, probs, args.top) {
            println!("  {:<28} {:.4}", key, p);
        }
    }

    let stats = resources.model().inner().stats();
    info!(
        inference_count = stats.inference_count,
        avg_inference_ms = stats.avg_inference_ms,
        "Model check complete"
    );
    Ok(())
}
