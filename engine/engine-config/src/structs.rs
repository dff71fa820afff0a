//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_data_dir() -> String {
    defaults::data_dir().into()
}
fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_vocab_path() -> String {
    defaults::vocab_path().into()
}
fn d_model_path() -> String {
    defaults::model_path().into()
}
fn d_onnx_intra_threads() -> usize {
    defaults::onnx_intra_threads()
}
fn d_num_iterations() -> u32 {
    defaults::num_iterations()
}
fn d_c_puct() -> f64 {
    defaults::c_puct()
}
fn d_num_determinizations() -> u32 {
    defaults::num_determinizations()
}
fn d_dirichlet_alpha() -> f64 {
    defaults::dirichlet_alpha()
}
fn d_dirichlet_epsilon() -> f64 {
    defaults::dirichlet_epsilon()
}
fn d_player_name() -> String {
    defaults::player_name().into()
}
fn d_print_debug() -> bool {
    defaults::print_debug()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Common configuration shared by all components
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_data_dir")]
    pub data_dir: String,
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            data_dir: defaults::data_dir().into(),
            log_level: defaults::log_level().into(),
        }
    }
}

/// Trained model and its companion vocabulary
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    #[serde(default = "d_vocab_path")]
    pub vocab_path: String,
    #[serde(default = "d_model_path")]
    pub model_path: String,
    #[serde(default = "d_onnx_intra_threads")]
    pub onnx_intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vocab_path: defaults::vocab_path().into(),
            model_path: defaults::model_path().into(),
            onnx_intra_threads: defaults::onnx_intra_threads(),
        }
    }
}

/// Search parameters
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_num_iterations")]
    pub num_iterations: u32,
    #[serde(default = "d_c_puct")]
    pub c_puct: f64,
    #[serde(default = "d_num_determinizations")]
    pub num_determinizations: u32,
    #[serde(default = "d_dirichlet_alpha")]
    pub dirichlet_alpha: f64,
    #[serde(default = "d_dirichlet_epsilon")]
    pub dirichlet_epsilon: f64,
    /// Player RNG seed; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: defaults::num_iterations(),
            c_puct: defaults::c_puct(),
            num_determinizations: defaults::num_determinizations(),
            dirichlet_alpha: defaults::dirichlet_alpha(),
            dirichlet_epsilon: defaults::dirichlet_epsilon(),
            seed: None,
        }
    }
}

/// Player identity and diagnostics
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    /// Name matched against the battle winner.
    #[serde(default = "d_player_name")]
    pub name: String,
    #[serde(default = "d_print_debug")]
    pub print_debug: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: defaults::player_name().into(),
            print_debug: defaults::print_debug(),
        }
    }
}
