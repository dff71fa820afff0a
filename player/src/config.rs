//! Configuration for the battle runner
//!
//! Configuration is loaded from config.toml with environment variable overrides.
//! CLI arguments take highest priority, followed by env vars, then config.toml.

use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use engine_config::{load_config, CentralConfig};
use games_duel::Format;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_player_name() -> String {
    CENTRAL_CONFIG.player.name.clone()
}

fn default_num_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.num_iterations
}

fn default_vocab_path() -> String {
    CENTRAL_CONFIG.model.vocab_path.clone()
}

fn default_model_path() -> String {
    CENTRAL_CONFIG.model.model_path.clone()
}

/// Battle format accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Singles,
    Doubles,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Singles => Format::Singles,
            FormatArg::Doubles => Format::Doubles,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "player")]
#[command(about = "MCTS player - plays toy duel battles between two search players")]
#[command(
    long_about = "Runs complete duel battles in which both sides are MCTS players sharing
one model. Without the onnx feature (or without --onnx) the model is the
uniform evaluator.

Configuration is loaded from config.toml with environment variable overrides.
CLI arguments take highest priority."
)]
pub struct RunConfig {
    /// Number of battles to play
    #[arg(long, default_value_t = 1)]
    pub battles: u32,

    /// Battle format
    #[arg(long, value_enum, default_value_t = FormatArg::Doubles)]
    pub format: FormatArg,

    /// Turn limit after which a battle is a tie
    #[arg(long, default_value_t = games_duel::DEFAULT_TURN_LIMIT)]
    pub turn_limit: u32,

    /// MCTS iterations per decision
    #[arg(long, default_value_t = default_num_iterations())]
    pub num_iterations: u32,

    /// RNG seed (omit for entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Name of the first player; the second is "<name>-2"
    #[arg(long, default_value_t = default_player_name())]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,

    /// Use the ONNX model instead of the uniform evaluator
    #[arg(long)]
    pub onnx: bool,

    /// Vocabulary file used with --onnx
    #[arg(long, default_value_t = default_vocab_path())]
    pub vocab_path: String,

    /// Model file used with --onnx
    #[arg(long, default_value_t = default_model_path())]
    pub model_path: String,
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.battles == 0 {
            return Err(anyhow!("battles must be greater than 0"));
        }

        if self.turn_limit == 0 {
            return Err(anyhow!("turn_limit must be greater than 0"));
        }

        if self.name.is_empty() {
            return Err(anyhow!("name cannot be empty"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        if self.onnx && !cfg!(feature = "onnx") {
            return Err(anyhow!("--onnx requires building with the onnx feature"));
        }

        Ok(())
    }

    /// Central config with the CLI settings folded in.
    pub fn central(&self) -> CentralConfig {
        let mut central = CENTRAL_CONFIG.clone();
        central.mcts.num_iterations = self.num_iterations;
        if self.seed.is_some() {
            central.mcts.seed = self.seed;
        }
        central.model.vocab_path = self.vocab_path.clone();
        central.model.model_path = self.model_path.clone();
        central.player.name = self.name.clone();
        central
    }

    pub fn opponent_name(&self) -> String {
        format!("{}-2", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> RunConfig {
        RunConfig {
            battles: 1,
            format: FormatArg::Doubles,
            turn_limit: 50,
            num_iterations: 32,
            seed: Some(7),
            name: "MCTS".into(),
            log_level: "info".into(),
            onnx: false,
            vocab_path: "./data/vocab.json".into(),
            model_path: "./data/models/battle.onnx".into(),
        }
    }

    #[test]
    fn validate_accepts_valid_configuration() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_battles() {
        let mut cfg = base_config();
        cfg.battles = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("battles"));
    }

    #[test]
    fn validate_rejects_zero_turn_limit() {
        let mut cfg = base_config();
        cfg.turn_limit = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("turn_limit"));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut cfg = base_config();
        cfg.name.clear();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut cfg = base_config();
        cfg.log_level = "nope".into();
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid log level"));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn validate_rejects_onnx_without_feature() {
        let mut cfg = base_config();
        cfg.onnx = true;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("onnx feature"));
    }

    #[test]
    fn central_carries_cli_overrides() {
        let cfg = base_config();
        let central = cfg.central();
        assert_eq!(central.mcts.num_iterations, 32);
        assert_eq!(central.mcts.seed, Some(7));
        assert_eq!(central.player.name, "MCTS");
        assert_eq!(cfg.opponent_name(), "MCTS-2");
    }

    #[test]
    fn format_arg_converts() {
        assert_eq!(Format::from(FormatArg::Singles), Format::Singles);
        assert_eq!(Format::from(FormatArg::Doubles), Format::Doubles);
    }

    #[test]
    fn parses_command_line() {
        let cfg = RunConfig::parse_from([
            "player",
            "--battles",
            "3",
            "--format",
            "singles",
            "--seed",
            "11",
        ]);
        assert_eq!(cfg.battles, 3);
        assert_eq!(cfg.format, FormatArg::Singles);
        assert_eq!(cfg.seed, Some(11));
    }
}
