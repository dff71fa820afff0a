//! Locating, reading and overriding the central configuration.

use crate::CentralConfig;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Places probed for a config file, in order, when `VGC_CONFIG` is unset.
pub const CONFIG_SEARCH_PATHS: &[&str] = &["config.toml", "../config.toml", "config/vgc.toml"];

/// Load the configuration used by the player binaries.
///
/// `VGC_CONFIG` names the file explicitly; otherwise the first existing entry
/// of [`CONFIG_SEARCH_PATHS`] is used, and with no file at all the embedded
/// defaults apply. Environment overrides are layered on in every case.
pub fn load_config() -> CentralConfig {
    if let Ok(explicit) = std::env::var("VGC_CONFIG") {
        let path = PathBuf::from(&explicit);
        if path.exists() {
            info!(path = %path.display(), "Loading config from VGC_CONFIG");
            return load_from_path(&path);
        }
        warn!(path = %explicit, "VGC_CONFIG points to a missing file, searching defaults");
    }

    match CONFIG_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
    {
        Some(path) => {
            info!(path = %path.display(), "Loading config");
            load_from_path(&path)
        }
        None => {
            debug!("No config file found, using embedded defaults");
            defaults_with_env()
        }
    }
}

/// Read and parse one config file. A file that cannot be read or parsed is
/// reported and replaced by the embedded defaults.
pub fn load_from_path(path: &PathBuf) -> CentralConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Unreadable config, using defaults");
            return defaults_with_env();
        }
    };
    match toml::from_str::<CentralConfig>(&content) {
        Ok(config) => apply_env_overrides(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed config, using defaults");
            defaults_with_env()
        }
    }
}

fn defaults_with_env() -> CentralConfig {
    apply_env_overrides(CentralConfig::default())
}

/// `VGC_*` variable to config field. Unparseable values are ignored.
macro_rules! env_override {
    // plain string
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // FromStr
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = v;
        }
    };
    // FromStr into an Option
    ($config:expr, $section:ident . $field:ident, $key:expr, optional_parse) => {
        if let Ok(v) =
            std::env::var($key).and_then(|s| s.parse().map_err(|_| std::env::VarError::NotPresent))
        {
            $config.$section.$field = Some(v);
        }
    };
}

/// Overlay `VGC_<SECTION>_<KEY>` environment variables onto `config`.
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.data_dir, "VGC_COMMON_DATA_DIR");
    env_override!(config, common.log_level, "VGC_COMMON_LOG_LEVEL");

    // Model
    env_override!(config, model.vocab_path, "VGC_MODEL_VOCAB_PATH");
    env_override!(config, model.model_path, "VGC_MODEL_MODEL_PATH");
    env_override!(
        config,
        model.onnx_intra_threads,
        "VGC_MODEL_ONNX_INTRA_THREADS",
        parse
    );

    // MCTS
    env_override!(
        config,
        mcts.num_iterations,
        "VGC_MCTS_NUM_ITERATIONS",
        parse
    );
    env_override!(config, mcts.c_puct, "VGC_MCTS_C_PUCT", parse);
    env_override!(
        config,
        mcts.num_determinizations,
        "VGC_MCTS_NUM_DETERMINIZATIONS",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_alpha,
        "VGC_MCTS_DIRICHLET_ALPHA",
        parse
    );
    env_override!(
        config,
        mcts.dirichlet_epsilon,
        "VGC_MCTS_DIRICHLET_EPSILON",
        parse
    );
    env_override!(config, mcts.seed, "VGC_MCTS_SEED", optional_parse);

    // Player
    env_override!(config, player.name, "VGC_PLAYER_NAME");
    env_override!(
        config,
        player.print_debug,
        "VGC_PLAYER_PRINT_DEBUG",
        parse
    );

    config
}
