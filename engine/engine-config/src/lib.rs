//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic shared
//! by the search and the player binaries.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`VGC_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! VGC_<SECTION>_<KEY>=value
//!
//! Examples:
//!     VGC_COMMON_LOG_LEVEL=debug
//!     VGC_MODEL_VOCAB_PATH=/models/vocab.json
//!     VGC_MCTS_NUM_ITERATIONS=800
//!     VGC_MCTS_SEED=42
//!     VGC_PLAYER_PRINT_DEBUG=true
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;

#[cfg(test)]
mod tests;
