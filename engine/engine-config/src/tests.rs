//! Tests for the configuration module.

use super::*;

#[test]
fn test_default_config() {
    let config = CentralConfig::default();
    assert_eq!(config.common.data_dir, "./data");
    assert_eq!(config.common.log_level, "info");
    assert_eq!(config.model.vocab_path, "./data/vocab.json");
    assert_eq!(config.model.model_path, "./data/models/battle.onnx");
    assert_eq!(config.player.name, "MCTS");
    assert!(!config.player.print_debug);
}

#[test]
fn test_mcts_defaults() {
    let config = CentralConfig::default();
    assert_eq!(config.mcts.num_iterations, 200);
    assert!((config.mcts.c_puct - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.mcts.num_determinizations, 1);
    assert!((config.mcts.dirichlet_alpha - 0.3).abs() < f64::EPSILON);
    assert!((config.mcts.dirichlet_epsilon - 0.25).abs() < f64::EPSILON);
    assert_eq!(config.mcts.seed, None);
}

#[test]
fn test_vgc_env_overrides() {
    std::env::set_var("VGC_MCTS_NUM_ITERATIONS", "64");
    std::env::set_var("VGC_MCTS_SEED", "7");
    std::env::set_var("VGC_PLAYER_NAME", "Alice");
    std::env::set_var("VGC_PLAYER_PRINT_DEBUG", "true");
    // Unparseable values leave the field alone
    std::env::set_var("VGC_MCTS_C_PUCT", "lots");

    let config = apply_env_overrides(CentralConfig::default());
    assert_eq!(config.mcts.num_iterations, 64);
    assert_eq!(config.mcts.seed, Some(7));
    assert_eq!(config.player.name, "Alice");
    assert!(config.player.print_debug);
    assert!((config.mcts.c_puct - 1.5).abs() < f64::EPSILON);

    std::env::remove_var("VGC_MCTS_NUM_ITERATIONS");
    std::env::remove_var("VGC_MCTS_SEED");
    std::env::remove_var("VGC_PLAYER_NAME");
    std::env::remove_var("VGC_PLAYER_PRINT_DEBUG");
    std::env::remove_var("VGC_MCTS_C_PUCT");
}

#[test]
fn test_parse_config_toml() {
    let toml_content = r#"
[common]
log_level = "debug"

[model]
vocab_path = "/models/vocab.json"
onnx_intra_threads = 4

[mcts]
num_iterations = 800
dirichlet_alpha = 0.0
seed = 1234

[player]
name = "Bob"
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert_eq!(config.common.log_level, "debug");
    assert_eq!(config.model.vocab_path, "/models/vocab.json");
    assert_eq!(config.model.onnx_intra_threads, 4);
    assert_eq!(config.mcts.num_iterations, 800);
    assert_eq!(config.mcts.dirichlet_alpha, 0.0);
    assert_eq!(config.mcts.seed, Some(1234));
    assert_eq!(config.player.name, "Bob");
}

#[test]
fn test_partial_config() {
    let toml_content = r#"
[mcts]
c_puct = 2.0
"#;
    let config: CentralConfig = toml::from_str(toml_content).unwrap();
    assert!((config.mcts.c_puct - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.mcts.num_iterations, 200); // Default
    assert_eq!(config.common.data_dir, "./data"); // Default
    assert_eq!(config.player.name, "MCTS"); // Default
}

#[test]
fn test_load_from_path_falls_back_on_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    std::fs::write(&path, "[mcts\ndirichlet_epsilon = ").unwrap();
    let config = load_from_path(&path);
    assert!((config.mcts.dirichlet_epsilon - 0.25).abs() < f64::EPSILON);

    std::fs::write(&path, "[mcts]\ndirichlet_epsilon = 0.5\n").unwrap();
    let config = load_from_path(&path);
    assert!((config.mcts.dirichlet_epsilon - 0.5).abs() < f64::EPSILON);

    // Missing files fall back as well
    let config = load_from_path(&dir.path().join("missing.toml"));
    assert_eq!(config.common.data_dir, "./data");
}
