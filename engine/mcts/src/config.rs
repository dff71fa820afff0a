//! MCTS configuration parameters.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("c_puct must be finite and non-negative, got {0}")]
    InvalidCPuct(f32),

    #[error("dirichlet_alpha must be finite and non-negative, got {0}")]
    InvalidDirichletAlpha(f32),

    #[error("dirichlet_epsilon must be in [0, 1], got {0}")]
    InvalidDirichletEpsilon(f32),

    #[error("num_determinizations must be 1 (perfect-information search), got {0}")]
    UnsupportedDeterminizations(u32),
}

/// Configuration for the joint-action search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of select/simulate/update iterations per search.
    pub num_iterations: u32,

    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Number of hidden-information worlds searched. Reserved: only 1
    /// (search the single known state) is supported.
    pub num_determinizations: u32,

    /// Dirichlet noise alpha for root exploration.
    /// Set to 0.0 to disable noise (for evaluation/inference).
    pub dirichlet_alpha: f32,

    /// Fraction of prior that comes from Dirichlet noise at root.
    /// 0.25 means 75% prior + 25% noise.
    pub dirichlet_epsilon: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_iterations: 200,
            c_puct: 1.5,
            num_determinizations: 1,
            dirichlet_alpha: 0.3,
            dirichlet_epsilon: 0.25,
        }
    }
}

impl MctsConfig {
    /// Create config for play against other agents (with exploration noise).
    pub fn for_play() -> Self {
        Self::default()
    }

    /// Create config for evaluation (no noise).
    pub fn for_evaluation() -> Self {
        Self {
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_iterations: 32,
            c_puct: 1.5,
            num_determinizations: 1,
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
        }
    }

    /// Builder pattern: set number of iterations.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.num_iterations = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set Dirichlet alpha and epsilon.
    pub fn with_dirichlet(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Whether root noise is sampled at all.
    pub fn noise_enabled(&self) -> bool {
        self.dirichlet_alpha > 0.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(ConfigError::InvalidCPuct(self.c_puct));
        }
        if !self.dirichlet_alpha.is_finite() || self.dirichlet_alpha < 0.0 {
            return Err(ConfigError::InvalidDirichletAlpha(self.dirichlet_alpha));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(ConfigError::InvalidDirichletEpsilon(self.dirichlet_epsilon));
        }
        if self.num_determinizations != 1 {
            return Err(ConfigError::UnsupportedDeterminizations(
                self.num_determinizations,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_iterations, 200);
        assert_eq!(config.num_determinizations, 1);
        assert!((config.c_puct - 1.5).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(10)
            .with_c_puct(2.0)
            .with_dirichlet(0.5, 0.1);

        assert_eq!(config.num_iterations, 10);
        assert!((config.c_puct - 2.0).abs() < 1e-6);
        assert!((config.dirichlet_alpha - 0.5).abs() < 1e-6);
        assert!((config.dirichlet_epsilon - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_evaluation_config() {
        let config = MctsConfig::for_evaluation();
        assert!(!config.noise_enabled());
        assert!((config.dirichlet_epsilon).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_eps = MctsConfig::default().with_dirichlet(0.3, 1.5);
        assert_eq!(
            bad_eps.validate(),
            Err(ConfigError::InvalidDirichletEpsilon(1.5))
        );

        let bad_c = MctsConfig::default().with_c_puct(-1.0);
        assert_eq!(bad_c.validate(), Err(ConfigError::InvalidCPuct(-1.0)));

        let mut multi = MctsConfig::default();
        multi.num_determinizations = 4;
        assert_eq!(
            multi.validate(),
            Err(ConfigError::UnsupportedDeterminizations(4))
        );
    }
}
