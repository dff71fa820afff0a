//! Evaluator trait for position evaluation.
//!
//! An evaluator turns an encoded perspective into a win-probability estimate
//! and one policy logit vector per active slot. In play this is a neural
//! network; for testing we provide a uniform evaluator that returns flat
//! logits.

use std::sync::Arc;

use engine_core::Perspective;
use thiserror::Error;

use crate::encoder::{EncodedState, StateEncoder};

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Policy head '{head}' has {actual} logits, expected {expected}")]
    PolicySize {
        head: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Raw model output for one perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    /// Probability that the side the perspective belongs to wins, in [0, 1].
    pub value: f32,

    /// Unnormalized logits for slot A, one per vocabulary action.
    pub policy_a: Vec<f32>,

    /// Unnormalized logits for slot B, one per vocabulary action.
    pub policy_b: Vec<f32>,
}

/// Trait for tensor evaluators.
///
/// Implementations could be:
/// - UniformEvaluator: Flat logits and a neutral value (for testing)
/// - OnnxEvaluator: Neural network inference (for play)
///
/// `evaluate` must not mutate observable state: one evaluator is shared by
/// every concurrent search.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, state: &EncodedState) -> Result<ModelOutput, EvaluatorError>;
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    fn evaluate(&self, state: &EncodedState) -> Result<ModelOutput, EvaluatorError> {
        (**self).evaluate(state)
    }
}

/// Uniform evaluator: all-zero logits (uniform after softmax) and value 0.5.
/// Useful for testing the search without a model.
#[derive(Debug, Clone)]
pub struct UniformEvaluator {
    num_actions: usize,
}

impl UniformEvaluator {
    pub fn new(num_actions: usize) -> Self {
        Self { num_actions }
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, _state: &EncodedState) -> Result<ModelOutput, EvaluatorError> {
        Ok(ModelOutput {
            value: 0.5,
            policy_a: vec![0.0; self.num_actions],
            policy_b: vec![0.0; self.num_actions],
        })
    }
}

/// Perspective-level evaluation: encodes, runs the tensor evaluator and
/// checks the output shape against the vocabulary.
pub struct ModelEvaluator<E> {
    encoder: StateEncoder,
    evaluator: E,
}

impl<E: Evaluator> ModelEvaluator<E> {
    pub fn new(encoder: StateEncoder, evaluator: E) -> Self {
        Self { encoder, evaluator }
    }

    pub fn encoder(&self) -> &StateEncoder {
        &self.encoder
    }

    pub fn inner(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluate(&self, perspective: &Perspective) -> Result<ModelOutput, EvaluatorError> {
        let state = self.encoder.encode(perspective);
        let output = self.evaluator.evaluate(&state)?;

        let expected = self.encoder.vocab().num_actions();
        for (head, logits) in [("policy_a", &output.policy_a), ("policy_b", &output.policy_b)] {
            if logits.len() != expected {
                return Err(EvaluatorError::PolicySize {
                    head,
                    expected,
                    actual: logits.len(),
                });
            }
        }
        Ok(output)
    }
}

/// Softmax over the positions where `mask` is true.
///
/// Masked-out positions are exactly 0. An all-false mask yields all zeros.
/// Positions beyond the shorter of the two inputs are treated as illegal.
pub fn masked_softmax(logits: &[f32], mask: &[bool]) -> Vec<f32> {
    let mut probs = vec![0.0; logits.len()];

    let legal = || {
        logits
            .iter()
            .zip(mask.iter())
            .enumerate()
            .filter(|(_, (_, m))| **m)
            .map(|(i, (l, _))| (i, *l))
    };

    let max = legal().map(|(_, l)| l).fold(f32::NEG_INFINITY, f32::max);
    if max == f32::NEG_INFINITY {
        return probs;
    }

    let mut sum = 0.0;
    for (i, l) in legal() {
        let e = (l - max).exp();
        probs[i] = e;
        sum += e;
    }
    if sum > 0.0 {
        for p in probs.iter_mut() {
            *p /= sum;
        }
    }
    probs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::Vocabulary;
    use engine_core::Dex;

    fn encoder(num_actions: usize) -> StateEncoder {
        let json = format!(
            r#"{{"species": {{}}, "actions": {{}}, "num_species": 2, "num_actions": {}}}"#,
            num_actions
        );
        let vocab = Vocabulary::from_json_str(&json, &Dex::new()).unwrap();
        StateEncoder::new(Arc::new(vocab))
    }

    struct FixedEvaluator(ModelOutput);

    impl Evaluator for FixedEvaluator {
        fn evaluate(&self, _state: &EncodedState) -> Result<ModelOutput, EvaluatorError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_masked_softmax_sums_to_one() {
        let logits = [1.0, 2.0, -3.0, 0.5, 4.0];
        let mask = [true, false, true, true, false];
        let probs = masked_softmax(&logits, &mask);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(probs[1], 0.0);
        assert_eq!(probs[4], 0.0);
        assert!(probs[0] > probs[3]);
        assert!(probs[3] > probs[2]);
    }

    #[test]
    fn test_masked_softmax_all_illegal() {
        let probs = masked_softmax(&[1.0, 2.0, 3.0], &[false, false, false]);
        assert_eq!(probs, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_masked_softmax_shift_invariant() {
        let logits = [0.3, -1.2, 2.5, 0.0];
        let mask = [true, true, false, true];
        let shifted: Vec<f32> = logits.iter().map(|l| l + 100.0).collect();

        let a = masked_softmax(&logits, &mask);
        let b = masked_softmax(&shifted, &mask);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_masked_softmax_large_logits_stable() {
        let probs = masked_softmax(&[1000.0, 1000.0, -1000.0], &[true, true, true]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
        assert_eq!(probs[2], 0.0);
    }

    #[test]
    fn test_masked_softmax_ignores_illegal_max() {
        // A huge illegal logit must not underflow the legal ones.
        let probs = masked_softmax(&[1e6, 0.0, 0.0], &[false, true, true]);
        assert_eq!(probs[0], 0.0);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_masked_softmax_short_mask() {
        let probs = masked_softmax(&[0.0, 0.0, 0.0], &[true]);
        assert_eq!(probs, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_uniform_evaluator() {
        let eval = UniformEvaluator::new(6);
        let out = eval.evaluate(&EncodedState::default()).unwrap();
        assert!((out.value - 0.5).abs() < 1e-6);
        assert_eq!(out.policy_a.len(), 6);
        assert!(out.policy_b.iter().all(|&l| l == 0.0));
    }

    #[test]
    fn test_model_evaluator_checks_policy_size() {
        let model = ModelEvaluator::new(
            encoder(4),
            FixedEvaluator(ModelOutput {
                value: 0.7,
                policy_a: vec![0.0; 4],
                policy_b: vec![0.0; 3],
            }),
        );
        let err = model.evaluate(&Perspective::default()).unwrap_err();
        assert!(matches!(
            err,
            EvaluatorError::PolicySize {
                head: "policy_b",
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_model_evaluator_passes_output() {
        let model = ModelEvaluator::new(encoder(3), Arc::new(UniformEvaluator::new(3)));
        let out = model.evaluate(&Perspective::default()).unwrap();
        assert_eq!(out.policy_a, vec![0.0; 3]);
        assert!((out.value - 0.5).abs() < 1e-6);
    }
}
