//! ONNX Runtime evaluator for neural network inference.
//!
//! # Model Format
//!
//! The ONNX model is expected to have:
//! - Input: "species_ids" - shape (1, 8) int64
//! - Input: "numeric" - shape (1, 200) float32
//! - Outputs, in declaration order: value (1, 1), policy_a (1, num_actions),
//!   policy_b (1, num_actions), all float32
//!
//! Output names differ between exports, so they are resolved by position
//! once at load time.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use ndarray::Array2;
use ort::{session::Session, value::Value};
use tracing::{debug, info};

use crate::encoder::{EncodedState, NUMERIC_DIM, NUM_SPECIES_SLOTS};
use crate::evaluator::{Evaluator, EvaluatorError, ModelOutput};

/// Inference counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnnxStats {
    pub inference_count: u64,
    pub avg_inference_ms: f64,
}

/// ONNX Runtime evaluator that loads and runs the battle model.
///
/// Uses a Mutex internally because `Session::run` requires `&mut self`,
/// but the `Evaluator` trait uses `&self` for thread-safe sharing.
pub struct OnnxEvaluator {
    session: Mutex<Session>,
    /// value, policy_a, policy_b
    output_names: [String; 3],
    inference_count: AtomicU64,
    total_inference_time_us: AtomicU64,
}

impl std::fmt::Debug for OnnxEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEvaluator")
            .field("output_names", &self.output_names)
            .finish_non_exhaustive()
    }
}

impl OnnxEvaluator {
    /// Load an ONNX model from the given path.
    pub fn load<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self, EvaluatorError> {
        let model_path = model_path.as_ref();
        let session = Session::builder()
            .map_err(|e| {
                EvaluatorError::ModelError(format!("Failed to create session builder: {}", e))
            })?
            .with_intra_threads(intra_threads)
            .map_err(|e| EvaluatorError::ModelError(format!("Failed to set intra threads: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| EvaluatorError::ModelError(format!("Failed to load model: {}", e)))?;

        let evaluator = Self::from_session(session)?;
        info!(
            path = %model_path.display(),
            outputs = ?evaluator.output_names,
            "Loaded ONNX model"
        );
        Ok(evaluator)
    }

    /// Load an ONNX model from memory.
    pub fn load_from_memory(model_data: &[u8]) -> Result<Self, EvaluatorError> {
        let session = Session::builder()
            .map_err(|e| {
                EvaluatorError::ModelError(format!("Failed to create session builder: {}", e))
            })?
            .with_intra_threads(1)
            .map_err(|e| EvaluatorError::ModelError(format!("Failed to set intra threads: {}", e)))?
            .commit_from_memory(model_data)
            .map_err(|e| {
                EvaluatorError::ModelError(format!("Failed to load model from memory: {}", e))
            })?;

        Self::from_session(session)
    }

    fn from_session(session: Session) -> Result<Self, EvaluatorError> {
        if session.outputs.len() < 3 {
            return Err(EvaluatorError::ModelError(format!(
                "Expected 3 outputs (value, policy_a, policy_b), model has {}",
                session.outputs.len()
            )));
        }
        let output_names = [
            session.outputs[0].name.clone(),
            session.outputs[1].name.clone(),
            session.outputs[2].name.clone(),
        ];

        Ok(Self {
            session: Mutex::new(session),
            output_names,
            inference_count: AtomicU64::new(0),
            total_inference_time_us: AtomicU64::new(0),
        })
    }

    pub fn output_names(&self) -> &[String; 3] {
        &self.output_names
    }

    pub fn stats(&self) -> OnnxStats {
        let count = self.inference_count.load(Ordering::Relaxed);
        let total_us = self.total_inference_time_us.load(Ordering::Relaxed);
        OnnxStats {
            inference_count: count,
            avg_inference_ms: if count == 0 {
                0.0
            } else {
                total_us as f64 / count as f64 / 1000.0
            },
        }
    }
}

impl Evaluator for OnnxEvaluator {
    fn evaluate(&self, state: &EncodedState) -> Result<ModelOutput, EvaluatorError> {
        let species = Array2::from_shape_vec((1, NUM_SPECIES_SLOTS), state.species_ids.to_vec())
            .map_err(|e| {
                EvaluatorError::EvaluationFailed(format!("Failed to create species array: {}", e))
            })?;
        let numeric = Array2::from_shape_vec((1, NUMERIC_DIM), state.numeric.to_vec()).map_err(
            |e| EvaluatorError::EvaluationFailed(format!("Failed to create numeric array: {}", e)),
        )?;

        let species_value = Value::from_array(species).map_err(|e| {
            EvaluatorError::ModelError(format!("Failed to create species tensor: {}", e))
        })?;
        let numeric_value = Value::from_array(numeric).map_err(|e| {
            EvaluatorError::ModelError(format!("Failed to create numeric tensor: {}", e))
        })?;

        // Run inference - extract all data inside the lock scope
        let inference_start = Instant::now();
        let (value, policy_a, policy_b) = {
            let mut session = self.session.lock().map_err(|e| {
                EvaluatorError::EvaluationFailed(format!("Failed to acquire session lock: {}", e))
            })?;
            let outputs = session
                .run(ort::inputs![
                    "species_ids" => species_value,
                    "numeric" => numeric_value
                ])
                .map_err(|e| EvaluatorError::EvaluationFailed(format!("Inference failed: {}", e)))?;

            let mut extracted: [Vec<f32>; 3] = Default::default();
            for (slot, name) in extracted.iter_mut().zip(self.output_names.iter()) {
                let output = outputs.get(name.as_str()).ok_or_else(|| {
                    EvaluatorError::ModelError(format!("Missing {} output", name))
                })?;
                let (_shape, data) = output.try_extract_tensor::<f32>().map_err(|e| {
                    EvaluatorError::ModelError(format!("Failed to extract {} tensor: {}", name, e))
                })?;
                *slot = data.to_vec();
            }
            let [value, policy_a, policy_b] = extracted;
            let value = value
                .first()
                .copied()
                .ok_or_else(|| EvaluatorError::ModelError("Empty value output".to_string()))?;
            (value, policy_a, policy_b)
        };

        // Track inference timing for diagnostics
        let inference_time_us = inference_start.elapsed().as_micros() as u64;
        self.total_inference_time_us
            .fetch_add(inference_time_us, Ordering::Relaxed);
        let count = self.inference_count.fetch_add(1, Ordering::Relaxed) + 1;

        // Log stats periodically (every 10,000 inferences)
        #[allow(clippy::manual_is_multiple_of)]
        if count % 10_000 == 0 {
            let total_us = self.total_inference_time_us.load(Ordering::Relaxed);
            debug!(
                "ONNX inference stats: {} calls, avg {:.2}ms per call",
                count,
                (total_us / count) as f64 / 1000.0
            );
        }

        Ok(ModelOutput {
            value,
            policy_a,
            policy_b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let err = OnnxEvaluator::load("/nonexistent/battle.onnx", 1).unwrap_err();
        assert!(matches!(err, EvaluatorError::ModelError(_)));
    }

    #[test]
    fn test_load_garbage_bytes() {
        let err = OnnxEvaluator::load_from_memory(b"not an onnx model").unwrap_err();
        assert!(err.to_string().contains("Failed to load model from memory"));
    }
}
