//! Inference Engine - ONNX Runtime Integration
//!
//! Runs the booster exported to ONNX. Classifier exports carry a `label`
//! and a `probabilities` output; the positive-class column is served.

use std::path::Path;

use ndarray::ArrayView2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::predictor::{ModelError, Predictor};
use crate::features::FEATURE_COUNT;

/// Output preferred when the graph exposes several
const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxModel {
    session: Mutex<Session>,
    output_name: String,
    version: String,
}

impl OnnxModel {
    pub fn load(model_path: &Path, version: String) -> Result<Self, ModelError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        let session = Session::builder()
            .map_err(|e| ModelError::Load(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| ModelError::Load(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| ModelError::Load(format!("Failed to load model: {}", e)))?;

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelError::Load("No output defined".to_string()))?;

        tracing::debug!("ONNX model serves output `{}`", output_name);

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            version,
        })
    }
}

impl Predictor for OnnxModel {
    fn version(&self) -> &str {
        &self.version
    }

    fn predict(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>, ModelError> {
        let rows = features.nrows();
        if features.ncols() != FEATURE_COUNT {
            return Err(ModelError::Inference(format!(
                "expected {} columns, got {}",
                FEATURE_COUNT,
                features.ncols()
            )));
        }

        let input_tensor = Value::from_array(features.to_owned())
            .map_err(|e| ModelError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ModelError::Inference(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ModelError::Inference("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ModelError::Inference(format!("Extract error: {}", e)))?;

        positive_scores(data, rows)
    }
}

/// One score per row from a flat output tensor: `[n]` scores are served as
/// is, `[n, 2]` class probabilities yield the class-1 column.
fn positive_scores(data: &[f32], rows: usize) -> Result<Vec<f32>, ModelError> {
    match data.len() {
        n if n == rows => Ok(data.to_vec()),
        n if n == rows * 2 => Ok(data.chunks_exact(2).map(|pair| pair[1]).collect()),
        n => Err(ModelError::OutputShape {
            expected: rows,
            got: n,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_column_output() {
        assert_eq!(positive_scores(&[0.1, 0.9], 2).unwrap(), vec![0.1, 0.9]);
    }

    #[test]
    fn test_probability_pairs_take_positive_class() {
        let data = [0.8, 0.2, 0.3, 0.7, 0.5, 0.5];
        assert_eq!(positive_scores(&data, 3).unwrap(), vec![0.2, 0.7, 0.5]);
    }

    #[test]
    fn test_unexpected_length_is_shape_error() {
        assert!(matches!(
            positive_scores(&[0.1, 0.2, 0.3], 2),
            Err(ModelError::OutputShape { expected: 2, got: 3 })
        ));
        assert!(matches!(
            positive_scores(&[], 1),
            Err(ModelError::OutputShape { expected: 1, got: 0 })
        ));
    }
}
