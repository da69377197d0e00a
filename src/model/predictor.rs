//! Predictor trait and inference errors

use ndarray::ArrayView2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not loaded")]
    NotLoaded,

    #[error("model file not found: {0}")]
    NotFound(String),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to load model: {0}")]
    Load(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model returned {got} predictions for {expected} rows")]
    OutputShape { expected: usize, got: usize },
}

/// A loaded model able to score feature batches.
///
/// `predict` receives an `[n, FEATURE_COUNT]` matrix and returns `n`
/// probabilities in `[0, 1]`, in row order.
pub trait Predictor: Send + Sync {
    fn version(&self) -> &str;
    fn predict(&self, features: ArrayView2<'_, f32>) -> Result<Vec<f32>, ModelError>;
}
