//! Model Module - inference provider
//!
//! The serving path only sees `ModelRegistry`: loaded or not, a version
//! string, and `predict` over a `[n, FEATURE_COUNT]` batch.

pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod predictor;
pub mod registry;

pub use loader::{FileModelLoader, ModelLoader, StaticLoader};
pub use predictor::{ModelError, Predictor};
pub use registry::ModelRegistry;

/// Probabilities at or above this are class 1
pub const CLASS_THRESHOLD: f32 = 0.5;

pub fn classify(probability: f32) -> u8 {
    if probability >= CLASS_THRESHOLD {
        1
    } else {
        0
    }
}
