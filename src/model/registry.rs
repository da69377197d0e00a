//! Model Registry - the currently served predictor

use std::sync::Arc;

use parking_lot::RwLock;

use super::loader::ModelLoader;
use super::predictor::{ModelError, Predictor};
use crate::features::{to_matrix, FeatureVector};

pub struct ModelRegistry {
    loader: Box<dyn ModelLoader>,
    current: RwLock<Option<Arc<dyn Predictor>>>,
}

impl ModelRegistry {
    /// Registry with nothing loaded yet
    pub fn new(loader: impl ModelLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            current: RwLock::new(None),
        }
    }

    /// Create and attempt an initial load. A failed load is logged and the
    /// registry stays unloaded.
    pub fn load_initial(loader: impl ModelLoader + 'static) -> Self {
        let registry = Self::new(loader);
        if let Err(e) = registry.reload() {
            tracing::error!("Model failed to load from {}: {}", registry.loader.describe(), e);
        }
        registry
    }

    /// Drop the current model and load a fresh one.
    ///
    /// The registry is unloaded while loading and stays unloaded on failure.
    pub fn reload(&self) -> Result<String, ModelError> {
        tracing::info!("Loading model from {}", self.loader.describe());
        *self.current.write() = None;

        let predictor = self.loader.load()?;
        let version = predictor.version().to_string();
        *self.current.write() = Some(predictor);

        tracing::info!("Model loaded successfully. Version: {}", version);
        Ok(version)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn version(&self) -> Option<String> {
        self.current.read().as_ref().map(|p| p.version().to_string())
    }

    pub fn current(&self) -> Option<Arc<dyn Predictor>> {
        self.current.read().clone()
    }

    /// Score a batch of vectors, one probability per vector.
    ///
    /// Returns the version that produced the scores alongside them so a
    /// concurrent reload cannot mislabel the results.
    pub fn predict(&self, vectors: &[FeatureVector]) -> Result<(Vec<f32>, String), ModelError> {
        let predictor = self.current().ok_or(ModelError::NotLoaded)?;

        let matrix = to_matrix(vectors);
        let scores = predictor.predict(matrix.view())?;
        if scores.len() != vectors.len() {
            return Err(ModelError::OutputShape {
                expected: vectors.len(),
                got: scores.len(),
            });
        }

        Ok((scores, predictor.version().to_string()))
    }
}
