//! Model Loader - where predictors come from

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use super::predictor::{ModelError, Predictor};

/// Source of a fresh predictor, called on startup and on every reload
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Arc<dyn Predictor>, ModelError>;
    fn describe(&self) -> String;
}

// ============================================================================
// FILE LOADER
// ============================================================================

/// Loads a model file from the local filesystem
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    path: PathBuf,
}

impl FileModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// `local-<mtime>` with the modification time in fractional unix seconds
pub fn local_version(path: &Path) -> Result<String, ModelError> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| ModelError::Load(format!("{}: {}", path.display(), e)))?;
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Ok(format!("local-{}", secs))
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<Arc<dyn Predictor>, ModelError> {
    let version = local_version(path)?;
    let model = super::onnx::OnnxModel::load(path, version)?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(_path: &Path) -> Result<Arc<dyn Predictor>, ModelError> {
    Err(ModelError::UnsupportedFormat(
        "ONNX support not compiled in (build with `--features onnx`)".to_string(),
    ))
}

impl ModelLoader for FileModelLoader {
    fn load(&self) -> Result<Arc<dyn Predictor>, ModelError> {
        if !self.path.exists() {
            return Err(ModelError::NotFound(self.path.display().to_string()));
        }

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "onnx" => load_onnx(&self.path),
            other => Err(ModelError::UnsupportedFormat(format!(
                "`.{}` ({})",
                other,
                self.path.display()
            ))),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// STATIC LOADER
// ============================================================================

/// Hands out an already constructed predictor (embedding, tests)
#[derive(Clone)]
pub struct StaticLoader {
    predictor: Arc<dyn Predictor>,
}

impl StaticLoader {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }
}

impl ModelLoader for StaticLoader {
    fn load(&self) -> Result<Arc<dyn Predictor>, ModelError> {
        Ok(Arc::clone(&self.predictor))
    }

    fn describe(&self) -> String {
        format!("static:{}", self.predictor.version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file() {
        let loader = FileModelLoader::new("/nonexistent/model.onnx");
        assert!(matches!(loader.load(), Err(ModelError::NotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "tree").unwrap();

        let loader = FileModelLoader::new(file.path());
        assert!(matches!(loader.load(), Err(ModelError::UnsupportedFormat(_))));
    }

    #[cfg(feature = "onnx")]
    #[test]
    fn test_corrupt_onnx_file_is_load_error() {
        let mut file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();
        file.write_all(b"not a protobuf graph").unwrap();

        let loader = FileModelLoader::new(file.path());
        assert!(matches!(loader.load(), Err(ModelError::Load(_))));
    }

    #[cfg(not(feature = "onnx"))]
    #[test]
    fn test_onnx_without_runtime_is_unsupported() {
        let file = tempfile::Builder::new().suffix(".onnx").tempfile().unwrap();

        let loader = FileModelLoader::new(file.path());
        assert!(matches!(loader.load(), Err(ModelError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_local_version_prefix() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let version = local_version(file.path()).unwrap();
        assert!(version.starts_with("local-"));
    }
}
