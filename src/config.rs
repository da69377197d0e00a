//! Configuration module

use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (dev, staging, production)
    pub environment: String,

    /// Verbose logging
    pub debug: bool,

    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Model file served at startup and on reload
    pub model_path: PathBuf,

    /// Root directory for the JSONL prediction sink (disabled when unset)
    pub sink_dir: Option<PathBuf>,

    /// Sub-directory for prediction files under `sink_dir`
    pub sink_prefix: String,

    /// Collector endpoint for the HTTP prediction sink (disabled when unset)
    pub sink_url: Option<String>,

    /// HTTP sink request timeout
    pub sink_timeout_secs: u64,

    /// Emit one log event per served prediction
    pub log_predictions: bool,

    /// Metrics gateway for per-prediction data points (disabled when unset)
    pub metrics_url: Option<String>,

    /// Namespace attached to exported metrics
    pub metrics_namespace: String,

    /// Emit exported metric data points as log events
    pub log_metrics: bool,

    /// `json` for structured log lines, anything else for text
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            debug: false,
            host: "0.0.0.0".to_string(),
            port: 8000,
            model_path: PathBuf::from("model.onnx"),
            sink_dir: None,
            sink_prefix: "predictions".to_string(),
            sink_url: None,
            sink_timeout_secs: 5,
            log_predictions: false,
            metrics_url: None,
            metrics_namespace: "ModelDeployment".to_string(),
            log_metrics: false,
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup; unparseable values fall back
    /// to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            environment: non_empty("ENVIRONMENT").unwrap_or(defaults.environment),

            debug: non_empty("DEBUG").map(|v| parse_bool(&v)).unwrap_or(defaults.debug),

            host: non_empty("HOST").unwrap_or(defaults.host),

            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),

            model_path: non_empty("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),

            sink_dir: non_empty("SINK_DIR").map(PathBuf::from),

            sink_prefix: non_empty("SINK_PREFIX").unwrap_or(defaults.sink_prefix),

            sink_url: non_empty("SINK_URL"),

            sink_timeout_secs: non_empty("SINK_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sink_timeout_secs),

            log_predictions: non_empty("LOG_PREDICTIONS")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.log_predictions),

            metrics_url: non_empty("METRICS_URL"),

            metrics_namespace: non_empty("METRICS_NAMESPACE").unwrap_or(defaults.metrics_namespace),

            log_metrics: non_empty("LOG_METRICS")
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.log_metrics),

            log_format: non_empty("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.port, 8000);
        assert_eq!(config.environment, "dev");
        assert!(config.sink_dir.is_none());
        assert!(config.sink_url.is_none());
        assert!(config.metrics_url.is_none());
        assert_eq!(config.metrics_namespace, "ModelDeployment");
        assert!(!config.debug);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "9000"),
            ("DEBUG", "True"),
            ("ENVIRONMENT", "production"),
            ("SINK_DIR", "/var/lib/predictions"),
            ("MODEL_PATH", "/models/booster.onnx"),
            ("METRICS_URL", "http://gateway:9091/metrics"),
            ("LOG_METRICS", "yes"),
        ]));
        assert_eq!(config.metrics_url.as_deref(), Some("http://gateway:9091/metrics"));
        assert!(config.log_metrics);
        assert_eq!(config.port, 9000);
        assert!(config.debug);
        assert!(config.is_production());
        assert_eq!(config.sink_dir, Some(PathBuf::from("/var/lib/predictions")));
        assert_eq!(config.model_path, PathBuf::from("/models/booster.onnx"));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[("PORT", "eighty"), ("SINK_URL", "  ")]));
        assert_eq!(config.port, 8000);
        assert!(config.sink_url.is_none());
    }
}
