use mangoscan::Threshold;
use mangoscan_api::state::{
    DEFAULT_INFERENCE_TIMEOUT, DEFAULT_MAX_CONCURRENT_INFERENCES, DEFAULT_MAX_IMAGE_SIZE_BYTES,
    Limits,
};
use mangoscan_model_provider::{DEFAULT_MODEL_VERSION, ModelSource};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MODEL_PATH: &str = "model/mango_disease_model.onnx";
const DEFAULT_CLASSES_PATH: &str = "model/classes.txt";

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub min_confidence: Threshold,
    pub model: ModelSource,
    pub limits: Limits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;

        let min_confidence = match lookup("MIN_CONFIDENCE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Threshold::new)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(format!(
                        "MIN_CONFIDENCE: expected a number in [0, 1], got {:?}",
                        raw
                    ))
                })?,
            None => Threshold::default(),
        };

        let model = ModelSource {
            model_path: PathBuf::from(
                lookup("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            ),
            classes_path: PathBuf::from(
                lookup("CLASSES_PATH").unwrap_or_else(|| DEFAULT_CLASSES_PATH.to_string()),
            ),
            version: lookup("MODEL_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
        };

        let max_image_size_bytes =
            parse_or(&lookup, "MAX_IMAGE_SIZE_BYTES", DEFAULT_MAX_IMAGE_SIZE_BYTES)?;
        if max_image_size_bytes == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_IMAGE_SIZE_BYTES: must be positive".to_string(),
            ));
        }

        let default_timeout_ms = DEFAULT_INFERENCE_TIMEOUT.as_millis() as u64;
        let timeout_ms: u64 = parse_or(&lookup, "INFERENCE_TIMEOUT_MS", default_timeout_ms)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "INFERENCE_TIMEOUT_MS: must be positive".to_string(),
            ));
        }

        let max_concurrent_inferences = parse_or(
            &lookup,
            "MAX_CONCURRENT_INFERENCES",
            DEFAULT_MAX_CONCURRENT_INFERENCES,
        )?;
        if max_concurrent_inferences == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_CONCURRENT_INFERENCES: must be positive".to_string(),
            ));
        }

        Ok(Config {
            port,
            min_confidence,
            model,
            limits: Limits {
                max_image_size_bytes,
                inference_timeout: Duration::from_millis(timeout_ms),
                max_concurrent_inferences,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{}: {:?}", key, raw))),
        None => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(var) => write!(f, "Invalid value for: {}", var),
        }
    }
}

impl std::error::Error for ConfigError {}
