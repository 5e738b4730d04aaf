use thiserror::Error;

/// Errors emitted while running a generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("configuration error: {0}")]
    Config(#[from] escigen_config::ConfigError),
    #[error("invalid content source: {0}")]
    Source(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] escigen_core::Error),
    #[error("manifest error: {0}")]
    Manifest(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
