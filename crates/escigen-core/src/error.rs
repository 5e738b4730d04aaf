use thiserror::Error;

/// Core error type shared across escigen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The serializer could not produce XML for an object graph.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A value could not be parsed into a domain type.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Convenience alias for results returned by escigen crates.
pub type Result<T> = std::result::Result<T, Error>;
