use thiserror::Error;

/// Failures raised by the embedded media engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine is not ready")]
    NotReady,

    #[error("unsupported media: {0}")]
    Unsupported(String),
}

/// Service-boundary errors for kino-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
