use thiserror::Error;

/// Errors raised by port implementations
#[derive(Error, Debug)]
pub enum PortError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid artifact name: {0}")]
    InvalidArtifactName(String),

    #[error("No async runtime available: {0}")]
    NoRuntime(String),
}

pub type PortResult<T> = std::result::Result<T, PortError>;
