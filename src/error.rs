use thiserror::Error;

/// Failures surfaced to the front ends. All of them are recoverable.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed or missing simulation fields; raised before any scoring.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The persisted collection cannot be read, parsed or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
    /// No scenario with this id in the current collection.
    #[error("scenario not found: {0}")]
    NotFound(u64),
    #[error("config error: {0}")]
    Config(String),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SimError::InvalidInput(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        SimError::StorageUnavailable(message.into())
    }
}
