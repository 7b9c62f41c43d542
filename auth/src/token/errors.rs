use thiserror::Error;

/// Error type for token generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token length must be at least one byte")]
    EmptyLength,

    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
