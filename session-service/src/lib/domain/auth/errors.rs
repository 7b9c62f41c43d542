use thiserror::Error;

use crate::domain::store::errors::StoreError;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,

    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for Password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password is required")]
    Empty,

    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Malformed or missing caller input. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    Username(#[from] UsernameError),

    #[error("{0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Top-level error for all authentication and session operations
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Deliberately carries no detail about which part of the check failed
    #[error("Invalid or expired session")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Operation cancelled or timed out")]
    Cancelled,
}

impl AuthError {
    /// Whether the caller may retry the operation (with backoff).
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::Cancelled)
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => {
                AuthError::Internal(format!("Password verification failed: {}", e))
            }
            auth::AuthenticationError::TokenError(e) => {
                AuthError::Internal(format!("Token generation failed: {}", e))
            }
        }
    }
}
