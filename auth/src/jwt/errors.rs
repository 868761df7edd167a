use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),

    #[error("Missing required claim: {0}")]
    MissingClaim(String),

    #[error("Signing key is not valid base64: {0}")]
    InvalidKey(String),

    #[error("Signing key too short: minimum {min} bytes, got {actual}")]
    WeakKey { min: usize, actual: usize },
}
