use auth::WeakPassword;
use thiserror::Error;

use crate::domain::errors::ErrorKind;

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username is required")]
    Blank,

    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Biography validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BiographyError {
    #[error("Biography too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for login identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginIdentifierError {
    #[error("Username or email is required")]
    Blank,

    #[error("Username or email too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all identity-related operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid biography: {0}")]
    InvalidBiography(#[from] BiographyError),

    #[error("Invalid login identifier: {0}")]
    InvalidLoginIdentifier(#[from] LoginIdentifierError),

    #[error("Weak password: {0}")]
    WeakPassword(#[from] WeakPassword),

    #[error("Passwords do not match")]
    PasswordMismatch,

    // Domain-level errors
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Token subject no longer resolves to an identity")]
    UnknownSubject,

    #[error("User not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl IdentityError {
    /// Category the HTTP boundary maps to a status code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidUsername(_)
            | IdentityError::InvalidEmail(_)
            | IdentityError::InvalidBiography(_)
            | IdentityError::InvalidLoginIdentifier(_)
            | IdentityError::WeakPassword(_)
            | IdentityError::PasswordMismatch => ErrorKind::Validation,
            IdentityError::UsernameTaken(_) | IdentityError::EmailTaken(_) => ErrorKind::Conflict,
            IdentityError::InvalidCredentials => ErrorKind::InvalidCredentials,
            IdentityError::InvalidToken | IdentityError::UnknownSubject => ErrorKind::InvalidToken,
            IdentityError::NotFound(_) => ErrorKind::NotFound,
            IdentityError::DatabaseError(_) | IdentityError::Unknown(_) => ErrorKind::Internal,
        }
    }

    /// Request field a validation or conflict error refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IdentityError::InvalidUsername(_) | IdentityError::UsernameTaken(_) => Some("username"),
            IdentityError::InvalidEmail(_) | IdentityError::EmailTaken(_) => Some("email"),
            IdentityError::InvalidBiography(_) => Some("biography"),
            IdentityError::InvalidLoginIdentifier(_) => Some("username_or_email"),
            IdentityError::WeakPassword(_) => Some("password"),
            IdentityError::PasswordMismatch => Some("confirm_password"),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}
