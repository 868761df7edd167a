use std::fmt;
use std::str::FromStr;

use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;

use crate::identity::errors::BiographyError;
use crate::identity::errors::EmailError;
use crate::identity::errors::LoginIdentifierError;
use crate::identity::errors::UsernameError;

/// Identity aggregate entity.
///
/// Represents a registered account. The username doubles as the token subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub biography: Option<Biography>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity unique identifier type, assigned by storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityId(pub i64);

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is non-blank and 3-50 characters long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 50;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `Blank` - Username is empty or whitespace
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 50 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.trim().is_empty() {
            return Err(UsernameError::Blank);
        }

        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `TooLong` - Longer than 100 characters
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-text profile biography, at most 500 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Biography(String);

impl Biography {
    const MAX_LENGTH: usize = 500;

    pub fn new(biography: String) -> Result<Self, BiographyError> {
        let length = biography.chars().count();
        if length > Self::MAX_LENGTH {
            Err(BiographyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(biography))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Username or email typed into the login form.
///
/// Not validated as either; it is only looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentifier(String);

impl LoginIdentifier {
    const MAX_LENGTH: usize = 100;

    pub fn new(identifier: String) -> Result<Self, LoginIdentifierError> {
        if identifier.trim().is_empty() {
            return Err(LoginIdentifierError::Blank);
        }

        let length = identifier.chars().count();
        if length > Self::MAX_LENGTH {
            Err(LoginIdentifierError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(identifier))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity fields as handed to storage on registration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdentity {
    pub username: Username,
    pub email: EmailAddress,
    pub password_hash: String,
    pub biography: Option<Biography>,
}

/// Identity view with activity counters.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityProfile {
    pub identity: Identity,
    pub post_count: i64,
    pub comment_count: i64,
}

/// Outcome of register, login and refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub tokens: TokenPair,
    pub profile: IdentityProfile,
}

/// Command to register a new identity with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub password: String,
    pub confirm_password: String,
    pub biography: Option<Biography>,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `password` - Plain text password (strength checked and hashed by service)
    /// * `confirm_password` - Must equal `password`
    /// * `biography` - Optional validated biography
    pub fn new(
        username: Username,
        email: EmailAddress,
        password: String,
        confirm_password: String,
        biography: Option<Biography>,
    ) -> Self {
        Self {
            username,
            email,
            password,
            confirm_password,
            biography,
        }
    }
}

/// Command to log in with a username or email.
#[derive(Debug)]
pub struct LoginCommand {
    pub identifier: LoginIdentifier,
    pub password: String,
}

/// Command to update profile fields.
///
/// All fields are optional to support partial updates.
/// Only provided fields will be updated.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
    pub biography: Option<Biography>,
    pub cover_image: Option<String>,
}
