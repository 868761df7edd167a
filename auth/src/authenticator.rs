use crate::jwt::JwtError;
use crate::jwt::TokenCodec;
use crate::jwt::TokenConfig;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::WeakPassword;

/// Scheme name reported alongside issued tokens.
pub const BEARER_TOKEN_TYPE: &str = "Bearer";

/// Verified against when no stored hash exists, so unknown identities cost
/// the same Argon2 work as a wrong password.
const DUMMY_PASSWORD: &str = "unknown-identity-placeholder-1";

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and the token codec.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    dummy_hash: String,
}

/// Access and refresh tokens issued together for one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"Bearer"`
    pub token_type: String,
    /// Access token lifetime in whole seconds
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with default hashing cost.
    ///
    /// # Arguments
    /// * `config` - Token signing key and lifetimes
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `WeakKey` - Signing key is shorter than 256 bits
    pub fn new(config: TokenConfig) -> Result<Self, JwtError> {
        Ok(Self::from_parts(PasswordHasher::new(), TokenCodec::new(config)?))
    }

    /// Assemble an authenticator from an existing hasher and codec.
    ///
    /// Hashes a placeholder password once with the hasher's parameters.
    pub fn from_parts(password_hasher: PasswordHasher, token_codec: TokenCodec) -> Self {
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD).unwrap_or_default();

        Self {
            password_hasher,
            token_codec,
            dummy_hash,
        }
    }

    pub fn token_codec(&self) -> &TokenCodec {
        &self.token_codec
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Apply the password strength policy.
    pub fn check_password_strength(&self, password: &str) -> Result<(), WeakPassword> {
        self.password_hasher.check_strength(password)
    }

    /// Issue a fresh access/refresh pair for `subject`.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.token_codec.issue_access(subject)?,
            refresh_token: self.token_codec.issue_refresh(subject)?,
            token_type: BEARER_TOKEN_TYPE.to_string(),
            expires_in: self.token_codec.access_ttl_millis() / 1000,
        })
    }

    /// Verify credentials and issue a token pair.
    ///
    /// A missing stored hash (unknown identity) fails exactly like a wrong
    /// password, after verifying against a placeholder hash of the same cost.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash, if the identity exists
    /// * `subject` - Subject to put in the issued tokens
    ///
    /// # Returns
    /// TokenPair for the subject
    ///
    /// # Errors
    /// * `InvalidCredentials` - Identity unknown or password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: Option<&str>,
        subject: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        let verified = match stored_hash {
            Some(hash) => self.password_hasher.verify(password, hash),
            None => {
                self.password_hasher.verify(password, &self.dummy_hash);
                false
            }
        };

        if !verified {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(subject)?)
    }
}
