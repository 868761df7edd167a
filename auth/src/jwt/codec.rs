use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::JwtError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Immutable token settings loaded once at startup.
#[derive(Clone)]
pub struct TokenConfig {
    signing_key: Vec<u8>,
    access_ttl_millis: i64,
    refresh_ttl_millis: i64,
}

impl TokenConfig {
    /// Build a token configuration from raw key bytes.
    ///
    /// # Arguments
    /// * `signing_key` - HMAC key material
    /// * `access_ttl_millis` - Access token lifetime
    /// * `refresh_ttl_millis` - Refresh token lifetime
    pub fn new(signing_key: Vec<u8>, access_ttl_millis: i64, refresh_ttl_millis: i64) -> Self {
        Self {
            signing_key,
            access_ttl_millis,
            refresh_ttl_millis,
        }
    }

    /// Build a token configuration from base64-encoded key material.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is not valid base64
    pub fn from_base64_secret(
        secret: &str,
        access_ttl_millis: i64,
        refresh_ttl_millis: i64,
    ) -> Result<Self, JwtError> {
        let signing_key = STANDARD
            .decode(secret.trim())
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Ok(Self::new(signing_key, access_ttl_millis, refresh_ttl_millis))
    }

    pub fn access_ttl_millis(&self) -> i64 {
        self.access_ttl_millis
    }

    pub fn refresh_ttl_millis(&self) -> i64 {
        self.refresh_ttl_millis
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_key", &"<redacted>")
            .field("access_ttl_millis", &self.access_ttl_millis)
            .field("refresh_ttl_millis", &self.refresh_ttl_millis)
            .finish()
    }
}

/// Creates and inspects signed, expiring bearer tokens.
///
/// Tokens are never stored: validity is derived from signature, expiry and
/// kind each time a token is presented. The predicates (`is_live`,
/// `is_refresh`) fail closed and never report why a token was rejected.
pub struct TokenCodec {
    handler: JwtHandler,
    access_ttl_millis: i64,
    refresh_ttl_millis: i64,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec reading wall-clock time.
    ///
    /// # Errors
    /// * `WeakKey` - Signing key is shorter than 256 bits
    pub fn new(config: TokenConfig) -> Result<Self, JwtError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a codec reading time from the given clock.
    ///
    /// # Errors
    /// * `WeakKey` - Signing key is shorter than 256 bits
    pub fn with_clock(config: TokenConfig, clock: Arc<dyn Clock>) -> Result<Self, JwtError> {
        Ok(Self {
            handler: JwtHandler::new(&config.signing_key)?,
            access_ttl_millis: config.access_ttl_millis,
            refresh_ttl_millis: config.refresh_ttl_millis,
            clock,
        })
    }

    pub fn access_ttl_millis(&self) -> i64 {
        self.access_ttl_millis
    }

    pub fn refresh_ttl_millis(&self) -> i64 {
        self.refresh_ttl_millis
    }

    /// Issue a signed token valid from now until `now + ttl_millis`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, kind: TokenKind, ttl_millis: i64) -> Result<String, JwtError> {
        let claims = Claims::issued(subject, kind, self.clock.now_millis(), ttl_millis);
        self.handler.encode(&claims)
    }

    /// Issue an access token with the configured access lifetime.
    pub fn issue_access(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, TokenKind::Access, self.access_ttl_millis)
    }

    /// Issue a refresh token with the configured refresh lifetime.
    pub fn issue_refresh(&self, subject: &str) -> Result<String, JwtError> {
        self.issue(subject, TokenKind::Refresh, self.refresh_ttl_millis)
    }

    /// Verify signature and decode claims. Expiry is not checked.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature invalid, payload malformed or undecodable
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.handler.decode(token)
    }

    /// True iff the token verifies and has not yet expired.
    pub fn is_live(&self, token: &str) -> bool {
        self.verify(token)
            .map(|claims| !claims.is_expired(self.clock.now_millis()))
            .unwrap_or(false)
    }

    /// True iff the token verifies and carries the refresh marker.
    pub fn is_refresh(&self, token: &str) -> bool {
        self.verify(token)
            .map(|claims| claims.kind() == TokenKind::Refresh)
            .unwrap_or(false)
    }

    /// Extract the subject claim.
    ///
    /// # Errors
    /// * `InvalidToken` - Token does not verify
    /// * `MissingClaim` - Token has no subject
    pub fn subject_of(&self, token: &str) -> Result<String, JwtError> {
        self.verify(token)?
            .sub
            .ok_or_else(|| JwtError::MissingClaim("sub".to_string()))
    }

    /// Milliseconds until the token expires; 0 when it cannot be read.
    pub fn remaining_millis(&self, token: &str) -> i64 {
        self.verify(token)
            .ok()
            .and_then(|claims| claims.expires_at_millis())
            .map(|expires_at| expires_at - self.clock.now_millis())
            .unwrap_or(0)
    }
}
