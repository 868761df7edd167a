use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Shortest HMAC key accepted for signing (256 bits).
pub const MIN_KEY_LENGTH: usize = 32;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. The HMAC variant follows the key length:
/// 64+ bytes sign with HS512, 48+ bytes with HS384, anything shorter with
/// HS256. Keys under 32 bytes are refused.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Raw key bytes (already decoded)
    ///
    /// # Returns
    /// JwtHandler instance configured with the HMAC algorithm matching the key size
    ///
    /// # Errors
    /// * `WeakKey` - Key is shorter than 256 bits
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: algorithm_for_key(secret)?,
        })
    }

    /// Signing algorithm selected for this key.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Encode claims into a JWT token.
    ///
    /// # Arguments
    /// * `claims` - Claims to encode (must implement Serialize)
    ///
    /// # Returns
    /// JWT token string
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode a JWT token and verify its signature.
    ///
    /// Expiry is deliberately not checked here; callers decide liveness
    /// against their own clock.
    ///
    /// # Arguments
    /// * `token` - JWT token string to decode
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `InvalidToken` - Signature is invalid, token is malformed or payload undecodable
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let token_data = decode::<T>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

fn algorithm_for_key(secret: &[u8]) -> Result<Algorithm, JwtError> {
    match secret.len() {
        len if len >= 64 => Ok(Algorithm::HS512),
        len if len >= 48 => Ok(Algorithm::HS384),
        len if len >= MIN_KEY_LENGTH => Ok(Algorithm::HS256),
        len => Err(JwtError::WeakKey {
            min: MIN_KEY_LENGTH,
            actual: len,
        }),
    }
}
