//! Authentication utilities library
//!
//! Provides the stateless credential core used by the social service:
//! - Password hashing (Argon2id) and a strength policy
//! - Signed, expiring access and refresh tokens (HMAC JWT)
//! - Authentication coordination
//!
//! Nothing here touches storage. Callers look up identities themselves and
//! hand the stored hash to [`Authenticator::authenticate`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Secret123").unwrap();
//! assert!(hasher.verify("Secret123", &hash));
//! assert!(!hasher.verify("Wrong1234", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenCodec, TokenConfig};
//!
//! let config = TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     86_400_000,
//!     604_800_000,
//! );
//! let codec = TokenCodec::new(config).unwrap();
//!
//! let token = codec.issue_refresh("alice").unwrap();
//! assert!(codec.is_live(&token));
//! assert!(codec.is_refresh(&token));
//! assert_eq!(codec.subject_of(&token).unwrap(), "alice");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, TokenConfig};
//!
//! let config = TokenConfig::new(
//!     b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     86_400_000,
//!     604_800_000,
//! );
//! let auth = Authenticator::new(config).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("Secret123").unwrap();
//!
//! // Login: verify and issue tokens
//! let pair = auth.authenticate("Secret123", Some(&hash), "alice").unwrap();
//! assert_eq!(pair.token_type, "Bearer");
//! assert!(auth.token_codec().is_live(&pair.access_token));
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenCodec;
pub use jwt::TokenConfig;
pub use jwt::TokenKind;
pub use password::check_strength;
pub use password::HashParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::WeakPassword;
