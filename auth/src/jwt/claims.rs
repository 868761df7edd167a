use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Value of the `type` claim carried by refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

const TOKEN_TYPE_CLAIM: &str = "type";

/// Which lifecycle a token belongs to.
///
/// Access tokens carry no `type` claim; refresh tokens carry `type = "refresh"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure.
///
/// Standard `sub`, `iat` and `exp` claims (Unix seconds) plus any other
/// fields via the flattened `extra` map, which is where the token kind marker
/// lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Claims {
    /// Subject (username of the identity the token was issued to)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// `exp` is whole seconds; rounding up keeps every issued token live for at
/// least its full TTL.
fn ceil_seconds(millis: i64) -> i64 {
    (millis + 999).div_euclid(1000)
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a freshly issued token.
    ///
    /// # Arguments
    /// * `subject` - Identity the token refers to
    /// * `kind` - Access or refresh
    /// * `now_millis` - Issuance instant (ms since epoch)
    /// * `ttl_millis` - Lifetime in milliseconds
    ///
    /// # Returns
    /// Claims with sub, iat, exp and (for refresh tokens) the type marker set
    pub fn issued(subject: impl ToString, kind: TokenKind, now_millis: i64, ttl_millis: i64) -> Self {
        let claims = Self::new()
            .with_subject(subject)
            .with_issued_at(now_millis.div_euclid(1000))
            .with_expiration(ceil_seconds(now_millis + ttl_millis));

        match kind {
            TokenKind::Access => claims,
            TokenKind::Refresh => claims.with_extra(TOKEN_TYPE_CLAIM, REFRESH_TOKEN_TYPE),
        }
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Token kind derived from the `type` claim.
    ///
    /// Anything other than the exact string `"refresh"` is an access token.
    pub fn kind(&self) -> TokenKind {
        match self.extra.get(TOKEN_TYPE_CLAIM).and_then(|v| v.as_str()) {
            Some(REFRESH_TOKEN_TYPE) => TokenKind::Refresh,
            _ => TokenKind::Access,
        }
    }

    /// Expiry instant in milliseconds since epoch.
    pub fn expires_at_millis(&self) -> Option<i64> {
        self.exp.map(|exp| exp.saturating_mul(1000))
    }

    /// Check if token is expired.
    ///
    /// A token is expired only when its expiry lies strictly before `now`;
    /// at the exact expiry instant it is still live. Tokens without an `exp`
    /// claim count as expired.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.expires_at_millis()
            .map_or(true, |expires_at| expires_at < now_millis)
    }
}
