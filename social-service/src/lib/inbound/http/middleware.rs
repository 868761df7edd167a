use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::access;
use super::handlers::ApiError;
use crate::identity::errors::IdentityError;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: IdentityId,
    pub username: String,
}

impl From<&Identity> for AuthenticatedUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            username: identity.username.as_str().to_string(),
        }
    }
}

/// Middleware that resolves a bearer token into an [`AuthenticatedUser`].
///
/// Never rejects a request. A missing, malformed, expired or unresolvable
/// token leaves the request anonymous; [`require_identity`] decides whether
/// that is acceptable for the route.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()).map(str::to_owned) {
        match resolve(&state, &token).await {
            Ok(user) => {
                req.extensions_mut().insert(user);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Bearer token rejected; continuing unauthenticated");
            }
        }
    }

    next.run(req).await
}

async fn resolve(state: &AppState, token: &str) -> Result<AuthenticatedUser, IdentityError> {
    let identity = state.auth_service.resolve_from_token(token).await?;
    Ok(AuthenticatedUser::from(&identity))
}

/// Route guard: anonymous callers only reach routes on the public allow-list.
pub async fn require_identity(req: Request, next: Next) -> Result<Response, ApiError> {
    let authenticated = req.extensions().get::<AuthenticatedUser>().is_some();

    if authenticated || access::is_public(req.method(), req.uri().path()) {
        Ok(next.run(req).await)
    } else {
        Err(ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Token from an `Authorization: Bearer <token>` header, if present.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
