use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Sessions are stateless, so there is nothing to tear down server-side.
/// Issued tokens stay valid until they expire; clients discard them.
pub async fn logout(
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    tracing::info!(identity_id = %caller.id, "Logout requested");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MessageData {
            message: "Logged out".to_string(),
        },
    ))
}
