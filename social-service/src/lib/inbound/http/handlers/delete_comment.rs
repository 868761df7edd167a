use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::content::models::CommentId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// Either the comment's author or the hosting post's author may delete it.
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<i64>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ApiError> {
    state
        .content_service
        .delete_comment(CommentId(comment_id), caller.id)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
