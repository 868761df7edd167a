use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::CommentData;
use crate::content::models::PostId;
use crate::inbound::http::router::AppState;

/// Comments under a post, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<ApiSuccess<Vec<CommentData>>, ApiError> {
    state
        .content_service
        .list_comments(PostId(post_id))
        .await
        .map_err(ApiError::from)
        .map(|comments| {
            ApiSuccess::new(
                StatusCode::OK,
                comments.iter().map(CommentData::from).collect(),
            )
        })
}
