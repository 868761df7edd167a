use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CommentData;
use crate::content::errors::ContentError;
use crate::content::models::CommentContent;
use crate::content::models::CreateCommentCommand;
use crate::content::models::PostId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<CommentRequest>,
) -> Result<ApiSuccess<CommentData>, ApiError> {
    let content = CommentContent::new(body.content).map_err(ContentError::InvalidCommentContent)?;

    state
        .content_service
        .create_comment(PostId(post_id), caller.id, CreateCommentCommand { content })
        .await
        .map_err(ApiError::from)
        .map(|ref comment| ApiSuccess::new(StatusCode::CREATED, comment.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentRequest {
    content: String,
}
