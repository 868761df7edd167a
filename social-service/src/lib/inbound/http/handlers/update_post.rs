use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::create_post::PostRequest;
use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::content::models::PostId;
use crate::content::models::UpdatePostCommand;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<PostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let command = UpdatePostCommand {
        content: body.content()?,
        image: body.image,
    };

    state
        .content_service
        .update_post(PostId(post_id), command, caller.id)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::OK, post.into()))
}
