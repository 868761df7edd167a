use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::PostData;
use crate::content::errors::ContentError;
use crate::content::models::CreatePostCommand;
use crate::content::models::PostContent;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_post(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<PostRequest>,
) -> Result<ApiSuccess<PostData>, ApiError> {
    let command = CreatePostCommand {
        content: body.content()?,
        image: body.image,
    };

    state
        .content_service
        .create_post(caller.id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref post| ApiSuccess::new(StatusCode::CREATED, post.into()))
}

/// HTTP request body for creating or editing a post (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostRequest {
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostRequest {
    pub(super) fn content(&self) -> Result<PostContent, ContentError> {
        PostContent::new(self.content.clone()).map_err(ContentError::InvalidPostContent)
    }
}
