use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ProfileData;
use crate::identity::errors::IdentityError;
use crate::identity::models::Biography;
use crate::identity::models::EmailAddress;
use crate::identity::models::UpdateProfileCommand;
use crate::identity::models::Username;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    state
        .auth_service
        .get_profile(caller.id)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .auth_service
        .update_profile(caller.id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref profile| ApiSuccess::new(StatusCode::OK, profile.into()))
}

/// HTTP request body for updating the caller's profile (raw JSON)
///
/// Blank username or email values are treated as not provided.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub biography: Option<String>,
    pub cover_image: Option<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, IdentityError> {
        let username = non_blank(self.username).map(Username::new).transpose()?;
        let email = non_blank(self.email).map(EmailAddress::new).transpose()?;
        let biography = self.biography.map(Biography::new).transpose()?;

        Ok(UpdateProfileCommand {
            username,
            email,
            biography,
            cover_image: self.cover_image,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
