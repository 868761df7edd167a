use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthResponseData;
use crate::identity::errors::IdentityError;
use crate::identity::models::Biography;
use crate::identity::models::EmailAddress;
use crate::identity::models::RegisterCommand;
use crate::identity::models::Username;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<AuthResponseData>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    email: String,
    password: String,
    confirm_password: String,
    #[serde(default)]
    biography: Option<String>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterCommand, IdentityError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let biography = self.biography.map(Biography::new).transpose()?;

        Ok(RegisterCommand::new(
            username,
            email,
            self.password,
            self.confirm_password,
            biography,
        ))
    }
}
