use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct UsernameQuery {
    username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailQuery {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityData {
    pub available: bool,
}

pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<ApiSuccess<AvailabilityData>, ApiError> {
    state
        .auth_service
        .is_username_available(&query.username)
        .await
        .map_err(ApiError::from)
        .map(|available| ApiSuccess::new(StatusCode::OK, AvailabilityData { available }))
}

pub async fn check_email(
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<ApiSuccess<AvailabilityData>, ApiError> {
    state
        .auth_service
        .is_email_available(&query.email)
        .await
        .map_err(ApiError::from)
        .map(|available| ApiSuccess::new(StatusCode::OK, AvailabilityData { available }))
}
