use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::content::errors::ContentError;
use crate::content::models::Comment;
use crate::content::models::Post;
use crate::domain::errors::ErrorKind;
use crate::identity::errors::IdentityError;
use crate::identity::models::AuthSession;
use crate::identity::models::IdentityProfile;

pub mod availability;
pub mod create_comment;
pub mod create_post;
pub mod delete_comment;
pub mod delete_post;
pub mod docs;
pub mod get_post;
pub mod get_user;
pub mod health;
pub mod list_comments;
pub mod list_posts;
pub mod login;
pub mod logout;
pub mod profile;
pub mod refresh;
pub mod register;
pub mod update_post;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_TOKEN: &str = "Invalid or expired token";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity {
        message: String,
        field: Option<String>,
    },
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
}

impl ApiError {
    /// Map a domain error category to its HTTP outcome.
    ///
    /// Credential and token failures get fixed messages so callers cannot
    /// tell the underlying reasons apart. Internal details are logged, not
    /// returned.
    fn from_kind(kind: ErrorKind, message: String, field: Option<&'static str>) -> Self {
        match kind {
            ErrorKind::Validation => ApiError::UnprocessableEntity {
                message,
                field: field.map(str::to_string),
            },
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::InvalidCredentials => ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()),
            ErrorKind::InvalidToken => ApiError::Unauthorized(INVALID_TOKEN.to_string()),
            ErrorKind::Forbidden => ApiError::Forbidden(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Internal => {
                tracing::error!(error = %message, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::UnprocessableEntity { message, field } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message, field)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, field)),
        )
            .into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string(), err.field())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        ApiError::from_kind(err.kind(), err.to_string(), err.field())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, field: Option<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, field },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageData {
    pub message: String,
}

/// Identity as shown to clients. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub biography: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub post_count: i64,
    pub comment_count: i64,
}

impl From<&IdentityProfile> for ProfileData {
    fn from(profile: &IdentityProfile) -> Self {
        let identity = &profile.identity;
        Self {
            id: identity.id.0,
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            biography: identity.biography.as_ref().map(|b| b.as_str().to_string()),
            cover_image: identity.cover_image.clone(),
            created_at: identity.created_at,
            updated_at: identity.updated_at,
            post_count: profile.post_count,
            comment_count: profile.comment_count,
        }
    }
}

/// Body returned by register, login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthResponseData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: ProfileData,
}

impl From<&AuthSession> for AuthResponseData {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.tokens.access_token.clone(),
            refresh_token: session.tokens.refresh_token.clone(),
            token_type: session.tokens.token_type.clone(),
            expires_in: session.tokens.expires_in,
            user: (&session.profile).into(),
        }
    }
}

/// Author summary embedded in posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorData {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub id: i64,
    pub author: AuthorData,
    pub content: String,
    pub image: Option<String>,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.0,
            author: AuthorData {
                id: post.author_id.0,
                username: post.author_username.clone(),
            },
            content: post.content.as_str().to_string(),
            image: post.image.clone(),
            comment_count: post.comment_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentData {
    pub id: i64,
    pub post_id: i64,
    pub author: AuthorData,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentData {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.0,
            post_id: comment.post_id.0,
            author: AuthorData {
                id: comment.author_id.0,
                username: comment.author_username.clone(),
            },
            content: comment.content.as_str().to_string(),
            created_at: comment.created_at,
        }
    }
}
