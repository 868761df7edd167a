use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::availability::check_email;
use super::handlers::availability::check_username;
use super::handlers::create_comment::create_comment;
use super::handlers::create_post::create_post;
use super::handlers::delete_comment::delete_comment;
use super::handlers::delete_post::delete_post;
use super::handlers::docs::docs;
use super::handlers::get_post::get_post;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::list_comments::list_comments;
use super::handlers::list_posts::list_posts;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::profile::get_profile;
use super::handlers::profile::update_profile;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::handlers::update_post::update_post;
use super::middleware::authenticate;
use super::middleware::require_identity;
use crate::content::ports::ContentServicePort;
use crate::identity::ports::AuthenticationServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthenticationServicePort>,
    pub content_service: Arc<dyn ContentServicePort>,
}

/// Build the HTTP application.
///
/// Every request first passes the token resolver, which may attach an
/// identity, then the route guard, which turns anonymous access to routes
/// outside the public allow-list into 401.
pub fn create_router(
    auth_service: Arc<dyn AuthenticationServicePort>,
    content_service: Arc<dyn ContentServicePort>,
) -> Router {
    let state = AppState {
        auth_service,
        content_service,
    };

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/check-username", get(check_username))
        .route("/api/auth/check-email", get(check_email))
        .route("/api/auth/profile", get(get_profile).put(update_profile))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/:post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route(
            "/api/posts/:post_id/comments",
            get(list_comments).post(create_comment),
        )
        .route("/api/comments/:comment_id", delete(delete_comment))
        .route("/api/docs", get(docs))
        .route("/api/docs/*rest", get(docs))
        .route("/api/health", get(health))
        .layer(middleware::from_fn(require_identity))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
