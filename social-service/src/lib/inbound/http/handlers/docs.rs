use axum::http::Method;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::access;

const ROUTES: &[(Method, &str, &str)] = &[
    (Method::POST, "/api/auth/register", "Register and receive a token pair"),
    (Method::POST, "/api/auth/login", "Log in with username or email"),
    (Method::POST, "/api/auth/refresh", "Exchange a refresh token for a new pair"),
    (Method::GET, "/api/auth/check-username", "Whether a username is free"),
    (Method::GET, "/api/auth/check-email", "Whether an email is free"),
    (Method::GET, "/api/auth/profile", "Caller's profile"),
    (Method::PUT, "/api/auth/profile", "Update caller's profile"),
    (Method::POST, "/api/auth/logout", "Acknowledge logout"),
    (Method::GET, "/api/users/:id", "Profile of any user"),
    (Method::GET, "/api/posts", "Posts, newest first (page, size)"),
    (Method::POST, "/api/posts", "Create a post"),
    (Method::GET, "/api/posts/:id", "A single post"),
    (Method::PUT, "/api/posts/:id", "Edit own post"),
    (Method::DELETE, "/api/posts/:id", "Delete own post"),
    (Method::GET, "/api/posts/:id/comments", "Comments on a post, oldest first"),
    (Method::POST, "/api/posts/:id/comments", "Comment on a post"),
    (Method::DELETE, "/api/comments/:id", "Delete own comment or a comment on own post"),
    (Method::GET, "/api/health", "Liveness check"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteDoc {
    pub method: String,
    pub path: &'static str,
    pub summary: &'static str,
    pub authenticated: bool,
}

/// Machine-readable list of the API's routes.
pub async fn docs() -> ApiSuccess<Vec<RouteDoc>> {
    let routes = ROUTES
        .iter()
        .map(|(method, path, summary)| RouteDoc {
            method: method.to_string(),
            path: *path,
            summary: *summary,
            authenticated: !access::is_public(method, path),
        })
        .collect();

    ApiSuccess::new(StatusCode::OK, routes)
}
