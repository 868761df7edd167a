//! Routes reachable without a resolved identity.
//!
//! Patterns use `:name` for a single path segment and a trailing `**` for
//! any remainder (including none). Everything not listed here requires an
//! authenticated caller.

use axum::http::Method;

/// A method and path pattern that bypasses the identity requirement.
#[derive(Debug, Clone)]
pub struct PublicRoute {
    pub method: Method,
    pub pattern: &'static str,
}

impl PublicRoute {
    const fn new(method: Method, pattern: &'static str) -> Self {
        Self { method, pattern }
    }

    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == *method && path_matches(self.pattern, path)
    }
}

pub const PUBLIC_ROUTES: &[PublicRoute] = &[
    PublicRoute::new(Method::POST, "/api/auth/register"),
    PublicRoute::new(Method::POST, "/api/auth/login"),
    PublicRoute::new(Method::POST, "/api/auth/refresh"),
    PublicRoute::new(Method::GET, "/api/auth/check-username"),
    PublicRoute::new(Method::GET, "/api/auth/check-email"),
    PublicRoute::new(Method::GET, "/api/posts"),
    PublicRoute::new(Method::GET, "/api/posts/:id"),
    PublicRoute::new(Method::GET, "/api/posts/:id/comments"),
    PublicRoute::new(Method::GET, "/api/docs/**"),
    PublicRoute::new(Method::GET, "/api/health"),
];

/// Whether `method path` may be served to an anonymous caller.
pub fn is_public(method: &Method, path: &str) -> bool {
    PUBLIC_ROUTES.iter().any(|route| route.matches(method, path))
}

fn path_matches(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (Some("**"), _) => return true,
            (Some(expected), Some(actual)) if expected.starts_with(':') => {
                if actual.is_empty() {
                    return false;
                }
            }
            (Some(expected), Some(actual)) => {
                if expected != actual {
                    return false;
                }
            }
            (None, None) => return true,
            _ => return false,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim_end_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
}
