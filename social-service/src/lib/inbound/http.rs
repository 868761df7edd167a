pub mod access;
pub mod handlers;
pub mod middleware;
pub mod router;
