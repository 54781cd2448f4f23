//! API route configuration.
//!
//! Management endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`]; the code lookup under `/urls/{code}` is
//! public.

use crate::api::handlers::{
    analytics_handler, api_redirect_handler, create_link_handler, list_links_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Routes that require a bearer token.
///
/// # Endpoints
///
/// - `GET  /urls`                  - List the caller's links
/// - `POST /urls`                  - Create a link
/// - `GET  /urls/{code}/analytics` - Click analytics for one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_links_handler).post(create_link_handler))
        .route("/urls/{code}/analytics", get(analytics_handler))
}

/// Routes open to anonymous visitors.
///
/// # Endpoints
///
/// - `GET /urls/{code}` - Redirect with JSON error bodies
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/urls/{code}", get(api_redirect_handler))
}
