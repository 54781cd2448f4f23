//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`                    - Short link redirect (public)
//! - `GET  /health`                    - Health check: DB, click queue (public)
//! - `GET  /api/urls/{code}`           - Redirect with JSON errors (public)
//! - `GET  /api/urls`, `POST /api/urls` - Link management (Bearer token)
//! - `GET  /api/urls/{code}/analytics` - Link analytics (Bearer token)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on authenticated routes only
//! - **Authentication** - Bearer token
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware, without path normalization.
///
/// Rate limiting keys on the forwarded client IP when `state.behind_proxy`
/// is set, otherwise on the socket peer address. Requests must carry
/// `ConnectInfo<SocketAddr>`.
pub fn router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let protected = if state.behind_proxy {
        protected.layer(rate_limit::secure_proxy_layer())
    } else {
        protected.layer(rate_limit::secure_layer())
    };

    let api_router = Router::new()
        .merge(protected)
        .merge(api::routes::public_routes());

    Router::new()
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] with trailing slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
