//! Handlers for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;

use crate::domain::entities::{Resolution, ResolvedLink};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code or alias to its destination URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Look up the code (exact match against short codes and aliases)
/// 2. Reject expired links without counting them
/// 3. Increment the click count
/// 4. Queue a click event for the background worker (not awaited)
/// 5. Return 302 Found
///
/// # Errors
///
/// Returns 404 `URL not found` or 410 `URL has expired` as plain text.
/// Store failures return a 500 JSON error.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let response = match resolve(&state, &code, &headers, addr).await? {
        Resolution::Resolved(link) => found(&link)?,
        Resolution::NotFound => (StatusCode::NOT_FOUND, "URL not found").into_response(),
        Resolution::Expired => (StatusCode::GONE, "URL has expired").into_response(),
    };

    Ok(response)
}

/// Same as [`redirect_handler`] under the API prefix, with JSON errors.
///
/// # Endpoint
///
/// `GET /api/urls/{code}`
///
/// # Errors
///
/// Returns [`AppError::NotFound`] (404) or [`AppError::Gone`] (410).
pub async fn api_redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    match resolve(&state, &code, &headers, addr).await? {
        Resolution::Resolved(link) => found(&link),
        Resolution::NotFound => Err(AppError::not_found("URL not found", json!({ "code": code }))),
        Resolution::Expired => Err(AppError::gone("URL has expired", json!({ "code": code }))),
    }
}

async fn resolve(
    state: &AppState,
    code: &str,
    headers: &HeaderMap,
    addr: SocketAddr,
) -> Result<Resolution, AppError> {
    let ip = client_ip(headers, addr, state.behind_proxy);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    state
        .link_service
        .resolve(code, Some(ip), user_agent)
        .await
}

fn found(link: &ResolvedLink) -> Result<Response, AppError> {
    let location = HeaderValue::try_from(link.destination_url.as_str()).map_err(|_| {
        AppError::internal(
            "Destination URL is not a valid header value",
            json!({ "link_id": link.link_id }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
