//! Handlers for link creation and listing.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::link::{CreateLinkRequest, LinkResponse};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "longUrl": "https://example.com/some/page",
///   "customAlias": "promo",
///   "expirationDate": "2030-01-01T00:00"
/// }
/// ```
///
/// # Errors
///
/// - **400**: invalid URL, invalid alias, or alias already in use
/// - **401**: missing or invalid bearer token
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let link = state
        .link_service
        .create_link(user.user_id, payload.into())
        .await?;

    let short_url = state.link_service.short_url(&link);

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::from_link(link, short_url)),
    ))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/urls`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<LinkResponse>>, AppError> {
    let links = state.link_service.list_links(user.user_id).await?;

    let items = links
        .into_iter()
        .map(|link| {
            let short_url = state.link_service.short_url(&link);
            LinkResponse::from_link(link, short_url)
        })
        .collect();

    Ok(Json(items))
}
