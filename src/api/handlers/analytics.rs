//! Handler for per-link analytics.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::dto::link::LinkResponse;
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for one of the caller's links.
///
/// # Endpoint
///
/// `GET /api/urls/{code}/analytics`
///
/// `code` may be the generated short code or the custom alias.
///
/// # Response
///
/// ```json
/// {
///   "url": { "shortCode": "Xy3_a9Qk", "customAlias": "promo", "...": "..." },
///   "analytics": {
///     "totalClicks": 2,
///     "clicksOverTime": [{ "date": "2030-01-05", "clicks": 2 }],
///     "deviceDistribution": [{ "device": "mobile", "count": 2 }],
///     "browserStats": { "Safari": 2 }
///   }
/// }
/// ```
///
/// # Errors
///
/// - **404**: no such link, or it belongs to another user
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(code): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let result = state
        .analytics_service
        .analytics_for(&code, user.user_id)
        .await?;

    let short_url = state.link_service.short_url(&result.link);

    Ok(Json(AnalyticsResponse {
        url: LinkResponse::from_link(result.link, short_url),
        analytics: result.summary.into(),
    }))
}
