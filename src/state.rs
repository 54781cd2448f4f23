//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, AuthService, LinkService};
use crate::domain::click_recorder::ClickRecorder;

/// Services and handles shared by every request.
///
/// Cloned per request; all fields are cheap handles. Dropping the last clone
/// drops the last [`ClickRecorder`], which lets the click worker finish.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub auth_service: Arc<AuthService>,
    pub click_recorder: ClickRecorder,
    /// Read the client IP from `X-Forwarded-For` / `X-Real-IP`.
    pub behind_proxy: bool,
}
