//! Click event model for asynchronous click tracking.

use crate::domain::entities::NewClick;
use crate::domain::user_agent::UserAgentInfo;

/// An in-memory click event handed from the redirect path to the worker.
///
/// Carries only the raw request facts; user-agent classification happens in
/// the worker, off the request path.
///
/// # Usage Flow
///
/// 1. Created by the resolver after the click count was incremented
/// 2. Queued by [`crate::domain::click_recorder::ClickRecorder`] (non-blocking)
/// 3. Processed by [`crate::domain::click_worker::run_click_worker`]
/// 4. Converted to [`NewClick`] for persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let event = ClickEvent::new(42, Some("192.168.1.1".to_string()), Some("Mozilla/5.0"));
    /// ```
    pub fn new(link_id: i64, ip: Option<String>, user_agent: Option<&str>) -> Self {
        Self {
            link_id,
            ip,
            user_agent: user_agent.map(|s| s.to_string()),
        }
    }

    /// Classifies the user agent and builds the record to persist.
    pub fn into_new_click(self) -> NewClick {
        let info = UserAgentInfo::parse(self.user_agent.as_deref());

        NewClick {
            link_id: self.link_id,
            ip_address: self.ip,
            user_agent: self.user_agent,
            device_type: Some(info.device_type),
            browser_name: info.browser_name,
            os_name: info.os_name,
        }
    }
}
