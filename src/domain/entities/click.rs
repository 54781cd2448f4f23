//! Click entity representing a single recorded resolution.

use chrono::{DateTime, Utc};

/// A click recorded when a short link is resolved.
///
/// Immutable once written. The request facts (`ip_address`, `user_agent`)
/// are stored verbatim; `device_type`, `browser_name` and `os_name` are
/// derived from the user agent and may be absent.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub browser_name: Option<String>,
    pub os_name: Option<String>,
}

/// Input data for recording a new click.
///
/// The timestamp is assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_type: Option<String>,
    pub browser_name: Option<String>,
    pub os_name: Option<String>,
}

impl NewClick {
    /// Materializes the click as the store would return it.
    pub fn into_click(self, id: i64, clicked_at: DateTime<Utc>) -> Click {
        Click {
            id,
            link_id: self.link_id,
            clicked_at,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            device_type: self.device_type,
            browser_name: self.browser_name,
            os_name: self.os_name,
        }
    }
}
