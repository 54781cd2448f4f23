//! Users owning links, and the identity attached to authenticated requests.

use chrono::{DateTime, Utc};

/// A link owner.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Identity of the caller, resolved from a bearer token by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}
