//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by a user.
///
/// Every link has a generated `short_code`; `custom_alias` is an optional
/// second token. Both live in one namespace and resolve to the same link.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub owner_id: i64,
    pub destination_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    /// Stored and reported, not consulted by resolution.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if `expires_at` is set and strictly before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// The token shown to users: the alias when set, otherwise the generated code.
    pub fn public_code(&self) -> &str {
        self.custom_alias.as_deref().unwrap_or(&self.short_code)
    }

    /// Returns true if `code` is either this link's short code or its alias.
    pub fn matches_code(&self, code: &str) -> bool {
        self.short_code == code || self.custom_alias.as_deref() == Some(code)
    }

    /// Returns true if the destination can be sent as a `Location` header.
    pub fn has_redirectable_destination(&self) -> bool {
        is_redirectable(&self.destination_url)
    }
}

/// A destination is redirectable when it contains no control characters.
pub fn is_redirectable(url: &str) -> bool {
    !url.chars().any(char::is_control)
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub owner_id: i64,
    pub destination_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub link_id: i64,
    pub destination_url: String,
    /// Click count after this resolution was counted.
    pub click_count: i64,
}

/// Outcome of resolving a short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedLink),
    NotFound,
    Expired,
}

#[cfg(test)]
pub(crate) fn sample_link(id: i64, short_code: &str, alias: Option<&str>) -> Link {
    let now = Utc::now();
    Link {
        id,
        owner_id: 1,
        destination_url: "https://example.com".to_string(),
        short_code: short_code.to_string(),
        custom_alias: alias.map(str::to_string),
        click_count: 0,
        expires_at: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}
