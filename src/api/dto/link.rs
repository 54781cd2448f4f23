//! DTOs for link creation and listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::CreateLink;
use crate::domain::entities::Link;
use crate::utils::datetime::deserialize_optional_timestamp;

/// Request body of `POST /api/urls`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    /// The destination URL (must be an absolute URL).
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,

    /// Optional alias resolving to the same link as the generated code.
    #[serde(default)]
    pub custom_alias: Option<String>,

    /// Optional expiry. After this time the link answers 410 Gone.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub expiration_date: Option<DateTime<Utc>>,
}

impl CreateLinkRequest {
    /// Trims string fields; a blank alias becomes `None`.
    pub fn normalized(self) -> Self {
        Self {
            long_url: self.long_url.trim().to_string(),
            custom_alias: self
                .custom_alias
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            expiration_date: self.expiration_date,
        }
    }
}

impl From<CreateLinkRequest> for CreateLink {
    fn from(req: CreateLinkRequest) -> Self {
        CreateLink {
            destination_url: req.long_url,
            custom_alias: req.custom_alias,
            expires_at: req.expiration_date,
        }
    }
}

/// Link representation returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: i64,
    pub owner_id: i64,
    pub destination_url: String,
    pub short_code: String,
    pub custom_alias: Option<String>,
    pub short_url: String,
    pub click_count: i64,
    pub expires_at: Option<DateTime<Utc>>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            id: link.id,
            owner_id: link.owner_id,
            destination_url: link.destination_url,
            short_code: link.short_code,
            custom_alias: link.custom_alias,
            short_url,
            click_count: link.click_count,
            expires_at: link.expires_at,
            active: link.active,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}
