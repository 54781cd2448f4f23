//! Per-link click analytics service.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use crate::domain::analytics::{AnalyticsSummary, summarize};
use crate::domain::entities::Link;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use serde_json::json;

/// A link together with its aggregated clicks.
#[derive(Debug, Clone)]
pub struct LinkAnalytics {
    pub link: Link,
    pub summary: AnalyticsSummary,
}

/// Service for retrieving analytics of a link owned by the caller.
pub struct AnalyticsService {
    link_repository: Arc<dyn LinkRepository>,
    click_repository: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    /// Creates a new analytics service.
    pub fn new(
        link_repository: Arc<dyn LinkRepository>,
        click_repository: Arc<dyn ClickRepository>,
    ) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Aggregates the clicks of the link identified by `code`.
    ///
    /// A link owned by someone else is reported exactly like a missing one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link owned by `owner_id` matches.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn analytics_for(
        &self,
        code: &str,
        owner_id: i64,
    ) -> Result<LinkAnalytics, AppError> {
        self.analytics_on(code, owner_id, Utc::now().date_naive()).await
    }

    async fn analytics_on(
        &self,
        code: &str,
        owner_id: i64,
        today: NaiveDate,
    ) -> Result<LinkAnalytics, AppError> {
        let link = self
            .link_repository
            .find_owned_by_code(code, owner_id)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))?;

        let clicks = self.click_repository.list_for_link(link.id).await?;
        let summary = summarize(link.click_count, &clicks, today);

        Ok(LinkAnalytics { link, summary })
    }
}
