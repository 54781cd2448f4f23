//! DTOs for the link analytics endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::dto::link::LinkResponse;
use crate::domain::analytics::{AnalyticsSummary, DailyClicks, DeviceCount};

/// Response of `GET /api/urls/{code}/analytics`.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub url: LinkResponse,
    pub analytics: AnalyticsBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBody {
    pub total_clicks: i64,
    pub clicks_over_time: Vec<DailyClicksDto>,
    pub device_distribution: Vec<DeviceCountDto>,
    pub browser_stats: BTreeMap<String, i64>,
}

/// One day of the time series; `date` is `YYYY-MM-DD`.
#[derive(Debug, Serialize)]
pub struct DailyClicksDto {
    pub date: String,
    pub clicks: i64,
}

#[derive(Debug, Serialize)]
pub struct DeviceCountDto {
    pub device: String,
    pub count: i64,
}

impl From<DailyClicks> for DailyClicksDto {
    fn from(d: DailyClicks) -> Self {
        Self {
            date: d.date.format("%Y-%m-%d").to_string(),
            clicks: d.clicks,
        }
    }
}

impl From<DeviceCount> for DeviceCountDto {
    fn from(d: DeviceCount) -> Self {
        Self {
            device: d.device,
            count: d.count,
        }
    }
}

impl From<AnalyticsSummary> for AnalyticsBody {
    fn from(s: AnalyticsSummary) -> Self {
        Self {
            total_clicks: s.total_clicks,
            clicks_over_time: s.clicks_over_time.into_iter().map(Into::into).collect(),
            device_distribution: s.device_distribution.into_iter().map(Into::into).collect(),
            browser_stats: s.browser_stats,
        }
    }
}
