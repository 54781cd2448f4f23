//! Click aggregation for the analytics dashboard.
//!
//! Pure functions over already-fetched [`Click`] records; no I/O.

use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap};

use crate::domain::entities::Click;

/// Number of calendar days (including today) in the click time series.
pub const CLICK_WINDOW_DAYS: u64 = 7;

/// Label used for clicks without a device type or browser name.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Clicks on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Number of clicks from one device category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCount {
    pub device: String,
    pub count: i64,
}

/// Aggregated view of a link's clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsSummary {
    /// The persisted click counter of the link, which may exceed the number
    /// of recorded events.
    pub total_clicks: i64,
    /// Exactly [`CLICK_WINDOW_DAYS`] entries, ascending by date, ending today.
    pub clicks_over_time: Vec<DailyClicks>,
    /// Sorted by count descending, then device name ascending.
    pub device_distribution: Vec<DeviceCount>,
    pub browser_stats: BTreeMap<String, i64>,
}

/// Builds the summary for one link.
///
/// `today` is the last day of the time-series window. Events older than the
/// window still count toward the device and browser breakdowns.
pub fn summarize(total_clicks: i64, clicks: &[Click], today: NaiveDate) -> AnalyticsSummary {
    let mut window: BTreeMap<NaiveDate, i64> = (0..CLICK_WINDOW_DAYS)
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| (date, 0))
        .collect();

    let mut devices: HashMap<&str, i64> = HashMap::new();
    let mut browser_stats: BTreeMap<String, i64> = BTreeMap::new();

    for click in clicks {
        if let Some(bucket) = window.get_mut(&click.clicked_at.date_naive()) {
            *bucket += 1;
        }

        let device = label(click.device_type.as_deref());
        *devices.entry(device).or_insert(0) += 1;

        let browser = label(click.browser_name.as_deref());
        *browser_stats.entry(browser.to_string()).or_insert(0) += 1;
    }

    let clicks_over_time = window
        .into_iter()
        .map(|(date, clicks)| DailyClicks { date, clicks })
        .collect();

    let mut device_distribution: Vec<DeviceCount> = devices
        .into_iter()
        .map(|(device, count)| DeviceCount {
            device: device.to_string(),
            count,
        })
        .collect();
    device_distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.device.cmp(&b.device)));

    AnalyticsSummary {
        total_clicks,
        clicks_over_time,
        device_distribution,
        browser_stats,
    }
}

fn label(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN_LABEL,
    }
}
