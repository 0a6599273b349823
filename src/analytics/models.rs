//! Data models for click analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed-length trailing window whose end anchors to the latest known
/// activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetWindow {
    Week,
    Month,
    Year,
}

impl PresetWindow {
    /// Number of calendar days the window spans
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }
}

/// User-selected time window for an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum WindowSpec {
    Preset { preset: PresetWindow },
    Custom { start: NaiveDate, end: NaiveDate },
}

impl WindowSpec {
    pub fn week() -> Self {
        Self::Preset {
            preset: PresetWindow::Week,
        }
    }

    pub fn month() -> Self {
        Self::Preset {
            preset: PresetWindow::Month,
        }
    }

    pub fn year() -> Self {
        Self::Preset {
            preset: PresetWindow::Year,
        }
    }

    pub fn custom(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Custom { start, end }
    }

    /// Reject inverted custom ranges before any asynchronous work starts.
    pub fn validate(&self) -> Result<(), super::AnalyticsError> {
        match self {
            Self::Custom { start, end } if start > end => {
                Err(super::AnalyticsError::InvalidRange {
                    start: *start,
                    end: *end,
                })
            }
            _ => Ok(()),
        }
    }
}

/// One calendar-day slot used to aggregate click counts for charting.
///
/// Generated fresh per aggregation request, never persisted. The label is the
/// short human-readable form the chart axis shows ("5 Aug").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBucket {
    pub date: NaiveDate,
    pub label: String,
}

/// Aggregated click statistics for one window and filter.
///
/// Recomputed on every aggregation pass; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub buckets: Vec<DateBucket>,

    /// Click count per bucket, same length as `buckets`
    pub per_bucket_counts: Vec<u64>,

    /// Clicks retained after filtering and range restriction
    pub total_clicks: u64,

    /// Products considered, whether or not they had clicks in range
    pub total_products: u64,

    /// `total_clicks / total_products`, one decimal, 0 when no products
    pub avg_clicks_per_product: f64,

    /// Mean clicks over the days that had at least one click, one decimal
    pub avg_clicks_per_day: f64,
}
