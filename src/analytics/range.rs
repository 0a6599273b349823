//! Date range resolution
//!
//! Turns a window specification into a contiguous, ascending sequence of
//! calendar-day buckets. All comparisons operate on calendar-day components
//! with time-of-day stripped, so two events on the same local day always land
//! in the same bucket regardless of their exact time.

use chrono::{Duration, Local, NaiveDate};

use crate::analytics::models::{DateBucket, WindowSpec};
use crate::analytics::AnalyticsError;
use crate::models::ClickEvent;

/// A resolved window: one bucket per calendar day from `start` to `end`,
/// inclusive, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub buckets: Vec<DateBucket>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Calendar day an event belongs to, in local time.
pub(crate) fn local_day(event: &ClickEvent) -> NaiveDate {
    event.timestamp.with_timezone(&Local).date_naive()
}

/// Resolve a window against the current wall-clock date.
pub fn resolve(spec: &WindowSpec, events: &[ClickEvent]) -> Result<ResolvedRange, AnalyticsError> {
    resolve_from(spec, events, Local::now().date_naive())
}

/// Resolve a window with an explicit fallback anchor date.
///
/// Preset windows end on the calendar day of the most recent click across all
/// supplied events, so a window is never empty just because the dashboard is
/// viewed long after the last real click. `fallback_end` is used only when
/// there are no events at all.
pub fn resolve_from(
    spec: &WindowSpec,
    events: &[ClickEvent],
    fallback_end: NaiveDate,
) -> Result<ResolvedRange, AnalyticsError> {
    spec.validate()?;

    let (start, end) = match spec {
        WindowSpec::Custom { start, end } => (*start, *end),
        WindowSpec::Preset { preset } => {
            let end = events.iter().map(local_day).max().unwrap_or(fallback_end);
            (end - Duration::days(preset.days() - 1), end)
        }
    };

    Ok(ResolvedRange {
        buckets: buckets_between(start, end),
        start,
        end,
    })
}

fn buckets_between(start: NaiveDate, end: NaiveDate) -> Vec<DateBucket> {
    let mut buckets = Vec::new();
    let mut day = start;
    while day <= end {
        buckets.push(DateBucket {
            date: day,
            label: day.format("%-d %b").to_string(),
        });
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }
    buckets
}
