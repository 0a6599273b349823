//! Click-analytics aggregation and caching engine
//!
//! Turns the raw per-device click history fetched from the catalog into
//! time-bucketed statistics under a configurable window, with a single-slot
//! TTL cache in front of the network fetch and a background refresh schedule.

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::CatalogError;

pub mod aggregator;
pub mod cache;
pub mod engine;
pub mod models;
pub mod range;
pub mod refresh;

pub use aggregator::aggregate;
pub use cache::{CacheEntry, ResultCache};
pub use engine::AnalyticsEngine;
pub use models::{AggregationResult, DateBucket, PresetWindow, WindowSpec};
pub use range::{resolve, resolve_from, ResolvedRange};
pub use refresh::RefreshScheduler;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Custom window with an inverted range, rejected before any fetch
    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The catalog fetch failed; any previously cached dataset is kept
    #[error("failed to fetch products from catalog")]
    Fetch(#[source] CatalogError),
}
