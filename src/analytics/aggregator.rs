//! Event binning and summary statistics
//!
//! Pure computation over a read-only product snapshot: bins every click into
//! the calendar-day buckets of a resolved range and derives the summary
//! figures the dashboard tables show. For a fixed input tuple the output is
//! identical on repeated invocation.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::analytics::models::AggregationResult;
use crate::analytics::range::{local_day, ResolvedRange};
use crate::models::{Product, ProductType};

/// Bin clicks into the range's buckets and compute summary statistics.
///
/// When `filter` is set, only products of that type are considered. Events
/// whose local calendar day falls outside the resolved range are dropped
/// silently; they occur naturally at range boundaries.
pub fn aggregate(
    products: &[Product],
    range: &ResolvedRange,
    filter: Option<ProductType>,
) -> AggregationResult {
    let considered: Vec<&Product> = products
        .iter()
        .filter(|p| filter.is_none_or(|wanted| p.product_type == wanted))
        .collect();

    let slot_by_day: HashMap<NaiveDate, usize> = range
        .buckets
        .iter()
        .enumerate()
        .map(|(slot, bucket)| (bucket.date, slot))
        .collect();

    let mut per_bucket_counts = vec![0u64; range.buckets.len()];
    let mut total_clicks = 0u64;
    let mut dropped = 0u64;

    for product in &considered {
        for event in &product.click_history {
            let day = local_day(event);
            match slot_by_day.get(&day) {
                Some(&slot) if day >= range.start && day <= range.end => {
                    per_bucket_counts[slot] += 1;
                    total_clicks += 1;
                }
                _ => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {dropped} clicks outside the resolved range");
    }

    let total_products = considered.len() as u64;
    let avg_clicks_per_product = if total_products == 0 {
        0.0
    } else {
        round_one_decimal(total_clicks as f64 / total_products as f64)
    };

    // Days without clicks do not enter the denominator.
    let active_days = per_bucket_counts.iter().filter(|&&c| c > 0).count() as u64;
    let avg_clicks_per_day = if active_days == 0 {
        0.0
    } else {
        round_one_decimal(total_clicks as f64 / active_days as f64)
    };

    AggregationResult {
        buckets: range.buckets.clone(),
        per_bucket_counts,
        total_clicks,
        total_products,
        avg_clicks_per_product,
        avg_clicks_per_day,
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
