//! Integration tests for window resolution and aggregation
//!
//! Exercises the resolver and aggregator together the way the engine drives
//! them, including the two-product reference scenario the dashboard charts
//! are validated against.

use chrono::{Duration, Local, NaiveDate, TimeZone, Utc};

use standlytics::analytics::{aggregate, resolve_from, WindowSpec};
use standlytics::models::{ClickEvent, Product, ProductType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn click_on(day: NaiveDate) -> ClickEvent {
    let noon = day.and_hms_opt(12, 0, 0).expect("valid time");
    ClickEvent {
        timestamp: noon
            .and_local_timezone(Local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&noon)),
    }
}

fn product(id: &str, product_type: ProductType, days: &[NaiveDate]) -> Product {
    Product {
        id: id.to_string(),
        product_type,
        redirect_url: None,
        click_history: days.iter().copied().map(click_on).collect(),
    }
}

fn all_events(products: &[Product]) -> Vec<ClickEvent> {
    products
        .iter()
        .flat_map(|p| p.click_history.iter().cloned())
        .collect()
}

#[test]
fn two_product_week_scenario() {
    let day0 = date(2026, 7, 1);
    let day1 = day0 + Duration::days(1);
    let day2 = day0 + Duration::days(2);

    let products = [
        product("stand-1", ProductType::Stander, &[day0, day0, day2]),
        product("sticker-1", ProductType::Sticker, &[day1]),
    ];

    let events = all_events(&products);
    let range = resolve_from(&WindowSpec::week(), &events, date(2030, 1, 1))
        .expect("preset window resolves");

    // Week anchored at the latest click: day2-6 .. day2
    assert_eq!(range.end, day2);
    assert_eq!(range.start, day2 - Duration::days(6));
    assert_eq!(range.buckets.len(), 7);

    let result = aggregate(&products, &range, None);
    assert_eq!(result.per_bucket_counts, vec![0, 0, 0, 0, 2, 1, 1]);
    assert_eq!(result.total_clicks, 4);
    assert_eq!(result.total_products, 2);
    assert_eq!(result.avg_clicks_per_product, 2.0);
    // Only the three days with clicks enter the denominator: (2+1+1)/3
    assert_eq!(result.avg_clicks_per_day, 1.3);
}

#[test]
fn custom_window_restricts_and_keeps_bucket_alignment() {
    let products = [product(
        "stand-1",
        ProductType::Stander,
        &[date(2026, 6, 28), date(2026, 7, 2), date(2026, 7, 4), date(2026, 7, 9)],
    )];

    let range = resolve_from(
        &WindowSpec::custom(date(2026, 7, 1), date(2026, 7, 7)),
        &all_events(&products),
        date(2030, 1, 1),
    )
    .expect("custom window resolves");

    let result = aggregate(&products, &range, None);
    assert_eq!(result.buckets.len(), 7);
    assert_eq!(result.total_clicks, 2);
    assert_eq!(
        result.per_bucket_counts.iter().sum::<u64>(),
        result.total_clicks
    );

    // The two retained clicks sit on the 2nd and 4th.
    assert_eq!(result.per_bucket_counts[1], 1);
    assert_eq!(result.per_bucket_counts[3], 1);
}

#[test]
fn year_window_covers_the_full_trailing_year() {
    let anchor = date(2026, 8, 4);
    let products = [product(
        "stand-1",
        ProductType::Stander,
        &[anchor - Duration::days(364), anchor],
    )];

    let range = resolve_from(&WindowSpec::year(), &all_events(&products), date(2030, 1, 1))
        .expect("preset window resolves");
    let result = aggregate(&products, &range, None);

    assert_eq!(result.buckets.len(), 365);
    assert_eq!(result.total_clicks, 2);
    assert_eq!(result.per_bucket_counts[0], 1);
    assert_eq!(result.per_bucket_counts[364], 1);
}

#[test]
fn filtered_aggregation_anchors_on_the_full_event_set() {
    // The window anchors to the latest click across ALL products, even when
    // the aggregation itself is filtered to one type.
    let products = [
        product("stand-1", ProductType::Stander, &[date(2026, 5, 1)]),
        product("sticker-1", ProductType::Sticker, &[date(2026, 5, 6)]),
    ];

    let events = all_events(&products);
    let range =
        resolve_from(&WindowSpec::week(), &events, date(2030, 1, 1)).expect("window resolves");
    assert_eq!(range.end, date(2026, 5, 6));

    let result = aggregate(&products, &range, Some(ProductType::Stander));
    assert_eq!(result.total_products, 1);
    assert_eq!(result.total_clicks, 1);
    assert_eq!(result.per_bucket_counts[1], 1);
}

#[test]
fn repeated_aggregation_is_bit_identical() {
    let products = [
        product("stand-1", ProductType::Stander, &[date(2026, 7, 1), date(2026, 7, 3)]),
        product("plate-1", ProductType::Plate, &[date(2026, 7, 2)]),
    ];

    let events = all_events(&products);
    let range =
        resolve_from(&WindowSpec::month(), &events, date(2030, 1, 1)).expect("window resolves");

    let first = aggregate(&products, &range, None);
    let second = aggregate(&products, &range, None);
    assert_eq!(first, second);
}
