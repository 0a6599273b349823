//! Engine orchestration
//!
//! Wires the resolver, aggregator, cache and scheduler together: a query
//! validates its window, consults the cache, fetches on staleness, then
//! resolves and aggregates from the cached snapshot. The background schedule
//! keeps the snapshot warm; once the engine is stopped, a fetch that resolves
//! late is discarded instead of applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info};

use crate::analytics::cache::ResultCache;
use crate::analytics::models::{AggregationResult, WindowSpec};
use crate::analytics::range;
use crate::analytics::refresh::RefreshScheduler;
use crate::analytics::{aggregator, AnalyticsError};
use crate::catalog::CatalogService;
use crate::config::AnalyticsConfig;
use crate::models::{ClickEvent, Product, ProductType};

pub struct AnalyticsEngine {
    catalog: Arc<dyn CatalogService>,
    cache: Arc<ResultCache>,
    scheduler: RefreshScheduler,
    max_age: Duration,
    refresh_every: Duration,
    /// Cleared on stop so late fetch results are discarded, not applied
    active: Arc<AtomicBool>,
}

impl AnalyticsEngine {
    pub fn new(catalog: Arc<dyn CatalogService>, config: &AnalyticsConfig) -> Self {
        Self {
            catalog,
            cache: Arc::new(ResultCache::new()),
            scheduler: RefreshScheduler::new(),
            max_age: Duration::from_secs(config.cache_ttl_secs),
            refresh_every: Duration::from_secs(config.refresh_secs),
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// The dataset cache, exposed for observation and explicit invalidation
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Resolve, bin and summarize clicks for one window and filter.
    ///
    /// Validation happens synchronously before any fetch; the fetch only runs
    /// when the cached snapshot is missing or older than the TTL. A fetch
    /// failure leaves any previous snapshot in place and is surfaced to the
    /// caller for user-visible notification.
    pub async fn query(
        &self,
        window: &WindowSpec,
        filter: Option<ProductType>,
    ) -> Result<AggregationResult, AnalyticsError> {
        window.validate()?;

        let products = self.ensure_fresh().await?;
        let events: Vec<ClickEvent> = products
            .iter()
            .flat_map(|p| p.click_history.iter().cloned())
            .collect();

        let range = range::resolve(window, &events)?;
        Ok(aggregator::aggregate(&products, &range, filter))
    }

    /// Arm the background refresh schedule.
    pub fn start(&self) {
        self.active.store(true, Ordering::SeqCst);

        let catalog = Arc::clone(&self.catalog);
        let cache = Arc::clone(&self.cache);
        let active = Arc::clone(&self.active);
        self.scheduler.start(self.refresh_every, move || {
            let catalog = Arc::clone(&catalog);
            let cache = Arc::clone(&cache);
            let active = Arc::clone(&active);
            Box::pin(async move {
                let products = catalog
                    .fetch_products()
                    .await
                    .context("catalog fetch during refresh")?;

                if !active.load(Ordering::SeqCst) {
                    debug!("Discarding refresh result fetched after engine stop");
                    return Ok(());
                }

                cache.put(products).await;
                Ok(())
            })
        });

        info!(
            "Analytics refresh armed (every {}s, cache TTL {}s)",
            self.refresh_every.as_secs(),
            self.max_age.as_secs()
        );
    }

    /// User-triggered refresh: fetches regardless of the entry's age, no-op
    /// while another refresh is in flight. Returns whether a refresh ran.
    /// The slot is replaced on success, so the previous snapshot stays
    /// readable until the new one lands.
    pub async fn refresh_now(&self) -> anyhow::Result<bool> {
        self.scheduler.refresh_now().await
    }

    /// Cancel the refresh schedule. An in-flight fetch completes but its
    /// result is discarded.
    pub fn stop(&self) {
        self.active.store(false, Ordering::SeqCst);
        self.scheduler.stop();
    }

    async fn ensure_fresh(&self) -> Result<Arc<Vec<Product>>, AnalyticsError> {
        if !self.cache.is_stale(self.max_age).await {
            if let Some(entry) = self.cache.get().await {
                return Ok(entry.products);
            }
        }

        debug!("Dataset cache stale or empty, fetching product snapshot");
        let products = self
            .catalog
            .fetch_products()
            .await
            .map_err(AnalyticsError::Fetch)?;

        let entry = self.cache.put(products).await;
        Ok(entry.products)
    }
}
