//! Single-slot dataset cache
//!
//! The cache protects against redundant network fetches, not redundant
//! aggregation: it holds the most recently fetched product snapshot with its
//! fetch time, and window changes re-aggregate from that snapshot. It is an
//! injectable object rather than module-level state, so multiple engine
//! instances and tests never cross-contaminate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::Product;

/// The cached snapshot plus the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub products: Arc<Vec<Product>>,
    pub fetched_at: Instant,
}

#[derive(Debug, Default)]
pub struct ResultCache {
    slot: RwLock<Option<CacheEntry>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry, regardless of age
    pub async fn get(&self) -> Option<CacheEntry> {
        self.slot.read().await.clone()
    }

    /// Replace the slot with a freshly fetched snapshot
    pub async fn put(&self, products: Vec<Product>) -> CacheEntry {
        let entry = CacheEntry {
            products: Arc::new(products),
            fetched_at: Instant::now(),
        };
        *self.slot.write().await = Some(entry.clone());
        entry
    }

    /// Force the next read to bypass the cache regardless of age
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    /// True if no entry exists or the entry is older than `max_age`
    pub async fn is_stale(&self, max_age: Duration) -> bool {
        match self.slot.read().await.as_ref() {
            Some(entry) => entry.fetched_at.elapsed() > max_age,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, ProductType};
    use tokio::time::sleep;

    fn sample_product() -> Product {
        Product {
            id: "p-1".to_string(),
            product_type: ProductType::Stander,
            redirect_url: None,
            click_history: Vec::new(),
        }
    }

    #[tokio::test]
    async fn empty_cache_is_stale() {
        let cache = ResultCache::new();
        assert!(cache.is_stale(Duration::from_secs(60)).await);
        assert!(cache.get().await.is_none());
    }

    #[tokio::test]
    async fn repeated_reads_see_the_same_entry() {
        let cache = ResultCache::new();
        cache.put(vec![sample_product()]).await;

        let first = cache.get().await.expect("entry present");
        let second = cache.get().await.expect("entry present");
        assert!(Arc::ptr_eq(&first.products, &second.products));
        assert_eq!(first.fetched_at, second.fetched_at);
        assert!(!cache.is_stale(Duration::from_secs(60)).await);
    }

    #[tokio::test]
    async fn entry_goes_stale_after_ttl() {
        let cache = ResultCache::new();
        cache.put(vec![sample_product()]).await;

        assert!(!cache.is_stale(Duration::from_millis(200)).await);
        sleep(Duration::from_millis(250)).await;
        assert!(cache.is_stale(Duration::from_millis(200)).await);
    }

    #[tokio::test]
    async fn invalidate_clears_the_slot() {
        let cache = ResultCache::new();
        cache.put(vec![sample_product()]).await;
        cache.invalidate().await;

        assert!(cache.get().await.is_none());
        assert!(cache.is_stale(Duration::from_secs(3600)).await);
    }
}
