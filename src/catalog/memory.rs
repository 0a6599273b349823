//! In-process catalog backend
//!
//! Deterministic `CatalogService` used by the integration tests and the CLI
//! demo mode. Counts fetches and can be toggled into a failing state so cache
//! and scheduler behavior is observable from the outside.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::trait_def::{CatalogError, CatalogResult, CatalogService};
use crate::models::{CreateProductRequest, Product};

pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
    fetch_count: AtomicUsize,
    next_id: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products.len() + 1;
        Self {
            products: RwLock::new(products),
            fetch_count: AtomicUsize::new(0),
            next_id: AtomicUsize::new(next_id),
            failing: AtomicBool::new(false),
        }
    }

    /// Number of `fetch_products` calls served (including failed ones)
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Make subsequent fetches fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Replace the dataset served by the next fetch
    pub async fn set_products(&self, products: Vec<Product>) {
        *self.products.write().await = products;
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Other(anyhow!("catalog unavailable")));
        }

        Ok(self.products.read().await.clone())
    }

    async fn create_product(&self, request: &CreateProductRequest) -> CatalogResult<Product> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let product = Product {
            id: format!("p-{id}"),
            product_type: request.product_type,
            redirect_url: request.redirect_url.clone(),
            click_history: Vec::new(),
        };

        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: &str) -> CatalogResult<bool> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}
