use crate::models::{CreateProductRequest, Product};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned status {0}")]
    Status(u16),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Remote product catalog, the engine's data source.
///
/// Persistence and business rules live on the server side; this trait is a
/// pass-through. The engine only ever reads via `fetch_products`, the write
/// operations exist for the management CLI.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch the full product list with embedded click history
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>>;

    /// Register a new product
    async fn create_product(&self, request: &CreateProductRequest) -> CatalogResult<Product>;

    /// Remove a product by id; returns false if it did not exist
    async fn delete_product(&self, id: &str) -> CatalogResult<bool>;
}
