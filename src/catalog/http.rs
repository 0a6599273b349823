//! HTTP-backed catalog client
//!
//! Thin pass-through to the remote catalog API. HTTP-level retries, redirects
//! and timeouts are the transport's concern; this client only maps responses
//! into typed results.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

use crate::auth::AuthSession;
use crate::catalog::trait_def::{CatalogError, CatalogResult, CatalogService};
use crate::models::{CreateProductRequest, Product};

pub struct HttpCatalog {
    base_url: String,
    client: Client,
    session: Arc<dyn AuthSession>,
}

impl HttpCatalog {
    pub fn new(base_url: &str, session: Arc<dyn AuthSession>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("standlytics/0.1.0")
            .build()
            .context("failed to build HTTP client for catalog API")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn fetch_products(&self) -> CatalogResult<Vec<Product>> {
        let response = self
            .request(self.client.get(self.url("products")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<Vec<Product>>().await?)
    }

    async fn create_product(&self, request: &CreateProductRequest) -> CatalogResult<Product> {
        let response = self
            .request(self.client.post(self.url("products")).json(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(response.json::<Product>().await?)
    }

    async fn delete_product(&self, id: &str) -> CatalogResult<bool> {
        let response = self
            .request(self.client.delete(self.url(&format!("products/{id}"))))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        Ok(true)
    }
}
