//! Catalog service client.

use std::time::Duration;

use shop_data::{FetchClient, FetchError, TraceContext};
use tracing::info;

use super::PRODUCTS_PATH;
use crate::catalog::{Catalog, Product, ProductPatch};
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Reads and edits products on the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: FetchClient,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_client(FetchClient::new().with_base_url(base_url))
    }

    /// Wrap an already configured client.
    pub fn from_client(http: FetchClient) -> Self {
        Self { http }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Send every request as a child span of `parent`.
    pub fn with_trace_parent(mut self, parent: TraceContext) -> Self {
        self.http = self.http.with_trace_parent(parent);
        self
    }

    /// `GET /api/products`
    pub async fn list_products(&self) -> Result<Catalog, CommerceError> {
        let products: Vec<Product> = self.http.get(PRODUCTS_PATH).send_json().await?;
        Ok(Catalog::new(products))
    }

    /// `GET /api/products/:id`
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.http
            .get(product_path(id))
            .send_json()
            .await
            .map_err(|e| not_found(e, id))
    }

    /// `PATCH /api/products/:id` with only the fields that are set.
    pub async fn patch_product(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, CommerceError> {
        patch.validate()?;
        let product: Product = self
            .http
            .patch(product_path(id))
            .json(patch)?
            .send_json()
            .await
            .map_err(|e| not_found(e, id))?;
        info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// `DELETE /api/products/:id`
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError> {
        self.http
            .delete(product_path(id))
            .send_empty()
            .await
            .map_err(|e| not_found(e, id))?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }
}

fn product_path(id: &ProductId) -> String {
    format!("{}/{}", PRODUCTS_PATH, id)
}

fn not_found(err: FetchError, id: &ProductId) -> CommerceError {
    match err.status() {
        Some(404) => CommerceError::ProductNotFound(id.to_string()),
        _ => err.into(),
    }
}
