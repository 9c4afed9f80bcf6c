//! Product catalog facade.

use shopfront_core::{NewProduct, Product, ProductId, ProductPatch};
use tracing::instrument;

use crate::api::{ApiClient, ApiResult};

/// Typed access to `/products`.
#[derive(Debug, Clone)]
pub struct ProductService {
    api: ApiClient,
}

impl ProductService {
    /// Create a facade over `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ApiResult<Vec<Product>> {
        self.api.get("products").await
    }

    /// Get one product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::api::ApiError::NotFound) if the
    /// product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: ProductId) -> ApiResult<Product> {
        self.api.get(&format!("products/{id}")).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the product.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct) -> ApiResult<Product> {
        self.api.post("products", product).await
    }

    /// Change some fields of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the backend rejects
    /// the change.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, patch: &ProductPatch) -> ApiResult<Product> {
        self.api.patch(&format!("products/{id}"), patch).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: ProductId) -> ApiResult<()> {
        self.api.delete_empty(&format!("products/{id}")).await
    }
}
