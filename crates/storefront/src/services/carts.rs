//! Cart facade.
//!
//! Carts are created by the backend on the first add. Every mutation answers
//! with the whole cart, totals included.

use shopfront_core::{AddToCart, Cart, ProductId, Quantity, UserId};
use tracing::instrument;

use crate::api::{ApiClient, ApiResult};

/// Typed access to `/carts`.
#[derive(Debug, Clone)]
pub struct CartService {
    api: ApiClient,
}

impl CartService {
    /// Create a facade over `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Add units of a product to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the add.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product, quantity = %quantity))]
    pub async fn add_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> ApiResult<Cart> {
        let body = AddToCart {
            user_id: user,
            product_id: product,
            quantity,
        };
        self.api.post("carts/add", &body).await
    }

    /// Get a user's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::api::ApiError::NotFound) if the
    /// user has no cart yet.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn get_by_user(&self, user: UserId) -> ApiResult<Cart> {
        self.api.get(&format!("carts/user/{user}")).await
    }

    /// Set the quantity of a product already in the cart.
    ///
    /// No floor is enforced here; the backend has the final word.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product, quantity = %quantity))]
    pub async fn update_item(
        &self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> ApiResult<Cart> {
        self.api
            .patch_query(
                &format!("carts/user/{user}/product/{product}"),
                &[("quantity", quantity.to_string())],
            )
            .await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the cart or the request fails.
    #[instrument(skip(self), fields(user_id = %user, product_id = %product))]
    pub async fn remove_item(&self, user: UserId, product: ProductId) -> ApiResult<Cart> {
        self.api
            .delete(&format!("carts/user/{user}/product/{product}"))
            .await
    }

    /// List every cart (admin and debugging).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ApiResult<Vec<Cart>> {
        self.api.get("carts").await
    }
}
