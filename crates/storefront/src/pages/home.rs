//! Product browsing page.

use shopfront_core::{Cart, Product, ProductId, Quantity, UserId};
use thiserror::Error;

use super::{
    Generation, LoadState, MSG_ADD_TO_CART_FAILED, MSG_ADDED_TO_CART, MSG_LOAD_PRODUCTS_FAILED,
    Notice, RequestSequence, stale,
};
use crate::api::ApiError;
use crate::services::{CartService, ProductService};

/// Why an add-to-cart was not completed.
#[derive(Debug, Error)]
pub enum AddToCartError {
    #[error("Another add to cart is in progress")]
    Busy,
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),
    #[error("Failed to add to cart: {0}")]
    Request(#[from] ApiError),
}

/// Catalog listing with one add-to-cart button per product.
#[derive(Debug)]
pub struct HomePage {
    products_api: ProductService,
    carts_api: CartService,
    products: Vec<Product>,
    state: LoadState,
    sequence: RequestSequence,
    adding: Option<ProductId>,
    notice: Option<Notice>,
}

impl HomePage {
    #[must_use]
    pub fn new(products_api: ProductService, carts_api: CartService) -> Self {
        Self {
            products_api,
            carts_api,
            products: Vec::new(),
            state: LoadState::Idle,
            sequence: RequestSequence::default(),
            adding: None,
            notice: None,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The product whose add is in flight.
    #[must_use]
    pub const fn adding(&self) -> Option<ProductId> {
        self.adding
    }

    /// Whether the add button for `product` is enabled.
    #[must_use]
    pub fn can_add(&self, product: &Product) -> bool {
        self.adding.is_none() && product.in_stock()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_load(&mut self) -> Generation {
        self.state = LoadState::Loading;
        self.sequence.issue()
    }

    /// Apply a product list. A failure keeps whatever list was shown before.
    pub fn finish_load(&mut self, generation: Generation, result: Result<Vec<Product>, ApiError>) {
        if !self.sequence.is_current(generation) {
            stale("home", generation);
            return;
        }
        match result {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Loaded products");
                self.products = products;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
                self.state = LoadState::Failed(MSG_LOAD_PRODUCTS_FAILED.to_string());
            }
        }
    }

    /// Fetch the catalog.
    pub async fn load(&mut self) {
        let generation = self.begin_load();
        let result = self.products_api.list().await;
        self.finish_load(generation, result);
    }

    // =========================================================================
    // Add to cart
    // =========================================================================

    /// Mark `product` as being added.
    ///
    /// # Errors
    ///
    /// Returns [`AddToCartError::Busy`] while another add is in flight, or
    /// [`AddToCartError::OutOfStock`] if the product has no stock left.
    pub fn begin_add(&mut self, product: &Product) -> Result<ProductId, AddToCartError> {
        if self.adding.is_some() {
            return Err(AddToCartError::Busy);
        }
        if !product.in_stock() {
            return Err(AddToCartError::OutOfStock(product.id));
        }
        self.adding = Some(product.id);
        Ok(product.id)
    }

    /// Apply the answer to an add and clear the row's busy flag.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the add failed.
    pub fn finish_add(&mut self, result: Result<Cart, ApiError>) -> Result<Cart, AddToCartError> {
        let product = self.adding.take();
        match result {
            Ok(cart) => {
                self.notice = Some(Notice::success(MSG_ADDED_TO_CART));
                Ok(cart)
            }
            Err(e) => {
                tracing::error!(error = %e, product_id = ?product, "Failed to add to cart");
                self.notice = Some(Notice::error(MSG_ADD_TO_CART_FAILED));
                Err(e.into())
            }
        }
    }

    /// Add one unit of `product` to `user`'s cart.
    ///
    /// # Errors
    ///
    /// See [`HomePage::begin_add`] and [`HomePage::finish_add`].
    pub async fn add_to_cart(
        &mut self,
        user: UserId,
        product: &Product,
    ) -> Result<Cart, AddToCartError> {
        let product_id = self.begin_add(product)?;
        let result = self
            .carts_api
            .add_item(user, product_id, Quantity::ONE)
            .await;
        self.finish_add(result)
    }

    /// Look up a listed product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;

    fn page() -> HomePage {
        let api = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        HomePage::new(ProductService::new(api.clone()), CartService::new(api))
    }

    fn product(id: i64, stock: i64) -> Product {
        serde_json::from_value(json!({"id": id, "name": "P", "price": 1, "stock": stock})).unwrap()
    }

    #[test]
    fn test_failed_load_keeps_list() {
        let mut page = page();
        let first = page.begin_load();
        page.finish_load(first, Ok(vec![product(1, 3)]));
        let second = page.begin_load();
        page.finish_load(second, Err(ApiError::Decode("bad".into())));

        assert_eq!(page.products().len(), 1);
        assert_eq!(page.state().error(), Some(MSG_LOAD_PRODUCTS_FAILED));
    }

    #[test]
    fn test_stale_load_dropped() {
        let mut page = page();
        let old = page.begin_load();
        let new = page.begin_load();
        page.finish_load(new, Ok(vec![product(2, 1)]));
        page.finish_load(old, Ok(vec![product(1, 1), product(3, 1)]));

        assert_eq!(page.products().len(), 1);
        assert_eq!(page.state(), &LoadState::Loaded);
    }

    #[test]
    fn test_out_of_stock_cannot_be_added() {
        let mut page = page();
        let sold_out = product(1, 0);
        assert!(!page.can_add(&sold_out));
        assert!(matches!(
            page.begin_add(&sold_out),
            Err(AddToCartError::OutOfStock(_))
        ));
        assert!(page.adding().is_none());
    }

    #[test]
    fn test_one_add_in_flight() {
        let mut page = page();
        let first = product(1, 5);
        let second = product(2, 5);
        page.begin_add(&first).unwrap();
        assert!(!page.can_add(&second));
        assert!(matches!(page.begin_add(&second), Err(AddToCartError::Busy)));

        let result = page.finish_add(Err(ApiError::BadRequest("no".into())));
        assert!(result.is_err());
        assert!(page.adding().is_none());
        assert_eq!(page.notice().unwrap().message(), MSG_ADD_TO_CART_FAILED);
        assert!(page.can_add(&second));
    }
}
