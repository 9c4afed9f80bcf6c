//! Order facade.
//!
//! Checkout is the only way an order comes into existence: one call turns the
//! user's cart into an order. A 400 from checkout signals insufficient stock.

use serde::Deserialize;
use shopfront_core::{Checkout, Order, OrderId, UserId};
use tracing::instrument;

use crate::api::{ApiClient, ApiResult};

/// Typed access to `/orders`.
#[derive(Debug, Clone)]
pub struct OrderService {
    api: ApiClient,
}

/// `/orders/user/{id}` may answer with one order or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Order>),
    One(Box<Order>),
}

impl From<OneOrMany> for Vec<Order> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(orders) => orders,
            OneOrMany::One(order) => vec![*order],
        }
    }
}

impl OrderService {
    /// Create a facade over `api`.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Turn the user's cart into an order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::BadRequest`](crate::api::ApiError::BadRequest)
    /// when stock is insufficient, or any other error if the request fails.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn checkout(&self, user: UserId) -> ApiResult<Order> {
        self.api
            .post("orders/checkout", &Checkout { user_id: user })
            .await
    }

    /// List every order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self))]
    pub async fn list(&self) -> ApiResult<Vec<Order>> {
        self.api.get("orders").await
    }

    /// Get one order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`](crate::api::ApiError::NotFound) if the order does not exist.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn get(&self, id: OrderId) -> ApiResult<Order> {
        self.api.get(&format!("orders/{id}")).await
    }

    /// List a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the payload is malformed.
    #[instrument(skip(self), fields(user_id = %user))]
    pub async fn list_by_user(&self, user: UserId) -> ApiResult<Vec<Order>> {
        let orders: OneOrMany = self.api.get(&format!("orders/user/{user}")).await?;
        Ok(orders.into())
    }
}
