//! Shopping carts.
//!
//! Totals and subtotals are computed by the backend and carried as-is. The
//! client never re-derives them, so what is displayed always matches what
//! checkout will charge.

use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::types::{CartId, CartItemId, Price, ProductId, Quantity, UserId};

/// A user's cart with its items and backend-computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total: Price,
}

impl Cart {
    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn item_for(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }
}

/// One product line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    /// Product as it was when the cart was read.
    pub product: Product,
    pub quantity: Quantity,
    pub subtotal: Price,
}

/// Payload for `POST /carts/add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}
