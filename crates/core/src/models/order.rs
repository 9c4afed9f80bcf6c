//! Orders created at checkout.
//!
//! An order is written once by the backend when a cart is checked out and is
//! never modified by the client. Line items freeze the product name and price
//! at the time of purchase.

use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderItemId, Price, ProductId, Quantity, Timestamp, UserId};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_price: Price,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Order {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub product_price: Price,
    pub quantity: Quantity,
    pub subtotal: Price,
}

/// Payload for `POST /orders/checkout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    pub user_id: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decodes_order_ignoring_back_reference() {
        let order: Order = serde_json::from_value(json!({
            "id": 5,
            "userId": 1,
            "totalPrice": "29.97",
            "createdAt": "2025-06-01T12:00:00Z",
            "items": [{
                "id": 50,
                "order": {"id": 5, "userId": 1, "totalPrice": 29.97},
                "productId": 3,
                "productName": "Widget",
                "productPrice": 9.99,
                "quantity": 3,
                "subtotal": 29.97
            }]
        }))
        .unwrap();

        assert_eq!(order.item_count(), 3);
        let item = order.items.first().unwrap();
        assert_eq!(item.product_name, "Widget");
        assert_eq!(item.subtotal, order.total_price);
    }

    #[test]
    fn test_checkout_wire_shape() {
        let body = serde_json::to_value(Checkout {
            user_id: UserId::new(4),
        })
        .unwrap();
        assert_eq!(body, json!({"userId": 4}));
    }
}
