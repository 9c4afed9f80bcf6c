//! Plain-text rendering of page state.
//!
//! Views are pure: they take what a page already holds and format it. Prices
//! and stock labels are preformatted here so templates stay logic-free.

use askama::Template;
use shopfront_core::{CartItem, Order, OrderItem, Product, Stock};

use crate::pages::{AdminPage, CartPage, HomePage, LoadState, Notice, ProductModal};

/// Stock level as shown in the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    InStock,
    Low,
    Out,
}

impl StockLevel {
    #[must_use]
    pub const fn of(stock: Stock) -> Self {
        if stock.is_out() {
            Self::Out
        } else if stock.is_low() {
            Self::Low
        } else {
            Self::InStock
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "in stock",
            Self::Low => "low",
            Self::Out => "out",
        }
    }
}

/// One catalog card.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub availability: String,
    pub action: &'static str,
}

impl ProductCardView {
    fn new(product: &Product, page: &HomePage) -> Self {
        let availability = if product.in_stock() {
            format!("In Stock: {}", product.stock)
        } else {
            "Out of Stock".to_string()
        };
        let action = if page.adding() == Some(product.id) {
            "adding..."
        } else if page.can_add(product) {
            "add"
        } else {
            "-"
        };
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.display(),
            availability,
            action,
        }
    }
}

/// Catalog page.
#[derive(Template)]
#[template(path = "home.txt")]
pub struct HomeTemplate {
    pub products: Vec<ProductCardView>,
    pub status: Option<String>,
    pub notice: Option<String>,
}

impl From<&HomePage> for HomeTemplate {
    fn from(page: &HomePage) -> Self {
        Self {
            products: page
                .products()
                .iter()
                .map(|product| ProductCardView::new(product, page))
                .collect(),
            status: status(page.state()),
            notice: page.notice().map(notice),
        }
    }
}

/// One cart line.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
    pub can_decrement: bool,
}

impl CartLineView {
    fn new(item: &CartItem, page: &CartPage) -> Self {
        Self {
            product_id: item.product.id.to_string(),
            name: item.product.name.clone(),
            unit_price: item.product.price.display(),
            quantity: item.quantity.get(),
            subtotal: item.subtotal.display(),
            can_decrement: page.can_decrement(item),
        }
    }
}

/// Cart page.
#[derive(Template)]
#[template(path = "cart.txt")]
pub struct CartTemplate {
    pub user: String,
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub busy: bool,
    pub can_checkout: bool,
    pub status: Option<String>,
    pub notice: Option<String>,
}

impl CartTemplate {
    #[must_use]
    pub fn new(page: &CartPage, user: impl ToString) -> Self {
        Self {
            user: user.to_string(),
            lines: page
                .items()
                .iter()
                .map(|item| CartLineView::new(item, page))
                .collect(),
            total: page.total().display(),
            busy: page.is_updating() || page.is_checking_out(),
            can_checkout: page.can_checkout(),
            status: status(page.state()),
            notice: page.notice().map(notice),
        }
    }
}

/// One admin table row.
#[derive(Debug, Clone)]
pub struct AdminRowView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub stock: u32,
    pub level: &'static str,
    pub pending_delete: bool,
}

/// Admin catalog editor.
#[derive(Template)]
#[template(path = "admin.txt")]
pub struct AdminTemplate {
    pub rows: Vec<AdminRowView>,
    pub modal: Option<String>,
    pub form_errors: Vec<String>,
    pub status: Option<String>,
    pub notice: Option<String>,
}

impl From<&AdminPage> for AdminTemplate {
    fn from(page: &AdminPage) -> Self {
        let rows = page
            .products()
            .iter()
            .map(|product| AdminRowView {
                id: product.id.to_string(),
                name: product.name.clone(),
                price: product.price.display(),
                stock: product.stock.get(),
                level: StockLevel::of(product.stock).label(),
                pending_delete: page.pending_delete() == Some(product.id),
            })
            .collect();

        let modal = match page.modal() {
            ProductModal::Closed => None,
            ProductModal::Open { form, .. } => Some(format!("Editing \"{}\"", form.name)),
            ProductModal::Submitting { form, .. } => Some(format!("Saving \"{}\"...", form.name)),
        };
        let form_errors = page
            .modal()
            .errors()
            .map(|errors| errors.iter().map(ToString::to_string).collect())
            .unwrap_or_default();

        Self {
            rows,
            modal,
            form_errors,
            status: status(page.state()),
            notice: page.notice().map(notice),
        }
    }
}

/// One purchased line.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub subtotal: String,
}

impl From<&OrderItem> for OrderLineView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.product_name.clone(),
            unit_price: item.product_price.display(),
            quantity: item.quantity.get(),
            subtotal: item.subtotal.display(),
        }
    }
}

/// Order summary.
#[derive(Template)]
#[template(path = "order.txt")]
pub struct OrderTemplate {
    pub id: String,
    pub user: String,
    pub placed_at: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub total: String,
}

impl From<&Order> for OrderTemplate {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            user: order.user_id.to_string(),
            placed_at: order.created_at.map(|at| at.to_string()),
            lines: order.items.iter().map(OrderLineView::from).collect(),
            total: order.total_price.display(),
        }
    }
}

fn status(state: &LoadState) -> Option<String> {
    match state {
        LoadState::Idle | LoadState::Loaded => None,
        LoadState::Loading => Some("Loading...".to_string()),
        LoadState::Failed(message) => Some(message.clone()),
    }
}

fn notice(notice: &Notice) -> String {
    if notice.is_error() {
        format!("[error] {notice}")
    } else {
        format!("[ok] {notice}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stock_levels() {
        assert_eq!(StockLevel::of(Stock::from(11)), StockLevel::InStock);
        assert_eq!(StockLevel::of(Stock::from(10)), StockLevel::Low);
        assert_eq!(StockLevel::of(Stock::from(1)), StockLevel::Low);
        assert_eq!(StockLevel::of(Stock::from(0)), StockLevel::Out);
    }

    #[test]
    fn test_order_summary_renders() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "userId": 2,
            "totalPrice": 2500,
            "createdAt": "2025-06-01T12:30:00Z",
            "items": [{
                "id": 1, "productId": 3, "productName": "Lamp",
                "productPrice": 1250, "quantity": 2, "subtotal": 2500
            }]
        }))
        .unwrap();

        let text = OrderTemplate::from(&order).render().unwrap();
        assert!(text.contains("Order #12"));
        assert!(text.contains("Lamp"));
        assert!(text.contains("₱2,500.00"));
        assert!(text.contains("2025-06-01 12:30"));
    }
}
