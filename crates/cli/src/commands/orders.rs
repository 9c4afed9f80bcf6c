//! Order history commands.

use askama::Template;
use shopfront_core::{Order, OrderId, UserId};
use shopfront_storefront::AppState;
use shopfront_storefront::views::OrderTemplate;

use super::{CommandError, emit};

fn print_all(orders: &[Order]) -> Result<(), CommandError> {
    if orders.is_empty() {
        emit("No orders.");
    }
    for order in orders {
        emit(&OrderTemplate::from(order).render()?);
    }
    Ok(())
}

/// Print every order.
pub async fn list(state: &AppState) -> Result<(), CommandError> {
    print_all(&state.orders().list().await?)
}

/// Print one order.
pub async fn show(state: &AppState, id: OrderId) -> Result<(), CommandError> {
    let order = state.orders().get(id).await?;
    emit(&OrderTemplate::from(&order).render()?);
    Ok(())
}

/// Print the current user's orders.
pub async fn mine(state: &AppState, user: UserId) -> Result<(), CommandError> {
    print_all(&state.orders().list_by_user(user).await?)
}
