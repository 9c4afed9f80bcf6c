//! Cart commands for the current user.

use askama::Template;
use shopfront_core::{ProductId, Quantity, UserId};
use shopfront_storefront::AppState;
use shopfront_storefront::pages::CartPage;
use shopfront_storefront::views::{CartTemplate, OrderTemplate};

use super::{CommandError, emit, emit_notice};

async fn loaded(state: &AppState, user: UserId) -> CartPage {
    let mut page = state.cart_page();
    page.load(user).await;
    page
}

fn render(page: &CartPage, user: UserId) -> Result<(), CommandError> {
    emit(&CartTemplate::new(page, user).render()?);
    Ok(())
}

/// Print the cart.
pub async fn show(state: &AppState, user: UserId) -> Result<(), CommandError> {
    let page = loaded(state, user).await;
    render(&page, user)
}

/// Add `quantity` units of `product`.
pub async fn add(
    state: &AppState,
    user: UserId,
    product: ProductId,
    quantity: i64,
) -> Result<(), CommandError> {
    let quantity = Quantity::new(quantity)?;
    if quantity.is_one() {
        let product = state.products().get(product).await?;
        let mut home = state.home_page();
        let result = home.add_to_cart(user, &product).await;
        emit_notice(home.notice());
        result?;
    } else {
        state.carts().add_item(user, product, quantity).await?;
    }
    show(state, user).await
}

/// Add one unit of `product`.
pub async fn increment(
    state: &AppState,
    user: UserId,
    product: ProductId,
) -> Result<(), CommandError> {
    let mut page = loaded(state, user).await;
    let result = page.increment(user, product).await;
    emit_notice(page.notice());
    result?;
    render(&page, user)
}

/// Remove one unit of `product`.
pub async fn decrement(
    state: &AppState,
    user: UserId,
    product: ProductId,
) -> Result<(), CommandError> {
    let mut page = loaded(state, user).await;
    let result = page.decrement(user, product).await;
    emit_notice(page.notice());
    result?;
    render(&page, user)
}

/// Remove `product` from the cart.
pub async fn remove(state: &AppState, user: UserId, product: ProductId) -> Result<(), CommandError> {
    let mut page = loaded(state, user).await;
    let result = page.remove(user, product).await;
    emit_notice(page.notice());
    result?;
    render(&page, user)
}

/// Check out and print the order.
pub async fn checkout(state: &AppState, user: UserId) -> Result<(), CommandError> {
    let mut page = loaded(state, user).await;
    let result = page.checkout(user).await;
    emit_notice(page.notice());
    let order = result?;
    emit(&OrderTemplate::from(&order).render()?);
    Ok(())
}

/// Print every cart.
pub async fn list_all(state: &AppState) -> Result<(), CommandError> {
    let carts = state.carts().list().await?;
    if carts.is_empty() {
        emit("No carts.");
    }
    for cart in carts {
        emit(&format!(
            "Cart #{} (user {}): {} item(s), total {}",
            cart.id,
            cart.user_id,
            cart.item_count(),
            cart.total.display()
        ));
    }
    Ok(())
}
