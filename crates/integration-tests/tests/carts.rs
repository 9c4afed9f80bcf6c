//! Cart facade against the fake backend.

#![allow(clippy::unwrap_used)]

use shopfront_core::{Price, Quantity, UserId};
use shopfront_integration_tests::TestBackend;
use shopfront_storefront::ApiError;

const USER: UserId = UserId::new(1);

#[tokio::test]
async fn test_add_then_fetch_subtotal() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "9.99", 10);
    let state = backend.app_state().unwrap();

    for quantity in [1, 3, 7] {
        let user = UserId::new(quantity);
        let quantity = Quantity::new(quantity).unwrap();
        state.carts().add_item(user, widget.id, quantity).await.unwrap();

        let cart = state.carts().get_by_user(user).await.unwrap();
        let item = cart.item_for(widget.id).unwrap();
        assert_eq!(item.quantity, quantity);
        assert_eq!(
            item.subtotal.amount(),
            widget.price.amount() * rust_decimal::Decimal::from(quantity.get())
        );
    }
}

#[tokio::test]
async fn test_every_mutation_returns_full_cart() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "5", 10);
    let lamp = backend.seed_product("Lamp", "20", 10);
    let state = backend.app_state().unwrap();
    let carts = state.carts();

    carts.add_item(USER, widget.id, Quantity::ONE).await.unwrap();
    let cart = carts.add_item(USER, lamp.id, Quantity::ONE).await.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, Price::parse("25").unwrap());

    let cart = carts
        .update_item(USER, widget.id, Quantity::new(4).unwrap())
        .await
        .unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.total, Price::parse("40").unwrap());

    let cart = carts.remove_item(USER, lamp.id).await.unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, Price::parse("20").unwrap());

    let sum = cart
        .items
        .iter()
        .map(|item| item.subtotal.amount())
        .sum::<rust_decimal::Decimal>();
    assert_eq!(cart.total.amount(), sum);
}

#[tokio::test]
async fn test_update_sends_quantity_in_query() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "5", 10);
    let state = backend.app_state().unwrap();
    state
        .carts()
        .add_item(USER, widget.id, Quantity::ONE)
        .await
        .unwrap();
    backend.clear_requests();

    state
        .carts()
        .update_item(USER, widget.id, Quantity::new(3).unwrap())
        .await
        .unwrap();

    assert_eq!(
        backend.requests(),
        vec![format!("PATCH /carts/user/1/product/{}?quantity=3", widget.id)]
    );
}

#[tokio::test]
async fn test_no_cart_yet() {
    let backend = TestBackend::spawn().await.unwrap();
    let state = backend.app_state().unwrap();

    let err = state.carts().get_by_user(UserId::new(9)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_adding_beyond_stock_is_bad_request() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "5", 2);
    let state = backend.app_state().unwrap();

    let err = state
        .carts()
        .add_item(USER, widget.id, Quantity::new(3).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
}

#[tokio::test]
async fn test_list_carts() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "5", 10);
    let state = backend.app_state().unwrap();

    state
        .carts()
        .add_item(UserId::new(1), widget.id, Quantity::ONE)
        .await
        .unwrap();
    state
        .carts()
        .add_item(UserId::new(2), widget.id, Quantity::ONE)
        .await
        .unwrap();

    let carts = state.carts().list().await.unwrap();
    assert_eq!(carts.len(), 2);
}
