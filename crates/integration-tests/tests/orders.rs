//! Order facade against the fake backend.

#![allow(clippy::unwrap_used)]

use shopfront_core::{OrderId, Quantity, UserId};
use shopfront_integration_tests::TestBackend;
use shopfront_storefront::ApiError;

const USER: UserId = UserId::new(1);

#[tokio::test]
async fn test_checkout_creates_order_and_empties_cart() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "9.99", 5);
    let state = backend.app_state().unwrap();

    let cart = state
        .carts()
        .add_item(USER, widget.id, Quantity::new(3).unwrap())
        .await
        .unwrap();

    let order = state.orders().checkout(USER).await.unwrap();
    assert_eq!(order.total_price, cart.total);
    assert_eq!(order.item_count(), 3);
    let line = order.items.first().unwrap();
    assert_eq!(line.product_name, "Widget");
    assert_eq!(line.product_price, widget.price);

    assert!(state.carts().get_by_user(USER).await.unwrap().is_empty());
    let widget = state.products().get(widget.id).await.unwrap();
    assert_eq!(widget.stock.get(), 2);
}

#[tokio::test]
async fn test_insufficient_stock_is_bad_request() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "9.99", 5);
    let state = backend.app_state().unwrap();

    state
        .carts()
        .add_item(USER, widget.id, Quantity::new(4).unwrap())
        .await
        .unwrap();
    backend.set_stock(widget.id, 1).unwrap();

    let err = state.orders().checkout(USER).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(ref msg) if msg.contains("Insufficient stock")));
    assert_eq!(state.carts().get_by_user(USER).await.unwrap().item_count(), 4);
}

#[tokio::test]
async fn test_order_lookups() {
    let backend = TestBackend::spawn().await.unwrap();
    let widget = backend.seed_product("Widget", "2", 50);
    let state = backend.app_state().unwrap();

    for user in [1, 2, 1] {
        let user = UserId::new(user);
        state
            .carts()
            .add_item(user, widget.id, Quantity::ONE)
            .await
            .unwrap();
        state.orders().checkout(user).await.unwrap();
    }

    assert_eq!(state.orders().list().await.unwrap().len(), 3);
    let mine = state.orders().list_by_user(USER).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|order| order.user_id == USER));

    let first = mine.first().unwrap();
    let fetched = state.orders().get(first.id).await.unwrap();
    assert_eq!(&fetched, first);

    let err = state.orders().get(OrderId::new(999)).await.unwrap_err();
    assert!(err.is_not_found());
}
