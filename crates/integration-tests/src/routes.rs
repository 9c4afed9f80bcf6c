//! HTTP surface of the fake backend.
//!
//! ```text
//! GET    /products                               - List products
//! POST   /products                               - Create product
//! GET    /products/{id}                          - Get product
//! PATCH  /products/{id}                          - Update product
//! DELETE /products/{id}                          - Delete product
//! POST   /carts/add                              - Add to cart
//! GET    /carts                                  - List carts
//! GET    /carts/user/{userId}                    - Get user's cart
//! PATCH  /carts/user/{userId}/product/{id}?quantity=N - Set quantity
//! DELETE /carts/user/{userId}/product/{id}       - Remove from cart
//! POST   /orders/checkout                        - Checkout
//! GET    /orders                                 - List orders
//! GET    /orders/{id}                            - Get order
//! GET    /orders/user/{userId}                   - List user's orders
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use shopfront_core::{Cart, Order, OrderId, Product, ProductId, UserId};

use crate::store::{ProductInput, Store, StoreError};

/// Backend state plus test controls.
#[derive(Debug, Default)]
pub struct Backend {
    pub store: Store,
    /// Every request seen, as `METHOD /path?query`.
    pub requests: Vec<String>,
    /// Status to answer the next request with instead of handling it.
    pub fail_next: Option<StatusCode>,
}

pub type SharedBackend = Arc<Mutex<Backend>>;

pub fn lock(backend: &SharedBackend) -> MutexGuard<'_, Backend> {
    backend.lock().unwrap_or_else(PoisonError::into_inner)
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, StoreError>;

/// Build the router.
pub fn router(backend: SharedBackend) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/carts", get(list_carts))
        .route("/carts/add", post(add_to_cart))
        .route("/carts/user/{user_id}", get(get_cart))
        .route(
            "/carts/user/{user_id}/product/{product_id}",
            patch(update_cart_item).delete(remove_cart_item),
        )
        .route("/orders", get(list_orders))
        .route("/orders/checkout", post(checkout))
        .route("/orders/{id}", get(get_order))
        .route("/orders/user/{user_id}", get(user_orders))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Log the request and apply any injected failure.
async fn record(State(backend): State<SharedBackend>, request: Request, next: Next) -> Response {
    let entry = format!(
        "{} {}",
        request.method(),
        request
            .uri()
            .path_and_query()
            .map_or_else(|| request.uri().path(), |pq| pq.as_str())
    );
    tracing::debug!(request = %entry, "Fake backend request");

    let fault = {
        let mut backend = lock(&backend);
        backend.requests.push(entry);
        backend.fail_next.take()
    };
    if let Some(status) = fault {
        return (status, Json(json!({ "message": "Injected failure" }))).into_response();
    }
    next.run(request).await
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(backend): State<SharedBackend>) -> Json<Vec<Product>> {
    Json(lock(&backend).store.list_products())
}

async fn get_product(
    State(backend): State<SharedBackend>,
    Path(id): Path<ProductId>,
) -> ApiResult<Product> {
    lock(&backend).store.get_product(id).map(Json)
}

async fn create_product(
    State(backend): State<SharedBackend>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), StoreError> {
    let product = lock(&backend).store.create_product(input)?;
    Ok((StatusCode::CREATED, Json(product)))
}

async fn update_product(
    State(backend): State<SharedBackend>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Product> {
    lock(&backend).store.update_product(id, input).map(Json)
}

async fn delete_product(
    State(backend): State<SharedBackend>,
    Path(id): Path<ProductId>,
) -> Result<StatusCode, StoreError> {
    lock(&backend).store.delete_product(id)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Carts
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddToCartBody {
    user_id: UserId,
    product_id: ProductId,
    quantity: i64,
}

#[derive(Deserialize)]
struct QuantityQuery {
    quantity: i64,
}

async fn add_to_cart(
    State(backend): State<SharedBackend>,
    Json(body): Json<AddToCartBody>,
) -> ApiResult<Cart> {
    lock(&backend)
        .store
        .add_to_cart(body.user_id, body.product_id, body.quantity)
        .map(Json)
}

async fn list_carts(State(backend): State<SharedBackend>) -> ApiResult<Vec<Cart>> {
    lock(&backend).store.list_carts().map(Json)
}

async fn get_cart(
    State(backend): State<SharedBackend>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Cart> {
    lock(&backend).store.cart_for(user_id).map(Json)
}

async fn update_cart_item(
    State(backend): State<SharedBackend>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
    Query(query): Query<QuantityQuery>,
) -> ApiResult<Cart> {
    lock(&backend)
        .store
        .update_cart_item(user_id, product_id, query.quantity)
        .map(Json)
}

async fn remove_cart_item(
    State(backend): State<SharedBackend>,
    Path((user_id, product_id)): Path<(UserId, ProductId)>,
) -> ApiResult<Cart> {
    lock(&backend)
        .store
        .remove_cart_item(user_id, product_id)
        .map(Json)
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutBody {
    user_id: UserId,
}

async fn checkout(
    State(backend): State<SharedBackend>,
    Json(body): Json<CheckoutBody>,
) -> ApiResult<Order> {
    lock(&backend).store.checkout(body.user_id).map(Json)
}

async fn list_orders(State(backend): State<SharedBackend>) -> Json<Vec<Order>> {
    Json(lock(&backend).store.list_orders())
}

async fn get_order(
    State(backend): State<SharedBackend>,
    Path(id): Path<OrderId>,
) -> ApiResult<Order> {
    lock(&backend).store.get_order(id).map(Json)
}

async fn user_orders(
    State(backend): State<SharedBackend>,
    Path(user_id): Path<UserId>,
) -> Json<Vec<Order>> {
    Json(lock(&backend).store.orders_for(user_id))
}
