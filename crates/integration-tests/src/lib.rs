//! Integration test support for Shopfront.
//!
//! Spins up an in-process fake of the REST backend on `127.0.0.1:0` so the
//! facades and pages can be exercised end to end without external services.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! let backend = TestBackend::spawn().await?;
//! let widget = backend.seed_product("Widget", "9.99", 5);
//! let state = backend.app_state()?;
//! let cart = state.carts().add_item(UserId::DEFAULT, widget.id, Quantity::ONE).await?;
//! assert_eq!(cart.item_count(), 1);
//! ```

mod routes;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use shopfront_core::{Price, Product, ProductId, Stock};
use shopfront_storefront::{ApiError, AppState, StorefrontConfig};
use tokio::task::JoinHandle;
use url::Url;

use routes::{SharedBackend, lock};
pub use store::{ProductInput, StoreError};

/// A running fake backend. The server stops when this is dropped.
pub struct TestBackend {
    addr: SocketAddr,
    backend: SharedBackend,
    server: JoinHandle<()>,
}

impl TestBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        let backend = SharedBackend::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = routes::router(Arc::clone(&backend));

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fake backend stopped");
            }
        });

        Ok(Self {
            addr,
            backend,
            server,
        })
    }

    /// Base URL of the fake backend.
    ///
    /// # Panics
    ///
    /// Panics if the bound address does not form a URL.
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("socket address is a valid URL")
    }

    /// Application state pointed at this backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn app_state(&self) -> Result<AppState, ApiError> {
        AppState::new(StorefrontConfig::for_api(self.url()))
    }

    /// Insert a product directly, bypassing HTTP.
    ///
    /// # Panics
    ///
    /// Panics if `price` is not a valid non-negative decimal.
    pub fn seed_product(&self, name: &str, price: &str, stock: u32) -> Product {
        let input = ProductInput {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            price: Some(Price::parse(price).expect("valid seed price")),
            stock: Some(Stock::from(stock)),
            image_base64: None,
        };
        lock(&self.backend)
            .store
            .create_product(input)
            .expect("valid seed product")
    }

    /// Change a product's stock directly, as another shopper or admin would.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the product does not exist.
    pub fn set_stock(&self, id: ProductId, stock: u32) -> Result<Product, StoreError> {
        let input = ProductInput {
            stock: Some(Stock::from(stock)),
            ..ProductInput::default()
        };
        lock(&self.backend).store.update_product(id, input)
    }

    /// Answer the next request with `status` instead of handling it.
    pub fn fail_next(&self, status: StatusCode) {
        lock(&self.backend).fail_next = Some(status);
    }

    /// Every request seen so far, as `METHOD /path?query`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.backend).requests.clone()
    }

    /// Forget the recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.backend).requests.clear();
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

impl std::fmt::Debug for TestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestBackend")
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}
