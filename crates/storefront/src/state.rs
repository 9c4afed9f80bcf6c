//! Application state shared across pages and commands.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::StorefrontConfig;
use crate::identity::IdentityContext;
use crate::pages::{AdminPage, CartBadge, CartPage, HomePage};
use crate::services::{CartService, OrderService, ProductService};

/// Application state shared across the front end.
///
/// This struct is cheaply cloneable via `Arc` and hands out the facades, the
/// identity context and freshly constructed pages.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    products: ProductService,
    carts: CartService,
    orders: OrderService,
    identity: IdentityContext,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The identity starts at the configured default user.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let identity = IdentityContext::new(config.default_user);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                products: ProductService::new(api.clone()),
                carts: CartService::new(api.clone()),
                orders: OrderService::new(api.clone()),
                api,
                identity,
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityContext {
        &self.inner.identity
    }

    #[must_use]
    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.products().clone(), self.carts().clone())
    }

    #[must_use]
    pub fn cart_page(&self) -> CartPage {
        CartPage::new(self.carts().clone(), self.orders().clone())
    }

    #[must_use]
    pub fn admin_page(&self) -> AdminPage {
        AdminPage::new(self.products().clone())
    }

    #[must_use]
    pub fn cart_badge(&self) -> CartBadge {
        CartBadge::new(self.carts().clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("api", &self.inner.api)
            .field("user", &self.inner.identity.current())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::UserId;
    use url::Url;

    use super::*;

    #[test]
    fn test_identity_starts_at_configured_user() {
        let mut config = StorefrontConfig::for_api(Url::parse("http://127.0.0.1:9").unwrap());
        config.default_user = UserId::new(4);
        let state = AppState::new(config).unwrap();
        assert_eq!(state.identity().current(), UserId::new(4));
        assert_eq!(state.api().base_url().as_str(), "http://127.0.0.1:9/");
    }
}
