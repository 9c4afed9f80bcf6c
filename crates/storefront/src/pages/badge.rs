//! Cart item count shown in the page header.

use shopfront_core::{Cart, UserId};

use super::{Generation, RequestSequence, stale};
use crate::api::ApiError;
use crate::services::CartService;

const BADGE_MAX: u64 = 99;

/// Total units in the current user's cart. Any failure shows 0.
#[derive(Debug)]
pub struct CartBadge {
    carts_api: CartService,
    count: u64,
    sequence: RequestSequence,
}

impl CartBadge {
    #[must_use]
    pub fn new(carts_api: CartService) -> Self {
        Self {
            carts_api,
            count: 0,
            sequence: RequestSequence::default(),
        }
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// The count as displayed; anything above 99 shows as `99+`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.count > BADGE_MAX {
            format!("{BADGE_MAX}+")
        } else {
            self.count.to_string()
        }
    }

    pub fn begin_refresh(&mut self) -> Generation {
        self.sequence.issue()
    }

    pub fn finish_refresh(&mut self, generation: Generation, result: Result<Cart, ApiError>) {
        if !self.sequence.is_current(generation) {
            stale("badge", generation);
            return;
        }
        self.count = match result {
            Ok(cart) => cart.item_count(),
            Err(e) => {
                tracing::debug!(error = %e, "Cart count unavailable");
                0
            }
        };
    }

    /// Recount `user`'s cart.
    pub async fn refresh(&mut self, user: UserId) -> u64 {
        let generation = self.begin_refresh();
        let result = self.carts_api.get_by_user(user).await;
        self.finish_refresh(generation, result);
        self.count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;

    fn badge() -> CartBadge {
        let api = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        CartBadge::new(CartService::new(api))
    }

    fn cart() -> Cart {
        let item = |id: i64, quantity: i64| {
            json!({
                "id": id,
                "product": {"id": id, "name": "P", "price": 1, "stock": 9},
                "quantity": quantity,
                "subtotal": quantity
            })
        };
        serde_json::from_value(json!({
            "id": 1, "userId": 1, "items": [item(1, 2), item(2, 3)], "total": 5
        }))
        .unwrap()
    }

    #[test]
    fn test_counts_units() {
        let mut badge = badge();
        let generation = badge.begin_refresh();
        badge.finish_refresh(generation, Ok(cart()));
        assert_eq!(badge.count(), 5);
    }

    #[test]
    fn test_label_caps_at_99() {
        let mut badge = badge();
        assert_eq!(badge.label(), "0");
        badge.count = 99;
        assert_eq!(badge.label(), "99");
        badge.count = 100;
        assert_eq!(badge.label(), "99+");
    }

    #[test]
    fn test_failure_shows_zero() {
        let mut badge = badge();
        let generation = badge.begin_refresh();
        badge.finish_refresh(generation, Ok(cart()));
        let generation = badge.begin_refresh();
        badge.finish_refresh(generation, Err(ApiError::NotFound("none".into())));
        assert_eq!(badge.count(), 0);
    }
}
