//! View controllers.
//!
//! Each page owns its local state, calls the facades and reconciles results
//! into render state. Every page offers a split API:
//!
//! - `begin_*` marks the page busy and hands back a ticket ([`Generation`])
//! - `finish_*` applies a result for that ticket
//!
//! plus an async method that runs the facade call in between. An event loop
//! that fires a request and applies the answer later uses the split API.
//!
//! Responses carry the generation they were issued under; a response whose
//! generation has been superseded is dropped so an older answer can never
//! overwrite newer state.

pub mod admin;
pub mod badge;
pub mod cart;
pub mod home;
pub mod product_form;

pub use admin::{AdminActionError, AdminPage, FormMode, ProductModal, SubmitRequest};
pub use badge::CartBadge;
pub use cart::{CartActionError, CartPage, CheckoutFailure};
pub use home::{AddToCartError, HomePage};
pub use product_form::{FormError, FormErrors, ProductForm};

// =============================================================================
// User-facing messages
// =============================================================================

pub const MSG_ADDED_TO_CART: &str = "Added to cart!";
pub const MSG_ADD_TO_CART_FAILED: &str = "Failed to add to cart. Please try again.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update quantity. Please try again.";
pub const MSG_REMOVE_FAILED: &str = "Failed to remove item. Please try again.";
pub const MSG_ORDER_PLACED: &str = "Order Placed! Thank you for your purchase.";
pub const MSG_INSUFFICIENT_STOCK: &str = "Insufficient Stock! Please update your cart.";
pub const MSG_CHECKOUT_FAILED: &str = "Failed to checkout. Please try again.";
pub const MSG_PRODUCT_CREATED: &str = "Product created successfully!";
pub const MSG_PRODUCT_UPDATED: &str = "Product updated successfully!";
pub const MSG_PRODUCT_DELETED: &str = "Product deleted successfully!";
pub const MSG_SAVE_FAILED: &str = "Failed to save product. Please try again.";
pub const MSG_DELETE_FAILED: &str = "Failed to delete product. Please try again.";
pub const MSG_LOAD_PRODUCTS_FAILED: &str = "Failed to load products.";
pub const MSG_LOAD_CART_FAILED: &str = "Failed to load cart.";

/// Progress of a page's initial data load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The failure message, if the last load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Ticket identifying one request issued by a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

/// Issues generations and remembers the newest one.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    /// Issue a new generation, superseding every earlier one.
    pub const fn issue(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    /// Whether `generation` is still the newest issued.
    #[must_use]
    pub const fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}

/// A transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub(crate) fn success(message: &str) -> Self {
        Self::Success(message.to_string())
    }

    pub(crate) fn error(message: &str) -> Self {
        Self::Error(message.to_string())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Note a response that arrived after a newer request was issued.
fn stale(page: &'static str, generation: Generation) {
    tracing::debug!(page, generation = generation.0, "Dropping superseded response");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_supersedes() {
        let mut seq = RequestSequence::default();
        let first = seq.issue();
        assert!(seq.is_current(first));
        let second = seq.issue();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn test_load_state_error() {
        assert_eq!(LoadState::Failed("x".into()).error(), Some("x"));
        assert!(LoadState::Loading.is_loading());
        assert_eq!(LoadState::default(), LoadState::Idle);
    }
}
