//! Command implementations.
//!
//! Each command builds the page it needs from [`AppState`], drives it and
//! prints the rendered view.
//!
//! [`AppState`]: shopfront_storefront::AppState

pub mod admin;
pub mod cart;
pub mod orders;
pub mod products;
pub mod shell;

use shopfront_core::{ImageError, ProductId, QuantityError};
use shopfront_storefront::pages::{AddToCartError, AdminActionError, CartActionError, Notice};
use shopfront_storefront::{ApiError, ConfigError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    AddToCart(#[from] AddToCartError),

    #[error(transparent)]
    Cart(#[from] CartActionError),

    #[error(transparent)]
    Admin(#[from] AdminActionError),

    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid image: {0}")]
    Image(#[from] ImageError),

    #[error("Failed to render view: {0}")]
    Render(#[from] askama::Error),
}

/// Write command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{}", text.trim_end());
}

/// Print a page notice, if any.
pub fn emit_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        emit(notice.message());
    }
}
