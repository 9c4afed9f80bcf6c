//! Shopfront storefront library.
//!
//! Talks to the Shopfront REST backend and drives the storefront pages:
//!
//! - [`api`] - HTTP client and error taxonomy
//! - [`services`] - One typed facade per REST resource
//! - [`identity`] - The currently selected user
//! - [`pages`] - View controllers for browsing, cart and admin
//! - [`views`] - Plain-text rendering of page state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod identity;
pub mod pages;
pub mod services;
pub mod state;
pub mod views;

pub use api::{ApiClient, ApiError, ApiResult};
pub use config::{ApiConfig, ConfigError, StorefrontConfig};
pub use identity::IdentityContext;
pub use state::AppState;
