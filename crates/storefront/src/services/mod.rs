//! Service facades over the REST backend.
//!
//! # Services
//!
//! - `products` - Catalog reads and admin edits (`/products`)
//! - `carts` - Per-user carts (`/carts`)
//! - `orders` - Checkout and order history (`/orders`)
//!
//! Each facade is a pass-through: it builds the request, decodes the typed
//! response and returns backend failures unchanged. No validation, caching
//! or retries happen here. Every cart mutation returns the full resulting
//! cart so callers can replace their state wholesale.

pub mod carts;
pub mod orders;
pub mod products;

pub use carts::CartService;
pub use orders::OrderService;
pub use products::ProductService;
