//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod image;
pub mod price;
pub mod quantity;
pub mod timestamp;

pub use id::*;
pub use image::{ImageError, ImagePayload};
pub use price::{Price, PriceError};
pub use quantity::{Quantity, QuantityError, Stock};
pub use timestamp::Timestamp;
