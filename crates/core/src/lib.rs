//! Shopfront Core - Shared types library.
//!
//! This crate provides the types used across all Shopfront components:
//! - `storefront` - REST client, service facades and page controllers
//! - `cli` - Terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The backend
//! owns every entity; these records are how the client sees them on the wire.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, quantities, timestamps and images
//! - [`models`] - Product, cart and order records plus request payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
