//! Entity records as the backend sends them.
//!
//! The backend owns every entity. These records decode strictly: an invalid
//! price, stock level or quantity fails the whole payload instead of being
//! patched up on the client.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{AddToCart, Cart, CartItem};
pub use order::{Checkout, Order, OrderItem};
pub use product::{NewProduct, Product, ProductPatch};

/// Treat `null`, a missing field and `""` alike.
pub(crate) fn empty_as_none<'de, D>(
    deserializer: D,
) -> Result<Option<crate::ImagePayload>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(crate::ImagePayload::from_backend))
}
