//! Catalog products.

use serde::{Deserialize, Serialize};

use crate::types::{ImagePayload, Price, ProductId, Stock, Timestamp};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    pub price: Price,
    pub stock: Stock,
    #[serde(
        rename = "imageBase64",
        default,
        deserialize_with = "super::empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<ImagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        !self.stock.is_out()
    }
}

/// Payload for `POST /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: Stock,
    #[serde(rename = "imageBase64", skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

/// Payload for `PATCH /products/{id}`; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<Stock>,
    /// `Some(None)` removes the image; it is sent as an empty string.
    #[serde(
        rename = "imageBase64",
        serialize_with = "empty_when_cleared",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<ImagePayload>>,
}

impl ProductPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.image.is_none()
    }
}

impl From<NewProduct> for ProductPatch {
    fn from(product: NewProduct) -> Self {
        Self {
            name: Some(product.name),
            description: Some(product.description),
            price: Some(product.price),
            stock: Some(product.stock),
            image: Some(product.image),
        }
    }
}

#[allow(clippy::ref_option)]
fn empty_when_cleared<S: serde::Serializer>(
    image: &Option<Option<ImagePayload>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match image {
        Some(Some(payload)) => payload.serialize(serializer),
        _ => serializer.serialize_str(""),
    }
}

fn nullable_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
