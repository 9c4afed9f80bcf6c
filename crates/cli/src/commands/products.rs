//! Catalog browsing commands.

use askama::Template;
use shopfront_core::ProductId;
use shopfront_storefront::AppState;
use shopfront_storefront::views::{HomeTemplate, StockLevel};

use super::{CommandError, emit};

/// Print the catalog.
pub async fn list(state: &AppState) -> Result<(), CommandError> {
    let mut page = state.home_page();
    page.load().await;
    emit(&HomeTemplate::from(&page).render()?);
    Ok(())
}

/// Print one product.
pub async fn show(state: &AppState, id: ProductId) -> Result<(), CommandError> {
    let product = state.products().get(id).await.map_err(|e| {
        if e.is_not_found() {
            CommandError::ProductNotFound(id)
        } else {
            e.into()
        }
    })?;

    let mut text = format!(
        "#{}  {}\n  Price: {}\n  Stock: {} ({})",
        product.id,
        product.name,
        product.price.display(),
        product.stock,
        StockLevel::of(product.stock).label(),
    );
    if !product.description.is_empty() {
        text.push_str(&format!("\n  {}", product.description));
    }
    if let Some(image) = &product.image {
        text.push_str(&format!("\n  Image: {image}"));
    }
    if let Some(created_at) = product.created_at {
        text.push_str(&format!("\n  Added: {created_at}"));
    }
    emit(&text);
    Ok(())
}
