//! Catalog management commands.
//!
//! Create and edit go through the admin page's product form, so the same
//! validation applies as in the interactive editor. Deletes require
//! `--confirm`.

use std::path::{Path, PathBuf};

use askama::Template;
use rust_decimal::Decimal;
use shopfront_core::{ImageError, ImagePayload, ProductId};
use shopfront_storefront::AppState;
use shopfront_storefront::pages::{AdminPage, ProductForm};
use shopfront_storefront::views::AdminTemplate;

use super::{CommandError, emit, emit_notice};

/// Raw field values from the command line.
#[derive(Debug, Default)]
pub struct FormInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub image: Option<PathBuf>,
    pub clear_image: bool,
}

impl FormInput {
    /// Overwrite the fields that were given.
    async fn apply(self, form: &mut ProductForm) -> Result<(), CommandError> {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(stock) = self.stock {
            form.stock = stock;
        }
        if let Some(path) = self.image {
            form.image = Some(read_image(&path).await?);
        } else if self.clear_image {
            form.image = None;
        }
        Ok(())
    }
}

/// Encode an image file as a data URL, picking the type from its extension.
pub async fn read_image(path: &Path) -> Result<ImagePayload, CommandError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let mime = ImagePayload::mime_for_extension(extension)
        .ok_or_else(|| ImageError::UnsupportedType(extension.to_string()))?;
    let bytes = tokio::fs::read(path).await?;
    Ok(ImagePayload::from_bytes(mime, &bytes)?)
}

async fn loaded(state: &AppState) -> AdminPage {
    let mut page = state.admin_page();
    page.load().await;
    page
}

fn render(page: &AdminPage) -> Result<(), CommandError> {
    emit(&AdminTemplate::from(page).render()?);
    Ok(())
}

async fn submit(mut page: AdminPage) -> Result<(), CommandError> {
    let result = page.submit().await;
    emit_notice(page.notice());
    if result.is_err() {
        render(&page)?;
    }
    result?;
    Ok(())
}

/// Print the catalog with stock levels.
pub async fn list(state: &AppState) -> Result<(), CommandError> {
    render(&loaded(state).await)
}

/// Create a product.
pub async fn create(state: &AppState, input: FormInput) -> Result<(), CommandError> {
    let mut page = state.admin_page();
    page.open_new();
    if let Some(form) = page.form_mut() {
        input.apply(form).await?;
    }
    submit(page).await
}

/// Edit a product, keeping fields that were not given.
pub async fn edit(state: &AppState, id: ProductId, input: FormInput) -> Result<(), CommandError> {
    let product = state.products().get(id).await.map_err(|e| {
        if e.is_not_found() {
            CommandError::ProductNotFound(id)
        } else {
            e.into()
        }
    })?;

    let mut page = state.admin_page();
    page.open_edit(&product);
    if let Some(form) = page.form_mut() {
        input.apply(form).await?;
    }
    submit(page).await
}

/// Delete a product. Without `confirm` only the pending confirmation is shown.
pub async fn delete(state: &AppState, id: ProductId, confirm: bool) -> Result<(), CommandError> {
    let mut page = loaded(state).await;
    page.request_delete(id);

    if !confirm {
        render(&page)?;
        emit(&format!("Re-run with --confirm to delete product {id}."));
        return Ok(());
    }

    let result = page.confirm_delete().await;
    emit_notice(page.notice());
    result?;
    render(&page)
}
