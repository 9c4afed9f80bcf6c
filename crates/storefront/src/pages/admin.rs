//! Admin catalog editor.
//!
//! The product modal moves `Closed -> Open -> Submitting -> Closed`. Deletes
//! take two steps: a request records which product is pending, and only a
//! confirmation for that product sends the delete.

use shopfront_core::{NewProduct, Product, ProductId, ProductPatch};
use thiserror::Error;

use super::product_form::{FormErrors, ProductForm};
use super::{
    Generation, LoadState, MSG_DELETE_FAILED, MSG_LOAD_PRODUCTS_FAILED, MSG_PRODUCT_CREATED,
    MSG_PRODUCT_DELETED, MSG_PRODUCT_UPDATED, MSG_SAVE_FAILED, Notice, RequestSequence, stale,
};
use crate::api::ApiError;
use crate::services::ProductService;

/// Why an admin action was not completed.
#[derive(Debug, Error)]
pub enum AdminActionError {
    #[error("Another request is in progress")]
    Busy,
    #[error("The product form is not open")]
    ModalClosed,
    #[error("Invalid product: {0}")]
    Invalid(FormErrors),
    #[error("No delete is awaiting confirmation")]
    NoPendingDelete,
    #[error("Admin request failed: {0}")]
    Request(#[from] ApiError),
}

/// Whether the modal creates a product or edits one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New,
    Editing(Product),
}

/// The create/edit modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProductModal {
    #[default]
    Closed,
    Open {
        mode: FormMode,
        form: ProductForm,
        errors: FormErrors,
    },
    Submitting {
        mode: FormMode,
        form: ProductForm,
    },
}

impl ProductModal {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting { .. })
    }

    /// Validation errors from the last submit attempt.
    #[must_use]
    pub const fn errors(&self) -> Option<&FormErrors> {
        match self {
            Self::Open { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

/// A validated request ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitRequest {
    Create(NewProduct),
    Update(ProductId, ProductPatch),
}

/// Product table with create, edit and delete.
#[derive(Debug)]
pub struct AdminPage {
    products_api: ProductService,
    products: Vec<Product>,
    state: LoadState,
    sequence: RequestSequence,
    modal: ProductModal,
    pending_delete: Option<ProductId>,
    deleting: bool,
    notice: Option<Notice>,
}

impl AdminPage {
    #[must_use]
    pub fn new(products_api: ProductService) -> Self {
        Self {
            products_api,
            products: Vec::new(),
            state: LoadState::Idle,
            sequence: RequestSequence::default(),
            modal: ProductModal::Closed,
            pending_delete: None,
            deleting: false,
            notice: None,
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn modal(&self) -> &ProductModal {
        &self.modal
    }

    #[must_use]
    pub const fn pending_delete(&self) -> Option<ProductId> {
        self.pending_delete
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_load(&mut self) -> Generation {
        self.state = LoadState::Loading;
        self.sequence.issue()
    }

    /// Apply a product list. A failure keeps the last good list.
    pub fn finish_load(&mut self, generation: Generation, result: Result<Vec<Product>, ApiError>) {
        if !self.sequence.is_current(generation) {
            stale("admin", generation);
            return;
        }
        match result {
            Ok(products) => {
                self.products = products;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load products");
                self.state = LoadState::Failed(MSG_LOAD_PRODUCTS_FAILED.to_string());
            }
        }
    }

    /// Fetch the catalog.
    pub async fn load(&mut self) {
        let generation = self.begin_load();
        let result = self.products_api.list().await;
        self.finish_load(generation, result);
    }

    // =========================================================================
    // Create / edit modal
    // =========================================================================

    /// Open an empty form for a new product. Has no effect while a submit
    /// is in flight.
    pub fn open_new(&mut self) {
        if self.modal.is_submitting() {
            return;
        }
        self.modal = ProductModal::Open {
            mode: FormMode::New,
            form: ProductForm::default(),
            errors: FormErrors::default(),
        };
    }

    /// Open a form pre-filled from `product`. Has no effect while a submit
    /// is in flight.
    pub fn open_edit(&mut self, product: &Product) {
        if self.modal.is_submitting() {
            return;
        }
        self.modal = ProductModal::Open {
            mode: FormMode::Editing(product.clone()),
            form: ProductForm::from_product(product),
            errors: FormErrors::default(),
        };
    }

    /// Close the modal. Has no effect while a submit is in flight.
    pub fn close(&mut self) {
        if !self.modal.is_submitting() {
            self.modal = ProductModal::Closed;
        }
    }

    /// The form being edited, if the modal is open and idle.
    pub const fn form_mut(&mut self) -> Option<&mut ProductForm> {
        match &mut self.modal {
            ProductModal::Open { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Validate the form and move to `Submitting`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminActionError::Invalid`] and keeps the modal open if the
    /// form is invalid, [`AdminActionError::Busy`] while submitting, or
    /// [`AdminActionError::ModalClosed`] if there is no form.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, AdminActionError> {
        let (mode, form, errors) = match &mut self.modal {
            ProductModal::Open { mode, form, errors } => (mode, form, errors),
            ProductModal::Submitting { .. } => return Err(AdminActionError::Busy),
            ProductModal::Closed => return Err(AdminActionError::ModalClosed),
        };

        let product = match form.validate() {
            Ok(product) => product,
            Err(invalid) => {
                *errors = invalid.clone();
                return Err(AdminActionError::Invalid(invalid));
            }
        };

        let request = match mode {
            FormMode::New => SubmitRequest::Create(product),
            FormMode::Editing(existing) => SubmitRequest::Update(existing.id, product.into()),
        };

        let (mode, form) = (mode.clone(), form.clone());
        self.modal = ProductModal::Submitting { mode, form };
        Ok(request)
    }

    /// Apply the submit answer. Success closes the modal; failure reopens it
    /// with the form intact.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the save failed.
    pub fn finish_submit(
        &mut self,
        result: Result<Product, ApiError>,
    ) -> Result<Product, AdminActionError> {
        let (mode, form) = match std::mem::take(&mut self.modal) {
            ProductModal::Submitting { mode, form } => (mode, form),
            other => {
                self.modal = other;
                return Err(AdminActionError::ModalClosed);
            }
        };

        match result {
            Ok(product) => {
                let message = match mode {
                    FormMode::New => MSG_PRODUCT_CREATED,
                    FormMode::Editing(_) => MSG_PRODUCT_UPDATED,
                };
                tracing::info!(product_id = %product.id, "Saved product");
                self.notice = Some(Notice::success(message));
                Ok(product)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to save product");
                self.modal = ProductModal::Open {
                    mode,
                    form,
                    errors: FormErrors::default(),
                };
                self.notice = Some(Notice::error(MSG_SAVE_FAILED));
                Err(e.into())
            }
        }
    }

    /// Validate, send and, on success, reload the list.
    ///
    /// # Errors
    ///
    /// See [`AdminPage::begin_submit`] and [`AdminPage::finish_submit`].
    pub async fn submit(&mut self) -> Result<Product, AdminActionError> {
        let result = match self.begin_submit()? {
            SubmitRequest::Create(product) => self.products_api.create(&product).await,
            SubmitRequest::Update(id, patch) => self.products_api.update(id, &patch).await,
        };
        let product = self.finish_submit(result)?;
        self.load().await;
        Ok(product)
    }

    // =========================================================================
    // Two-step delete
    // =========================================================================

    /// Ask for confirmation before deleting `id`. Nothing is sent.
    pub fn request_delete(&mut self, id: ProductId) {
        if !self.deleting {
            self.pending_delete = Some(id);
        }
    }

    /// Drop the pending confirmation.
    pub fn cancel_delete(&mut self) {
        if !self.deleting {
            self.pending_delete = None;
        }
    }

    /// Confirm the pending delete.
    ///
    /// # Errors
    ///
    /// Returns [`AdminActionError::NoPendingDelete`] if nothing was requested
    /// or [`AdminActionError::Busy`] while a delete is in flight.
    pub fn begin_delete(&mut self) -> Result<ProductId, AdminActionError> {
        if self.deleting {
            return Err(AdminActionError::Busy);
        }
        let id = self.pending_delete.ok_or(AdminActionError::NoPendingDelete)?;
        self.deleting = true;
        Ok(id)
    }

    /// Apply the delete answer. The confirmation is cleared only on success.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the delete failed.
    pub fn finish_delete(&mut self, result: Result<(), ApiError>) -> Result<(), AdminActionError> {
        self.deleting = false;
        match result {
            Ok(()) => {
                if let Some(id) = self.pending_delete.take() {
                    tracing::info!(product_id = %id, "Deleted product");
                }
                self.notice = Some(Notice::success(MSG_PRODUCT_DELETED));
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, product_id = ?self.pending_delete, "Failed to delete product");
                self.notice = Some(Notice::error(MSG_DELETE_FAILED));
                Err(e.into())
            }
        }
    }

    /// Delete the pending product and reload the list.
    ///
    /// # Errors
    ///
    /// See [`AdminPage::begin_delete`] and [`AdminPage::finish_delete`].
    pub async fn confirm_delete(&mut self) -> Result<(), AdminActionError> {
        let id = self.begin_delete()?;
        let result = self.products_api.delete(id).await;
        self.finish_delete(result)?;
        self.load().await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::api::ApiClient;
    use crate::config::ApiConfig;
    use crate::pages::FormError;

    fn page() -> AdminPage {
        let api = ApiClient::new(&ApiConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        AdminPage::new(ProductService::new(api))
    }

    fn product(id: i64) -> Product {
        serde_json::from_value(json!({
            "id": id, "name": "Widget", "description": "d", "price": 5, "stock": 2
        }))
        .unwrap()
    }

    fn fill(page: &mut AdminPage) {
        let form = page.form_mut().unwrap();
        form.name = "Gadget".to_string();
        form.price = Decimal::new(1250, 2);
        form.stock = 3;
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut page = page();
        page.open_new();
        let err = page.begin_submit().unwrap_err();
        assert!(matches!(err, AdminActionError::Invalid(_)));
        let errors = page.modal().errors().unwrap();
        assert!(errors.contains(FormError::NameRequired));
        assert!(errors.contains(FormError::PriceNotPositive));
        assert!(page.modal().is_open());
        assert!(!page.modal().is_submitting());
    }

    #[test]
    fn test_submit_new_then_close() {
        let mut page = page();
        page.open_new();
        fill(&mut page);

        let request = page.begin_submit().unwrap();
        let SubmitRequest::Create(new) = request else {
            panic!("expected create");
        };
        assert_eq!(new.name, "Gadget");
        assert!(page.modal().is_submitting());
        assert!(page.form_mut().is_none());
        assert!(matches!(page.begin_submit(), Err(AdminActionError::Busy)));

        page.finish_submit(Ok(product(9))).unwrap();
        assert_eq!(page.modal(), &ProductModal::Closed);
        assert_eq!(page.notice().unwrap().message(), MSG_PRODUCT_CREATED);
    }

    #[test]
    fn test_open_ignored_while_submitting() {
        let mut page = page();
        page.open_new();
        fill(&mut page);
        page.begin_submit().unwrap();

        page.open_new();
        page.open_edit(&product(4));
        assert!(page.modal().is_submitting());

        let saved = page.finish_submit(Ok(product(9))).unwrap();
        assert_eq!(saved.id, ProductId::new(9));
        assert_eq!(page.modal(), &ProductModal::Closed);
        assert_eq!(page.notice().unwrap().message(), MSG_PRODUCT_CREATED);
    }

    #[test]
    fn test_finish_submit_without_submit_keeps_modal() {
        let mut page = page();
        page.open_edit(&product(4));

        let err = page.finish_submit(Ok(product(4))).unwrap_err();
        assert!(matches!(err, AdminActionError::ModalClosed));
        assert_eq!(page.form_mut().unwrap().name, "Widget");
        assert!(page.notice().is_none());
    }

    #[test]
    fn test_edit_builds_update() {
        let mut page = page();
        page.open_edit(&product(4));
        assert_eq!(page.form_mut().unwrap().name, "Widget");

        let request = page.begin_submit().unwrap();
        let SubmitRequest::Update(id, patch) = request else {
            panic!("expected update");
        };
        assert_eq!(id, ProductId::new(4));
        assert_eq!(patch.name.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_edit_can_clear_image() {
        let mut page = page();
        let with_image: Product = serde_json::from_value(json!({
            "id": 4, "name": "Widget", "price": 5, "stock": 2,
            "imageBase64": "data:image/png;base64,AQID"
        }))
        .unwrap();
        page.open_edit(&with_image);
        assert!(page.form_mut().unwrap().image.is_some());
        page.form_mut().unwrap().image = None;

        let SubmitRequest::Update(_, patch) = page.begin_submit().unwrap() else {
            panic!("expected update");
        };
        assert_eq!(patch.image, Some(None));
    }

    #[test]
    fn test_failed_submit_keeps_form() {
        let mut page = page();
        page.open_new();
        fill(&mut page);
        page.begin_submit().unwrap();

        page.finish_submit(Err(ApiError::BadRequest("x".into())))
            .unwrap_err();
        assert_eq!(page.form_mut().unwrap().name, "Gadget");
        assert_eq!(page.notice().unwrap().message(), MSG_SAVE_FAILED);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut page = page();
        assert!(matches!(
            page.begin_delete(),
            Err(AdminActionError::NoPendingDelete)
        ));

        page.request_delete(ProductId::new(2));
        page.cancel_delete();
        assert!(page.pending_delete().is_none());

        page.request_delete(ProductId::new(2));
        assert_eq!(page.begin_delete().unwrap(), ProductId::new(2));
        page.finish_delete(Err(ApiError::NotFound("x".into())))
            .unwrap_err();
        assert_eq!(page.pending_delete(), Some(ProductId::new(2)));

        page.begin_delete().unwrap();
        page.finish_delete(Ok(())).unwrap();
        assert!(page.pending_delete().is_none());
        assert_eq!(page.notice().unwrap().message(), MSG_PRODUCT_DELETED);
    }

    #[test]
    fn test_failed_load_keeps_list() {
        let mut page = page();
        let generation = page.begin_load();
        page.finish_load(generation, Ok(vec![product(1), product(2)]));
        let generation = page.begin_load();
        page.finish_load(generation, Err(ApiError::Decode("x".into())));
        assert_eq!(page.products().len(), 2);
        assert!(page.state().error().is_some());
    }
}
