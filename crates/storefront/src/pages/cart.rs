//! Cart page: quantities, removal and checkout.
//!
//! While any mutation is pending every quantity and remove control is
//! disabled. Each answer from the backend replaces the whole cart; totals are
//! shown exactly as the backend computed them.

use shopfront_core::{Cart, CartItem, Order, Price, ProductId, Quantity, UserId};
use thiserror::Error;

use super::{
    Generation, LoadState, MSG_CHECKOUT_FAILED, MSG_INSUFFICIENT_STOCK, MSG_LOAD_CART_FAILED,
    MSG_ORDER_PLACED, MSG_REMOVE_FAILED, MSG_UPDATE_FAILED, Notice, RequestSequence, stale,
};
use crate::api::ApiError;
use crate::services::{CartService, OrderService};

/// Why checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutFailure {
    /// The backend refused the order because stock ran out (HTTP 400).
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Checkout failed: {0}")]
    Other(ApiError),
}

impl From<ApiError> for CheckoutFailure {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::BadRequest(message) => Self::InsufficientStock(message),
            other => Self::Other(other),
        }
    }
}

impl CheckoutFailure {
    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InsufficientStock(_) => MSG_INSUFFICIENT_STOCK,
            Self::Other(_) => MSG_CHECKOUT_FAILED,
        }
    }
}

/// Why a cart action was not completed.
#[derive(Debug, Error)]
pub enum CartActionError {
    #[error("Another cart update is in progress")]
    Busy,
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error("Quantity cannot go below 1; remove the item instead")]
    AtMinimumQuantity,
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Cart request failed: {0}")]
    Request(#[from] ApiError),
    #[error(transparent)]
    Checkout(#[from] CheckoutFailure),
}

/// A pending quantity change or removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTicket {
    pub generation: Generation,
    pub product: ProductId,
    kind: MutationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MutationKind {
    Update(Quantity),
    Remove,
}

impl CartTicket {
    /// The quantity requested, or `None` for a removal.
    #[must_use]
    pub const fn quantity(&self) -> Option<Quantity> {
        match self.kind {
            MutationKind::Update(quantity) => Some(quantity),
            MutationKind::Remove => None,
        }
    }
}

/// The current user's cart.
#[derive(Debug)]
pub struct CartPage {
    carts_api: CartService,
    orders_api: OrderService,
    cart: Option<Cart>,
    state: LoadState,
    sequence: RequestSequence,
    updating: bool,
    checking_out: bool,
    notice: Option<Notice>,
}

impl CartPage {
    #[must_use]
    pub fn new(carts_api: CartService, orders_api: OrderService) -> Self {
        Self {
            carts_api,
            orders_api,
            cart: None,
            state: LoadState::Idle,
            sequence: RequestSequence::default(),
            updating: false,
            checking_out: false,
            notice: None,
        }
    }

    /// The cart, or `None` when the user has none or it failed to load.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Lines in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        match &self.cart {
            Some(cart) => &cart.items,
            None => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// The backend-computed total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.as_ref().map_or(Price::ZERO, |cart| cart.total)
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub const fn is_updating(&self) -> bool {
        self.updating
    }

    #[must_use]
    pub const fn is_checking_out(&self) -> bool {
        self.checking_out
    }

    /// A load, change or checkout is in flight.
    const fn is_busy(&self) -> bool {
        self.updating || self.checking_out || self.state.is_loading()
    }

    #[must_use]
    pub const fn can_increment(&self) -> bool {
        !self.is_busy()
    }

    /// Decrement is disabled at quantity 1.
    #[must_use]
    pub const fn can_decrement(&self, item: &CartItem) -> bool {
        !self.is_busy() && !item.quantity.is_one()
    }

    #[must_use]
    pub const fn can_remove(&self) -> bool {
        !self.is_busy()
    }

    #[must_use]
    pub fn can_checkout(&self) -> bool {
        !self.is_busy() && !self.is_empty()
    }

    fn item(&self, product: ProductId) -> Result<&CartItem, CartActionError> {
        self.cart
            .as_ref()
            .and_then(|cart| cart.item_for(product))
            .ok_or(CartActionError::NotInCart(product))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    pub fn begin_load(&mut self) -> Generation {
        self.state = LoadState::Loading;
        self.sequence.issue()
    }

    /// Apply a fetched cart. A failure clears the cart.
    pub fn finish_load(&mut self, generation: Generation, result: Result<Cart, ApiError>) {
        if !self.sequence.is_current(generation) {
            stale("cart", generation);
            return;
        }
        match result {
            Ok(cart) => {
                self.cart = Some(cart);
                self.state = LoadState::Loaded;
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!("User has no cart yet");
                self.cart = None;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load cart");
                self.cart = None;
                self.state = LoadState::Failed(MSG_LOAD_CART_FAILED.to_string());
            }
        }
    }

    /// Fetch `user`'s cart.
    pub async fn load(&mut self, user: UserId) {
        let generation = self.begin_load();
        let result = self.carts_api.get_by_user(user).await;
        self.finish_load(generation, result);
    }

    // =========================================================================
    // Quantity changes and removal
    // =========================================================================

    fn begin_mutation(
        &mut self,
        product: ProductId,
        kind: MutationKind,
    ) -> Result<CartTicket, CartActionError> {
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        self.updating = true;
        Ok(CartTicket {
            generation: self.sequence.issue(),
            product,
            kind,
        })
    }

    /// Plan setting `product` to `quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::Busy`] while a load or change is pending, or
    /// [`CartActionError::NotInCart`] if the product is not in the cart.
    pub fn begin_update(
        &mut self,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<CartTicket, CartActionError> {
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        self.item(product)?;
        self.begin_mutation(product, MutationKind::Update(quantity))
    }

    /// Plan adding one unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_update`].
    pub fn begin_increment(&mut self, product: ProductId) -> Result<CartTicket, CartActionError> {
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        let quantity = self.item(product)?.quantity.incremented();
        self.begin_mutation(product, MutationKind::Update(quantity))
    }

    /// Plan removing one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::AtMinimumQuantity`] at quantity 1; no request
    /// is made. Otherwise see [`CartPage::begin_update`].
    pub fn begin_decrement(&mut self, product: ProductId) -> Result<CartTicket, CartActionError> {
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        let quantity = self
            .item(product)?
            .quantity
            .decremented()
            .ok_or(CartActionError::AtMinimumQuantity)?;
        self.begin_mutation(product, MutationKind::Update(quantity))
    }

    /// Plan removing `product` entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::Busy`] while a load or change is pending, or
    /// [`CartActionError::NotInCart`] if the product is not in the cart.
    pub fn begin_remove(&mut self, product: ProductId) -> Result<CartTicket, CartActionError> {
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        self.item(product)?;
        self.begin_mutation(product, MutationKind::Remove)
    }

    /// Apply the answer to a quantity change or removal.
    ///
    /// The pending flag is always cleared. A successful answer replaces the
    /// whole cart unless a newer request has been issued since; a failure
    /// keeps the current cart.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the change failed.
    pub fn finish_mutation(
        &mut self,
        ticket: CartTicket,
        result: Result<Cart, ApiError>,
    ) -> Result<(), CartActionError> {
        self.updating = false;
        match result {
            Ok(cart) => {
                if self.sequence.is_current(ticket.generation) {
                    self.cart = Some(cart);
                    self.state = LoadState::Loaded;
                } else {
                    stale("cart", ticket.generation);
                }
                Ok(())
            }
            Err(e) => {
                let message = match ticket.kind {
                    MutationKind::Update(_) => MSG_UPDATE_FAILED,
                    MutationKind::Remove => MSG_REMOVE_FAILED,
                };
                tracing::error!(error = %e, product_id = %ticket.product, "Cart update failed");
                self.notice = Some(Notice::error(message));
                Err(e.into())
            }
        }
    }

    async fn run(&mut self, user: UserId, ticket: CartTicket) -> Result<(), CartActionError> {
        let result = match ticket.kind {
            MutationKind::Update(quantity) => {
                self.carts_api
                    .update_item(user, ticket.product, quantity)
                    .await
            }
            MutationKind::Remove => self.carts_api.remove_item(user, ticket.product).await,
        };
        self.finish_mutation(ticket, result)
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_increment`] and [`CartPage::finish_mutation`].
    pub async fn increment(
        &mut self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), CartActionError> {
        let ticket = self.begin_increment(product)?;
        self.run(user, ticket).await
    }

    /// Remove one unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_decrement`] and [`CartPage::finish_mutation`].
    pub async fn decrement(
        &mut self,
        user: UserId,
        product: ProductId,
    ) -> Result<(), CartActionError> {
        let ticket = self.begin_decrement(product)?;
        self.run(user, ticket).await
    }

    /// Set `product` to `quantity`.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_update`] and [`CartPage::finish_mutation`].
    pub async fn set_quantity(
        &mut self,
        user: UserId,
        product: ProductId,
        quantity: Quantity,
    ) -> Result<(), CartActionError> {
        let ticket = self.begin_update(product, quantity)?;
        self.run(user, ticket).await
    }

    /// Remove `product` from the cart.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_remove`] and [`CartPage::finish_mutation`].
    pub async fn remove(&mut self, user: UserId, product: ProductId) -> Result<(), CartActionError> {
        let ticket = self.begin_remove(product)?;
        self.run(user, ticket).await
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Mark checkout as in flight.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::EmptyCart`] for an empty cart or
    /// [`CartActionError::Busy`] while any request is pending.
    pub fn begin_checkout(&mut self) -> Result<Generation, CartActionError> {
        if self.is_empty() {
            return Err(CartActionError::EmptyCart);
        }
        if self.is_busy() {
            return Err(CartActionError::Busy);
        }
        self.checking_out = true;
        Ok(self.sequence.issue())
    }

    /// Apply the checkout answer.
    ///
    /// On success the cart is cleared, since the backend has emptied it. On
    /// failure the cart is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CartActionError::Checkout`] with the classified failure.
    pub fn finish_checkout(
        &mut self,
        generation: Generation,
        result: Result<Order, ApiError>,
    ) -> Result<Order, CartActionError> {
        self.checking_out = false;
        match result {
            Ok(order) => {
                tracing::info!(order_id = %order.id, total = %order.total_price, "Order placed");
                if self.sequence.is_current(generation) {
                    self.cart = None;
                    self.state = LoadState::Loaded;
                }
                self.notice = Some(Notice::success(MSG_ORDER_PLACED));
                Ok(order)
            }
            Err(e) => {
                let failure = CheckoutFailure::from(e);
                tracing::warn!(error = %failure, "Checkout failed");
                self.notice = Some(Notice::error(failure.message()));
                Err(failure.into())
            }
        }
    }

    /// Turn `user`'s cart into an order.
    ///
    /// # Errors
    ///
    /// See [`CartPage::begin_checkout`] and [`CartPage::finish_checkout`].
    pub async fn checkout(&mut self, user: UserId) -> Result<Order, CartActionError> {
        let generation = self.begin_checkout()?;
        let result = self.orders_api.checkout(user).await;
        self.finish_checkout(generation, result)
    }
}
