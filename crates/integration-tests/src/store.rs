//! In-memory backend state.
//!
//! Behaves like the real backend where the client can observe it: carts are
//! created on the first add, totals are computed here, stock is checked on
//! add, update and checkout, and checkout empties the cart.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shopfront_core::{
    Cart, CartId, CartItem, CartItemId, ImagePayload, Order, OrderId, OrderItem, OrderItemId,
    Price, Product, ProductId, Quantity, Stock, Timestamp, UserId,
};

/// Errors the fake backend answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    BadRequest(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Fields accepted by create and update.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub stock: Option<Stock>,
    /// An empty string means "no image".
    pub image_base64: Option<String>,
}

impl ProductInput {
    /// The requested image, if the field was sent.
    fn image(&self) -> StoreResult<Option<Option<ImagePayload>>> {
        match self.image_base64.as_deref().map(str::trim) {
            None => Ok(None),
            Some("") => Ok(Some(None)),
            Some(raw) => ImagePayload::parse(raw)
                .map(|image| Some(Some(image)))
                .map_err(|e| StoreError::BadRequest(e.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredLine {
    id: CartItemId,
    product: ProductId,
    quantity: Quantity,
}

#[derive(Debug, Clone)]
struct StoredCart {
    id: CartId,
    lines: Vec<StoredLine>,
}

#[derive(Debug, Default)]
pub struct Store {
    products: BTreeMap<ProductId, Product>,
    carts: BTreeMap<UserId, StoredCart>,
    orders: Vec<Order>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn product(&self, id: ProductId) -> StoreResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Product {id} not found")))
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn list_products(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn get_product(&self, id: ProductId) -> StoreResult<Product> {
        self.product(id).cloned()
    }

    pub fn create_product(&mut self, input: ProductInput) -> StoreResult<Product> {
        let image = input.image()?.flatten();
        let name = input
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| StoreError::BadRequest("Name is required".to_string()))?;
        let price = input
            .price
            .ok_or_else(|| StoreError::BadRequest("Price is required".to_string()))?;

        let product = Product {
            id: ProductId::new(self.next_id()),
            name,
            description: input.description.unwrap_or_default(),
            price,
            stock: input.stock.unwrap_or_default(),
            image,
            created_at: Some(Timestamp::now()),
        };
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    pub fn update_product(&mut self, id: ProductId, input: ProductInput) -> StoreResult<Product> {
        let image = input.image()?;
        let product = self
            .products
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Product {id} not found")))?;
        if let Some(name) = input.name {
            product.name = name;
        }
        if let Some(description) = input.description {
            product.description = description;
        }
        if let Some(price) = input.price {
            product.price = price;
        }
        if let Some(stock) = input.stock {
            product.stock = stock;
        }
        if let Some(image) = image {
            product.image = image;
        }
        Ok(product.clone())
    }

    pub fn delete_product(&mut self, id: ProductId) -> StoreResult<()> {
        self.products
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound(format!("Product {id} not found")))?;
        for cart in self.carts.values_mut() {
            cart.lines.retain(|line| line.product != id);
        }
        Ok(())
    }

    // =========================================================================
    // Carts
    // =========================================================================

    fn check_stock(&self, product: ProductId, quantity: Quantity) -> StoreResult<()> {
        let product = self.product(product)?;
        if quantity.get() > product.stock.get() {
            return Err(StoreError::BadRequest(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }
        Ok(())
    }

    pub fn add_to_cart(
        &mut self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> StoreResult<Cart> {
        let quantity =
            Quantity::new(quantity).map_err(|e| StoreError::BadRequest(e.to_string()))?;
        self.product(product)?;

        let existing = self
            .carts
            .get(&user)
            .and_then(|cart| cart.lines.iter().find(|line| line.product == product))
            .map(|line| line.quantity);
        let combined = match existing {
            Some(current) => Quantity::new(i64::from(current.get()) + i64::from(quantity.get()))
                .map_err(|e| StoreError::BadRequest(e.to_string()))?,
            None => quantity,
        };
        self.check_stock(product, combined)?;

        if !self.carts.contains_key(&user) {
            let cart = StoredCart {
                id: CartId::new(self.next_id()),
                lines: Vec::new(),
            };
            self.carts.insert(user, cart);
        }
        let line_id = CartItemId::new(self.next_id());
        if let Some(cart) = self.carts.get_mut(&user) {
            match cart.lines.iter_mut().find(|line| line.product == product) {
                Some(line) => line.quantity = combined,
                None => cart.lines.push(StoredLine {
                    id: line_id,
                    product,
                    quantity: combined,
                }),
            }
        }
        self.cart_for(user)
    }

    pub fn update_cart_item(
        &mut self,
        user: UserId,
        product: ProductId,
        quantity: i64,
    ) -> StoreResult<Cart> {
        let quantity =
            Quantity::new(quantity).map_err(|e| StoreError::BadRequest(e.to_string()))?;
        self.check_stock(product, quantity)?;
        let line = self
            .carts
            .get_mut(&user)
            .and_then(|cart| cart.lines.iter_mut().find(|line| line.product == product))
            .ok_or_else(|| StoreError::NotFound(format!("Product {product} not in cart")))?;
        line.quantity = quantity;
        self.cart_for(user)
    }

    pub fn remove_cart_item(&mut self, user: UserId, product: ProductId) -> StoreResult<Cart> {
        let cart = self
            .carts
            .get_mut(&user)
            .ok_or_else(|| StoreError::NotFound(format!("No cart for user {user}")))?;
        let before = cart.lines.len();
        cart.lines.retain(|line| line.product != product);
        if cart.lines.len() == before {
            return Err(StoreError::NotFound(format!("Product {product} not in cart")));
        }
        self.cart_for(user)
    }

    pub fn cart_for(&self, user: UserId) -> StoreResult<Cart> {
        let stored = self
            .carts
            .get(&user)
            .ok_or_else(|| StoreError::NotFound(format!("No cart for user {user}")))?;

        let mut items = Vec::with_capacity(stored.lines.len());
        let mut total = Decimal::ZERO;
        for line in &stored.lines {
            let product = self.product(line.product)?.clone();
            let subtotal = product.price.amount() * Decimal::from(line.quantity.get());
            total += subtotal;
            items.push(CartItem {
                id: line.id,
                product,
                quantity: line.quantity,
                subtotal: price(subtotal)?,
            });
        }

        Ok(Cart {
            id: stored.id,
            user_id: user,
            items,
            total: price(total)?,
        })
    }

    pub fn list_carts(&self) -> StoreResult<Vec<Cart>> {
        self.carts.keys().map(|user| self.cart_for(*user)).collect()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub fn checkout(&mut self, user: UserId) -> StoreResult<Order> {
        let cart = self.cart_for(user)?;
        if cart.is_empty() {
            return Err(StoreError::BadRequest("Cart is empty".to_string()));
        }
        for item in &cart.items {
            self.check_stock(item.product.id, item.quantity)?;
        }

        let order_id = OrderId::new(self.next_id());
        let mut items = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            if let Some(product) = self.products.get_mut(&item.product.id) {
                product.stock = Stock::from(product.stock.get() - item.quantity.get());
            }
            items.push(OrderItem {
                id: OrderItemId::new(self.next_id()),
                product_id: item.product.id,
                product_name: item.product.name.clone(),
                product_price: item.product.price,
                quantity: item.quantity,
                subtotal: item.subtotal,
            });
        }
        let order = Order {
            id: order_id,
            user_id: user,
            total_price: cart.total,
            items,
            created_at: Some(Timestamp::now()),
        };
        self.orders.push(order.clone());

        if let Some(stored) = self.carts.get_mut(&user) {
            stored.lines.clear();
        }
        Ok(order)
    }

    pub fn list_orders(&self) -> Vec<Order> {
        self.orders.clone()
    }

    pub fn get_order(&self, id: OrderId) -> StoreResult<Order> {
        self.orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Order {id} not found")))
    }

    pub fn orders_for(&self, user: UserId) -> Vec<Order> {
        self.orders
            .iter()
            .filter(|order| order.user_id == user)
            .cloned()
            .collect()
    }
}

fn price(amount: Decimal) -> StoreResult<Price> {
    Price::new(amount).map_err(|e| StoreError::BadRequest(e.to_string()))
}
