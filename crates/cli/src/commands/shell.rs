//! Interactive session.
//!
//! Keeps the home page, cart page and cart badge alive between commands,
//! the way a graphical front end would. Switching users refreshes the cart
//! and the badge.

use askama::Template;
use shopfront_core::{Order, ProductId};
use shopfront_storefront::AppState;
use shopfront_storefront::pages::{CartActionError, CartBadge, CartPage, HomePage};
use shopfront_storefront::views::{CartTemplate, HomeTemplate, OrderTemplate};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{CommandError, emit, emit_notice};

const HELP: &str = "\
Commands:
  products           list the catalog
  add <product>      add one unit to the cart
  cart               show the cart
  inc <product>      one more unit
  dec <product>      one fewer unit (not below 1)
  rm <product>       remove from the cart
  checkout           place an order
  orders             list your orders
  user [id]          show or switch the current user
  help               show this help
  quit               leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Products,
    Add(ProductId),
    Cart,
    Inc(ProductId),
    Dec(ProductId),
    Remove(ProductId),
    Checkout,
    Orders,
    User(Option<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Line {
    fn parse(input: &str) -> Self {
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            return Self::Empty;
        };
        let argument = words.next();
        let product = || argument.and_then(|raw| raw.parse::<ProductId>().ok());

        match (command, product()) {
            ("products" | "ls", _) => Self::Products,
            ("cart", _) => Self::Cart,
            ("checkout", _) => Self::Checkout,
            ("orders", _) => Self::Orders,
            ("user", _) => Self::User(argument.map(str::to_string)),
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            ("add", Some(id)) => Self::Add(id),
            ("inc", Some(id)) => Self::Inc(id),
            ("dec", Some(id)) => Self::Dec(id),
            ("rm" | "remove", Some(id)) => Self::Remove(id),
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}

struct Session<'a> {
    state: &'a AppState,
    home: HomePage,
    cart: CartPage,
    badge: CartBadge,
}

impl Session<'_> {
    async fn refresh_cart(&mut self) {
        let user = self.state.identity().current();
        self.cart.load(user).await;
        self.badge.refresh(user).await;
    }

    fn prompt(&self) {
        emit(&format!(
            "[user {} | cart {}]>",
            self.state.identity().current(),
            self.badge.label()
        ));
    }

    fn show_cart(&self) -> Result<(), CommandError> {
        let user = self.state.identity().current();
        emit(&CartTemplate::new(&self.cart, user).render()?);
        Ok(())
    }

    async fn handle(&mut self, line: Line) -> Result<bool, CommandError> {
        let user = self.state.identity().current();
        match line {
            Line::Empty => {}
            Line::Quit => return Ok(false),
            Line::Help => emit(HELP),
            Line::Unknown(input) => emit(&format!("Unknown command: {input} (try 'help')")),
            Line::Products => {
                self.home.load().await;
                emit(&HomeTemplate::from(&self.home).render()?);
            }
            Line::Add(id) => {
                if self.home.products().is_empty() {
                    self.home.load().await;
                }
                let Some(product) = self.home.product(id).cloned() else {
                    return Err(CommandError::ProductNotFound(id));
                };
                let result = self.home.add_to_cart(user, &product).await;
                emit_notice(self.home.notice());
                self.home.clear_notice();
                if let Ok(cart) = result {
                    self.refresh_cart().await;
                    emit(&format!("Cart now holds {} item(s).", cart.item_count()));
                }
            }
            Line::Cart => {
                self.cart.load(user).await;
                self.show_cart()?;
            }
            Line::Inc(id) => {
                let result = self.cart.increment(user, id).await;
                self.after_cart_action(result.map(|()| None)).await?;
            }
            Line::Dec(id) => {
                let result = self.cart.decrement(user, id).await;
                self.after_cart_action(result.map(|()| None)).await?;
            }
            Line::Remove(id) => {
                let result = self.cart.remove(user, id).await;
                self.after_cart_action(result.map(|()| None)).await?;
            }
            Line::Checkout => {
                let result = self.cart.checkout(user).await;
                self.after_cart_action(result.map(Some)).await?;
            }
            Line::Orders => {
                let orders = self.state.orders().list_by_user(user).await?;
                if orders.is_empty() {
                    emit("No orders.");
                }
                for order in &orders {
                    emit(&OrderTemplate::from(order).render()?);
                }
            }
            Line::User(None) => emit(&format!("Current user: {user}")),
            Line::User(Some(raw)) => {
                // Watchers pick this up before the next prompt.
                self.state.identity().set_from_input(&raw);
            }
        }
        Ok(true)
    }

    async fn after_cart_action(
        &mut self,
        result: Result<Option<Order>, CartActionError>,
    ) -> Result<(), CommandError> {
        emit_notice(self.cart.notice());
        self.cart.clear_notice();
        match result {
            Ok(Some(order)) => emit(&OrderTemplate::from(&order).render()?),
            Ok(None) => self.show_cart()?,
            Err(e) => emit(&e.to_string()),
        }
        self.badge.refresh(self.state.identity().current()).await;
        Ok(())
    }
}

/// Run the interactive loop until `quit` or end of input.
pub async fn run(state: &AppState) -> Result<(), CommandError> {
    let mut session = Session {
        state,
        home: state.home_page(),
        cart: state.cart_page(),
        badge: state.cart_badge(),
    };
    let mut user_changes = state.identity().subscribe();
    session.refresh_cart().await;

    emit("Shopfront shell. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        session.prompt();
        let Some(input) = lines.next_line().await? else {
            break;
        };

        match session.handle(Line::parse(&input)).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Shell command failed");
                emit(&e.to_string());
            }
        }

        if user_changes.has_changed().unwrap_or(false) {
            let user = *user_changes.borrow_and_update();
            emit(&format!("Now acting as user {user}."));
            session.refresh_cart().await;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(Line::parse("  "), Line::Empty);
        assert_eq!(Line::parse("add 3"), Line::Add(ProductId::new(3)));
        assert_eq!(Line::parse("rm 4"), Line::Remove(ProductId::new(4)));
        assert_eq!(Line::parse("user 2"), Line::User(Some("2".to_string())));
        assert_eq!(Line::parse("user"), Line::User(None));
        assert_eq!(Line::parse("exit"), Line::Quit);
    }

    #[test]
    fn test_missing_product_is_unknown() {
        assert_eq!(Line::parse("inc"), Line::Unknown("inc".to_string()));
        assert_eq!(Line::parse("dec x"), Line::Unknown("dec x".to_string()));
    }
}
