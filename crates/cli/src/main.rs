//! Shopfront CLI - browse, shop and manage the catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! shop products list
//!
//! # Add two units of product 3 to user 2's cart, then check out
//! shop --user 2 cart add 3 --quantity 2
//! shop --user 2 cart checkout
//!
//! # Create a product with an image
//! shop admin create --name Lamp --price 1250 --stock 4 --image lamp.png
//!
//! # Delete a product (asks for --confirm)
//! shop admin delete 7 --confirm
//!
//! # Interactive session
//! shop shell
//! ```
//!
//! # Commands
//!
//! - `products` - Catalog listing and detail
//! - `cart` - The current user's cart and checkout
//! - `carts` - Every cart (debugging)
//! - `orders` - Order history
//! - `admin` - Create, edit and delete products
//! - `shell` - Interactive loop over the pages

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use shopfront_core::{OrderId, ProductId, UserId};
use shopfront_storefront::{AppState, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    /// Backend base URL (overrides `SHOPFRONT_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// User to act as (overrides `SHOPFRONT_USER_ID`)
    #[arg(long, short, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the current user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect every cart
    Carts {
        #[command(subcommand)]
        action: CartsAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage the product catalog
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Start an interactive session
    Shell,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
    /// Show one product
    Show { id: ProductId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product: ProductId,
        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Add one unit of a product already in the cart
    Inc { product: ProductId },
    /// Remove one unit of a product (not below 1)
    Dec { product: ProductId },
    /// Remove a product from the cart
    Remove { product: ProductId },
    /// Place an order for everything in the cart
    Checkout,
}

#[derive(Subcommand)]
enum CartsAction {
    /// List every cart
    List,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List every order
    List,
    /// Show one order
    Show { id: OrderId },
    /// List the current user's orders
    Mine,
}

#[derive(Subcommand)]
enum AdminAction {
    /// List products with stock levels
    List,
    /// Create a product
    Create {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit a product; unset fields keep their current value
    Edit {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        id: ProductId,
        /// Confirm the delete; without it nothing is sent
        #[arg(long)]
        confirm: bool,
    },
}

/// Product form fields shared by `create` and `edit`.
#[derive(clap::Args)]
struct ProductFields {
    /// Product name
    #[arg(long)]
    name: Option<String>,

    /// Product description
    #[arg(long)]
    description: Option<String>,

    /// Unit price in pesos
    #[arg(long)]
    price: Option<Decimal>,

    /// Units in stock
    #[arg(long, allow_negative_numbers = true)]
    stock: Option<i64>,

    /// Image file (png, jpg, gif, webp, svg)
    #[arg(long)]
    image: Option<std::path::PathBuf>,

    /// Remove the current image
    #[arg(long, conflicts_with = "image")]
    clear_image: bool,
}

impl From<ProductFields> for commands::admin::FormInput {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            stock: fields.stock,
            image: fields.image,
            clear_image: fields.clear_image,
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Environment configuration with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<StorefrontConfig, CommandError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(user) = &cli.user {
        config.default_user = UserId::parse_or_default(user);
    }
    Ok(config)
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::new(config)?;
    let user = state.identity().current();

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list(&state).await?,
            ProductsAction::Show { id } => commands::products::show(&state, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&state, user).await?,
            CartAction::Add { product, quantity } => {
                commands::cart::add(&state, user, product, quantity).await?;
            }
            CartAction::Inc { product } => commands::cart::increment(&state, user, product).await?,
            CartAction::Dec { product } => commands::cart::decrement(&state, user, product).await?,
            CartAction::Remove { product } => commands::cart::remove(&state, user, product).await?,
            CartAction::Checkout => commands::cart::checkout(&state, user).await?,
        },
        Commands::Carts { action } => match action {
            CartsAction::List => commands::cart::list_all(&state).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&state).await?,
            OrdersAction::Show { id } => commands::orders::show(&state, id).await?,
            OrdersAction::Mine => commands::orders::mine(&state, user).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::List => commands::admin::list(&state).await?,
            AdminAction::Create { fields } => commands::admin::create(&state, fields.into()).await?,
            AdminAction::Edit { id, fields } => {
                commands::admin::edit(&state, id, fields.into()).await?;
            }
            AdminAction::Delete { id, confirm } => {
                commands::admin::delete(&state, id, confirm).await?;
            }
        },
        Commands::Shell => commands::shell::run(&state).await?,
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_user_flag() {
        let cli =
            Cli::try_parse_from(["shop", "cart", "add", "3", "--user", "2", "-q", "4"]).unwrap();
        assert_eq!(cli.user.as_deref(), Some("2"));
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 4, .. }
            }
        ));
    }

    #[test]
    fn test_clear_image_flag() {
        let cli = Cli::try_parse_from(["shop", "admin", "edit", "4", "--clear-image"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Admin {
                action: AdminAction::Edit { ref fields, .. }
            } if fields.clear_image && fields.image.is_none()
        ));

        let conflict =
            Cli::try_parse_from(["shop", "admin", "edit", "4", "--clear-image", "--image", "a.png"]);
        assert!(conflict.is_err());
    }
}
