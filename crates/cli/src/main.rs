//! FakeStore CLI - browse the catalog, fill a cart, keep a wishlist.
//!
//! # Usage
//!
//! ```bash
//! # List products
//! fakestore products
//!
//! # Show one product
//! fakestore products show 3
//!
//! # Manage the wishlist
//! fakestore wishlist add 3
//! fakestore wishlist toggle 5
//!
//! # Interactive shopping session
//! fakestore shop
//! ```
//!
//! # Commands
//!
//! - `products` - List or show catalog products
//! - `wishlist` - List, add, remove or toggle saved products
//! - `shop` - Interactive session with cart and checkout (the default)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use fakestore_core::ProductId;
use fakestore_storefront::config::StorefrontConfig;
use fakestore_storefront::error::AppError;
use fakestore_storefront::state::AppState;
use fakestore_storefront::storage::MemoryStorage;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "fakestore")]
#[command(author, version, about = "FakeStore terminal storefront")]
struct Cli {
    /// Keep the wishlist in memory instead of the data directory
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: Option<ProductsAction>,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Start an interactive shopping session
    Shop,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
    /// Show one product
    Show {
        /// Product id
        id: ProductId,
    },
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    List,
    /// Save a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Forget a saved product
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Save or forget a product
    Toggle {
        /// Product id
        id: ProductId,
    },
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

    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_with(&AppError::from(e)),
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fakestore_storefront=info,fakestore_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let state = if cli.ephemeral {
        AppState::with_storage(config, Arc::new(MemoryStorage::new()))
    } else {
        AppState::new(config)
    };
    let state = match state {
        Ok(state) => state,
        Err(e) => exit_with(&AppError::from(e)),
    };

    if let Err(e) = run(cli.command.unwrap_or(Commands::Shop), &state).await {
        match e.downcast_ref::<AppError>() {
            Some(app_error) => exit_with(app_error),
            None => {
                tracing::error!("Command failed: {e}");
                std::process::exit(1);
            }
        }
    }
}

async fn run(command: Commands, state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Products { action } => match action.unwrap_or(ProductsAction::List) {
            ProductsAction::List => commands::products::list(state).await?,
            ProductsAction::Show { id } => commands::products::show(state, id).await?,
        },
        Commands::Wishlist { action } => match action.unwrap_or(WishlistAction::List) {
            WishlistAction::List => commands::wishlist::list(state),
            WishlistAction::Add { id } => commands::wishlist::add(state, id).await?,
            WishlistAction::Remove { id } => commands::wishlist::remove(state, id)?,
            WishlistAction::Toggle { id } => commands::wishlist::toggle(state, id).await?,
        },
        Commands::Shop => commands::shop::run(state.clone()).await?,
    }
    Ok(())
}

/// Report `error`, show its user-facing message and exit.
#[allow(clippy::print_stderr)]
fn exit_with(error: &AppError) -> ! {
    error.report();
    eprintln!("error: {}", error.user_message());
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_shop() {
        let cli = Cli::try_parse_from(["fakestore"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.command.is_none());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_parses_wishlist_toggle() {
        let cli = Cli::try_parse_from(["fakestore", "--ephemeral", "wishlist", "toggle", "7"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.ephemeral);
        assert!(matches!(
            cli.command,
            Some(Commands::Wishlist {
                action: Some(WishlistAction::Toggle { id })
            }) if id == ProductId::new(7)
        ));
    }

    #[test]
    fn test_rejects_bad_id() {
        assert!(Cli::try_parse_from(["fakestore", "products", "show", "abc"]).is_err());
    }
}
