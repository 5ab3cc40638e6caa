//! Interactive shopping session.
//!
//! Reads one command per line from stdin until `quit` or end of input. The
//! prompt carries the cart badge.

use std::io::Write as _;
use std::str::FromStr;

use fakestore_core::{Product, ProductId};
use fakestore_storefront::cart::CartLineItem;
use fakestore_storefront::catalog::{QueryState, QueryTracker};
use fakestore_storefront::error::{AppError, add_breadcrumb};
use fakestore_storefront::state::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::render;

const HELP: &str = "\
Commands:
  list          Show all products
  show <id>     Show one product
  add <id>      Add a product to the cart
  buy <id>      Add a product to the cart and open the cart
  remove <id>   Remove a product from the cart
  inc <id>      One more of a product in the cart
  dec <id>      One less of a product in the cart
  cart          Show the cart
  checkout      Place the order
  clear         Empty the cart
  wish <id>     Add or remove a product from the wishlist
  wishlist      Show the wishlist
  help          Show this help
  quit          Leave the shop";

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopCommand {
    List,
    Show(ProductId),
    Add(ProductId),
    Buy(ProductId),
    Remove(ProductId),
    Inc(ProductId),
    Dec(ProductId),
    Cart,
    Checkout,
    Clear,
    Wish(ProductId),
    Wishlist,
    Help,
    Quit,
}

impl FromStr for ShopCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();

        if words.next().is_some() {
            return Err(AppError::BadRequest(format!("too many arguments to '{name}'")));
        }

        let id = |usage: &str| -> Result<ProductId, AppError> {
            let raw = arg.ok_or_else(|| AppError::BadRequest(format!("usage: {usage}")))?;
            raw.parse()
                .map_err(|e| AppError::BadRequest(format!("invalid product id: {e}")))
        };

        let command = match name.as_str() {
            "list" | "ls" => Self::List,
            "show" => Self::Show(id("show <id>")?),
            "add" => Self::Add(id("add <id>")?),
            "buy" => Self::Buy(id("buy <id>")?),
            "remove" | "rm" => Self::Remove(id("remove <id>")?),
            "inc" => Self::Inc(id("inc <id>")?),
            "dec" => Self::Dec(id("dec <id>")?),
            "cart" => Self::Cart,
            "checkout" => Self::Checkout,
            "clear" => Self::Clear,
            "wish" => Self::Wish(id("wish <id>")?),
            "wishlist" => Self::Wishlist,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::BadRequest(format!(
                    "unknown command '{other}', type 'help'"
                )));
            }
        };

        if arg.is_some() && !command.takes_id() {
            return Err(AppError::BadRequest(format!("'{name}' takes no arguments")));
        }
        Ok(command)
    }
}

impl ShopCommand {
    const fn takes_id(self) -> bool {
        matches!(
            self,
            Self::Show(_)
                | Self::Add(_)
                | Self::Buy(_)
                | Self::Remove(_)
                | Self::Inc(_)
                | Self::Dec(_)
                | Self::Wish(_)
        )
    }
}

/// One shopper's session over the shared application state.
pub struct Session {
    state: AppState,
    detail: QueryTracker<Product>,
}

impl Session {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            detail: QueryTracker::new(),
        }
    }

    /// Run `command`, returning the text to show, or `None` to end the session.
    ///
    /// # Errors
    ///
    /// Returns an error if a product the command needs cannot be fetched.
    pub async fn execute(&mut self, command: ShopCommand) -> Result<Option<String>, AppError> {
        let cart = self.state.cart().clone();
        let wishlist = self.state.wishlist().clone();

        let text = match command {
            ShopCommand::List => match self.state.catalog().query_products().await {
                QueryState::Success(products) => {
                    render::product_list(&products, &wishlist.snapshot())
                }
                QueryState::Error(message) => message,
                QueryState::Idle | QueryState::Loading => String::new(),
            },
            ShopCommand::Show(id) => self.show(id).await,
            ShopCommand::Add(id) => {
                let product = self.product(id).await?;
                let title = product.title.clone();
                cart.add_item(product);
                breadcrumb("Added to cart", id);
                format!("Added {title} to your cart")
            }
            ShopCommand::Buy(id) => {
                let product = self.product(id).await?;
                cart.add_item(product);
                breadcrumb("Bought now", id);
                cart.reset_order();
                render::cart(&cart.snapshot())
            }
            ShopCommand::Remove(id) => {
                let line = self.in_cart(id)?;
                cart.remove_item(id);
                format!("Removed {} from your cart", line.product.title)
            }
            ShopCommand::Inc(id) => {
                self.in_cart(id)?;
                cart.increment_quantity(id);
                render::cart(&cart.snapshot())
            }
            ShopCommand::Dec(id) => {
                let line = self.in_cart(id)?;
                if line.quantity == 1 {
                    "Quantity is already 1; use 'remove' to drop the item".to_string()
                } else {
                    cart.decrement_quantity(id);
                    render::cart(&cart.snapshot())
                }
            }
            ShopCommand::Cart => {
                cart.reset_order();
                render::cart(&cart.snapshot())
            }
            ShopCommand::Checkout => {
                if cart.is_empty() {
                    return Err(AppError::BadRequest("your cart is empty".to_string()));
                }
                cart.place_order();
                let confirmation = render::order_confirmation(&cart.snapshot());
                info!(items = cart.cart_count(), "Order placed");
                add_breadcrumb("checkout", "Order placed", None);
                cart.clear_cart();
                confirmation
            }
            ShopCommand::Clear => {
                cart.clear_cart();
                "Cart cleared".to_string()
            }
            ShopCommand::Wish(id) => {
                let product = self.product(id).await?;
                let title = product.title.clone();
                if wishlist.toggle(product) {
                    format!("Saved {title} to your wishlist")
                } else {
                    format!("Removed {title} from your wishlist")
                }
            }
            ShopCommand::Wishlist => render::wishlist(&wishlist.snapshot()),
            ShopCommand::Help => HELP.to_string(),
            ShopCommand::Quit => return Ok(None),
        };
        Ok(Some(text))
    }

    async fn show(&mut self, id: ProductId) -> String {
        let ticket = self.detail.begin();
        let result = self.state.catalog().fetch_product(id).await;
        self.detail.resolve(ticket, result);

        match self.detail.state() {
            QueryState::Success(product) => render::product_detail(
                product,
                self.state.wishlist().is_in_wishlist(id),
                self.state.cart().line_item(id).map(|line| line.quantity),
            ),
            QueryState::Error(message) => message.clone(),
            QueryState::Idle | QueryState::Loading => String::new(),
        }
    }

    /// The product with `id`, preferring a copy already in the cart or the
    /// wishlist over a catalog round trip.
    async fn product(&self, id: ProductId) -> Result<Product, AppError> {
        if let Some(line) = self.state.cart().line_item(id) {
            return Ok(line.product);
        }
        if let Some(saved) = self.state.wishlist().product(id) {
            return Ok(saved);
        }
        Ok(self.state.catalog().fetch_product(id).await?)
    }

    fn in_cart(&self, id: ProductId) -> Result<CartLineItem, AppError> {
        self.state
            .cart()
            .line_item(id)
            .ok_or_else(|| AppError::NotFound(format!("product {id} is not in your cart")))
    }
}

fn breadcrumb(message: &str, id: ProductId) {
    let id = id.to_string();
    let data = [("product_id", id.as_str())];
    add_breadcrumb("cart", message, Some(data.as_slice()));
}

/// Run the interactive session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin or stdout fails.
pub async fn run(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(state);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Welcome to the shop. Type 'help' for commands.");
    loop {
        print!("{}", render::prompt(session.state.cart().cart_count()));
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = match line.parse::<ShopCommand>() {
            Ok(command) => session.execute(command).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(Some(text)) => println!("{text}"),
            Ok(None) => break,
            Err(e) => {
                e.report();
                println!("{}", e.user_message());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use fakestore_core::{Price, Rating};
    use fakestore_storefront::cart::CheckoutPhase;
    use fakestore_storefront::config::{CatalogConfig, StorefrontConfig};
    use fakestore_storefront::storage::MemoryStorage;
    use rust_decimal::Decimal;

    use super::*;

    fn session() -> Session {
        let config = StorefrontConfig {
            catalog: CatalogConfig::with_base_url("http://127.0.0.1:9").unwrap(),
            data_dir: PathBuf::from("unused"),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let state = AppState::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();
        Session::new(state)
    }

    fn product(id: i64, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents).unwrap(),
            description: String::new(),
            category: "misc".to_string(),
            image: String::new(),
            rating: Rating::new(Decimal::new(42, 1), 7),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("list".parse::<ShopCommand>().unwrap(), ShopCommand::List);
        assert_eq!(
            "  SHOW 3 ".parse::<ShopCommand>().unwrap(),
            ShopCommand::Show(ProductId::new(3))
        );
        assert_eq!(
            "wish 12".parse::<ShopCommand>().unwrap(),
            ShopCommand::Wish(ProductId::new(12))
        );
        assert_eq!("quit".parse::<ShopCommand>().unwrap(), ShopCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        let err = "show".parse::<ShopCommand>().unwrap_err();
        assert_eq!(err.user_message(), "Bad request: usage: show <id>");

        assert!("show abc".parse::<ShopCommand>().is_err());
        assert!("show 1 2".parse::<ShopCommand>().is_err());
        assert!("cart 1".parse::<ShopCommand>().is_err());
        assert!("dance".parse::<ShopCommand>().is_err());
    }

    // Products already in the cart are served from the cart, so the
    // commands below never reach the (unreachable) catalog.

    #[tokio::test]
    async fn test_cart_commands() {
        let mut session = session();
        session.state.cart().add_item(product(1, 1000));

        let text = session
            .execute(ShopCommand::Add(ProductId::new(1)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text, "Added Product 1 to your cart");
        assert_eq!(session.state.cart().cart_count(), 2);

        let text = session
            .execute(ShopCommand::Dec(ProductId::new(1)))
            .await
            .unwrap()
            .unwrap();
        assert!(text.contains("Total: $10.00 (1 items)"));

        let text = session
            .execute(ShopCommand::Dec(ProductId::new(1)))
            .await
            .unwrap()
            .unwrap();
        assert!(text.starts_with("Quantity is already 1"));
        assert_eq!(session.state.cart().cart_count(), 1);

        session
            .execute(ShopCommand::Remove(ProductId::new(1)))
            .await
            .unwrap();
        assert!(session.state.cart().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_cart_item() {
        let mut session = session();
        let err = session
            .execute(ShopCommand::Inc(ProductId::new(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_checkout_flow() {
        let mut session = session();
        let cart = session.state.cart().clone();

        let err = session.execute(ShopCommand::Checkout).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        cart.add_item(product(1, 1000));
        cart.add_item(product(2, 250));
        let mut phases = cart.subscribe();

        let text = session
            .execute(ShopCommand::Checkout)
            .await
            .unwrap()
            .unwrap();
        assert!(text.starts_with("Order placed! 2 items, $12.50 total."));
        assert!(cart.is_empty());
        assert_eq!(cart.phase(), CheckoutPhase::Shopping);
        assert!(phases.has_changed().unwrap());
        assert!(phases.borrow_and_update().items.is_empty());
    }

    #[tokio::test]
    async fn test_cart_resets_order_flag() {
        let mut session = session();
        session.state.cart().add_item(product(1, 1000));
        session.state.cart().place_order();

        session.execute(ShopCommand::Cart).await.unwrap();
        assert_eq!(session.state.cart().phase(), CheckoutPhase::Shopping);
    }

    #[tokio::test]
    async fn test_wish_toggles_membership() {
        let mut session = session();
        session.state.cart().add_item(product(3, 500));

        let text = session
            .execute(ShopCommand::Wish(ProductId::new(3)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(text, "Saved Product 3 to your wishlist");
        assert!(session.state.wishlist().is_in_wishlist(ProductId::new(3)));

        session
            .execute(ShopCommand::Wish(ProductId::new(3)))
            .await
            .unwrap();
        assert!(session.state.wishlist().is_empty());
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let mut session = session();
        assert!(session.execute(ShopCommand::Quit).await.unwrap().is_none());
    }
}
