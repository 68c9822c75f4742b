//! Command-line storefront client.
//!
//! Browses the catalog and manages the account through the HTTP API, and keeps
//! the cart plus the session mirror in a local JSON file.
//!
//! ```bash
//! shop products --limit 6
//! shop login -u player -p player123
//! shop cart add 3
//! shop checkout
//! ```

use clap::{Parser, Subcommand};
use storefront_api::client::{
    ApiClient, ClientError, FileStorage, LocalStorage,
    auth::{self, nav_links},
    cart::{self, CartRepository, format_amount},
    catalog::storefront_listing,
};

const SESSION_COOKIE_KEY: &str = "session_cookie";

#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about = "Storefront command-line client")]
struct Cli {
    /// Base URL of the storefront API
    #[arg(long, env = "SHOP_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// File holding the cart and session mirror
    #[arg(long, env = "SHOP_STORAGE", default_value = ".shop-storage.json")]
    storage: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products, one per name
    Products {
        /// Show at most this many products
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show one product
    Product { id: i64 },
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        full_name: Option<String>,
    },
    /// Log in and remember the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Log out and forget the session
    Logout,
    /// Show the logged-in account and the available navigation
    Whoami,
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the (simulated) order and empty the cart
    Checkout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart and its total
    Show,
    /// Add one unit of a product
    Add { id: i64 },
    /// Set the quantity of a product; 0 removes it
    Set {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { id: i64 },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::debug!(error = ?e, "command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let mut storage = FileStorage::open(&cli.storage)?;
    let mut api = ApiClient::new(cli.api_url)
        .with_session_cookie(storage.get_item(SESSION_COOKIE_KEY));

    match cli.command {
        Commands::Products { limit } => {
            for product in storefront_listing(api.products().await?, limit) {
                println!(
                    "#{:<4} {:<32} ${:>8}  stock {}",
                    product.id,
                    product.name,
                    format_amount(product.price),
                    product.stock
                );
            }
        }
        Commands::Product { id } => {
            let product = api.product(id).await?;
            println!("#{} {} (${})", product.id, product.name, format_amount(product.price));
            println!("category: {}  stock: {}", product.category, product.stock);
            if !product.description.is_empty() {
                println!("{}", product.description);
            }
        }
        Commands::Register {
            username,
            email,
            password,
            full_name,
        } => {
            let full_name = full_name.unwrap_or_else(|| username.clone());
            let registered = api.register(&username, &email, &password, &full_name).await?;
            println!("{} (user id {})", registered.message, registered.user_id);
        }
        Commands::Login { username, password } => {
            let login = api.login(&username, &password).await?;
            auth::record_login(&mut storage, &login)?;
            match api.session_cookie() {
                Some(cookie) => storage.set_item(SESSION_COOKIE_KEY, cookie.to_string())?,
                None => storage.remove_item(SESSION_COOKIE_KEY)?,
            }
            println!("{}", login.message);
        }
        Commands::Logout => {
            auth::clear(&mut storage)?;
            storage.remove_item(SESSION_COOKIE_KEY)?;
            api.logout().await?;
            println!("Logged out successfully");
        }
        Commands::Whoami => {
            let current = auth::current_user(&storage);
            match &current {
                Some(user) => {
                    let account = api.current_user().await?;
                    let role = if user.is_admin { "admin" } else { "customer" };
                    println!("{} <{}> ({role})", account.username, account.email);
                }
                None => println!("Not logged in"),
            }
            let links: Vec<&str> = nav_links(current.as_ref())
                .into_iter()
                .map(|link| link.label())
                .collect();
            println!("menu: {}", links.join(" | "));
        }
        Commands::Cart { action } => {
            let updated = match action {
                CartAction::Show => storage.load_cart()?,
                CartAction::Add { id } => {
                    let product = api.product(id).await?;
                    let updated =
                        cart::add_to_cart(&mut storage, product.id, &product.name, product.price)?;
                    println!("{} added to cart!", product.name);
                    updated
                }
                CartAction::Set { id, quantity } => cart::update_quantity(&mut storage, id, quantity)?,
                CartAction::Remove { id } => cart::remove_from_cart(&mut storage, id)?,
                CartAction::Clear => cart::clear_cart(&mut storage)?,
            };
            if updated.is_empty() {
                println!("Your cart is empty");
            } else {
                for item in updated.items() {
                    println!(
                        "#{:<4} {:<32} ${:>8} x {:<3} = ${}",
                        item.id,
                        item.name,
                        format_amount(item.price),
                        item.quantity,
                        format_amount(item.subtotal())
                    );
                }
                println!("Total: ${} ({} items)", updated.formatted_total(), updated.count());
            }
        }
        Commands::Checkout => {
            let user = auth::current_user(&storage);
            let total = cart::checkout(&mut storage, user.as_ref())?;
            println!("Order placed successfully! Total: ${}", format_amount(total));
        }
    }
    Ok(())
}
