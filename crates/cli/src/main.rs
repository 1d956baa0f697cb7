//! Emporium CLI - migrations, seeding, and a terminal shopper.
//!
//! # Usage
//!
//! ```bash
//! # Prepare the database
//! emp migrate
//! emp seed
//! emp seed --file products.yaml
//!
//! # Browse
//! emp products --search mouse --sort price-low-to-high --page 1
//! emp product <id>
//!
//! # Shop
//! emp cart add <id> --quantity 2
//! emp cart update <id> 3
//! emp cart show
//! emp checkout --full-name "Ada Lovelace" --email ada@example.com ...
//! emp order last
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Replace the product table with sample or file data
//! - `products`, `product` - Query the storefront API
//! - `cart` - Edit the cart kept in the data directory
//! - `checkout` - Place an order from the cart
//! - `order last` - Show the last order receipt

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use emporium_core::ProductId;
use emporium_core::checkout::ShippingInfo;

mod client;
mod commands;
mod error;
mod storage;

use client::{ApiClient, CatalogRequest};
use error::CliError;

#[derive(Parser)]
#[command(name = "emp")]
#[command(author, version, about = "Emporium CLI tools")]
struct Cli {
    /// Storefront base URL
    #[arg(long, global = true, env = "EMPORIUM_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Directory holding the cart and the last order receipt
    #[arg(long, global = true, env = "EMPORIUM_DATA_DIR", default_value = ".emporium")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Replace all products with seed data
    Seed {
        /// YAML file with a `products` list (defaults to the built-in samples)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// List one catalog page
    Products(CatalogArgs),
    /// Show one product
    Product {
        /// Product identifier
        id: String,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order from the cart
    Checkout(ShippingArgs),
    /// Inspect placed orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Args)]
struct CatalogArgs {
    /// Case-insensitive search over name and description
    #[arg(short, long)]
    search: Option<String>,

    /// Only this category
    #[arg(short, long)]
    category: Option<String>,

    /// Lowest price (inclusive)
    #[arg(long)]
    min_price: Option<String>,

    /// Highest price (inclusive)
    #[arg(long)]
    max_price: Option<String>,

    /// `price-low-to-high`, `price-high-to-low` or `newest`
    #[arg(long)]
    sort: Option<String>,

    /// 1-based page number
    #[arg(short, long)]
    page: Option<usize>,
}

impl From<CatalogArgs> for CatalogRequest {
    fn from(args: CatalogArgs) -> Self {
        Self {
            q: args.search,
            category: args.category,
            min_price: args.min_price,
            max_price: args.max_price,
            sort: args.sort,
            page: args.page,
        }
    }
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        id: String,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product's line
    Remove { id: String },
    /// Set a product's quantity (zero keeps the line)
    Update {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Drop lines with zero quantity
    Prune,
    /// Empty the cart
    Clear,
}

#[derive(Args)]
struct ShippingArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long, default_value = "")]
    postal_code: String,
    #[arg(long)]
    country: String,

    /// Simulated processing time in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

impl From<ShippingArgs> for ShippingInfo {
    fn from(args: ShippingArgs) -> Self {
        Self {
            full_name: args.full_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            country: args.country,
        }
    }
}

#[derive(Subcommand)]
enum OrderAction {
    /// Show the last order receipt
    Last,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads EMPORIUM_* defaults
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "emp=info,warn".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = ApiClient::new(&cli.api_url);
    let data_dir = cli.data_dir;

    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file } => commands::seed::products(file.as_deref()).await?,
        Commands::Products(args) => {
            commands::products::list(&client, &CatalogRequest::from(args)).await?;
        }
        Commands::Product { id } => commands::products::show(&client, &ProductId::new(id)).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&data_dir)?,
            CartAction::Add { id, quantity } => {
                commands::cart::add(&client, &data_dir, &ProductId::new(id), quantity).await?;
            }
            CartAction::Remove { id } => commands::cart::remove(&data_dir, &ProductId::new(id))?,
            CartAction::Update { id, quantity } => {
                commands::cart::update(&data_dir, &ProductId::new(id), quantity)?;
            }
            CartAction::Prune => commands::cart::prune(&data_dir)?,
            CartAction::Clear => commands::cart::clear(&data_dir)?,
        },
        Commands::Checkout(args) => {
            let delay = Duration::from_millis(args.delay_ms);
            commands::checkout::place_order(data_dir, ShippingInfo::from(args), delay).await?;
        }
        Commands::Order { action } => match action {
            OrderAction::Last => commands::order::last(&data_dir)?,
        },
    }
    Ok(())
}
