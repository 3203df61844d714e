//! stash
//!
//! Command line front end for the product stash API.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stash_client::application::{ProductService, StockOverview, StockRow};
use stash_client::config::ClientConfig;
use stash_client::domain::{
    Brand, Entity, PlainDate, Product, ProductId, Quantity, StashItem, StashItemId,
};
use stash_client::infrastructure::http::BackendProductService;

#[derive(Parser)]
#[command(name = "stash")]
#[command(about = "Keep track of stocked products and their expiry dates")]
struct Cli {
    /// Base URL of the product API (overrides STASH_API_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in stock, soonest expiry first
    List,

    /// Show a product and its stash items
    Show { id: ProductId },

    /// Create a product without stash items
    Create {
        #[arg(long)]
        id: ProductId,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        name: String,
    },

    /// Change the brand and name of a product
    Rename {
        id: ProductId,
        #[arg(long)]
        brand: String,
        #[arg(long)]
        name: String,
    },

    /// Delete a product
    Delete { id: ProductId },

    /// Add a stash item to a product
    AddItem {
        id: ProductId,
        #[arg(long)]
        quantity: u64,
        /// Expiry date as YYYY-MM-DD
        #[arg(long)]
        expiry: PlainDate,
    },

    /// Set the quantity of a stash item
    SetQuantity {
        id: ProductId,
        item_id: StashItemId,
        quantity: u64,
    },

    /// Remove a stash item from a product
    RemoveItem { id: ProductId, item_id: StashItemId },

    /// Find the product holding a stash item
    FindItem { item_id: StashItemId },

    /// List products with stash items expiring soon
    Expiring(ExpiringArgs),
}

#[derive(Args)]
#[group(multiple = false)]
struct ExpiringArgs {
    /// Expiring strictly before this date (YYYY-MM-DD)
    #[arg(long)]
    before: Option<PlainDate>,

    /// Expiring within this many days from today
    #[arg(long)]
    within: Option<u64>,
}

const DEFAULT_EXPIRING_WITHIN_DAYS: u64 = 7;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config);

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = ClientConfig::from_env().context("Invalid environment configuration")?;
    match &cli.base_url {
        Some(base_url) => Ok(config.with_base_url(base_url)?),
        None => Ok(config),
    }
}

fn init_tracing(config: &ClientConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands, config: &ClientConfig) -> Result<()> {
    let service = BackendProductService::from_config(config);
    info!("Using product API at {}", service.base_url());

    match command {
        Commands::List => {
            let rows = StockOverview::new(&service).execute().await?;
            print_rows(&rows);
        }

        Commands::Show { id } => {
            let product = require_product(&service, &id).await?;
            print_product(&product);
        }

        Commands::Create { id, brand, name } => {
            let product = Product::new(id, Brand::new(brand)?, name);
            let created = service.create_product(&product).await?;
            info!("Created product {}", created.id());
            print_product(&created);
        }

        Commands::Rename { id, brand, name } => {
            let mut product = require_product(&service, &id).await?;
            product.set_details(Brand::new(brand)?, name);
            let updated = service.update_product(&product).await?;
            print_product(&updated);
        }

        Commands::Delete { id } => {
            service.delete_product(&id).await?;
            info!("Deleted product {}", id);
        }

        Commands::AddItem {
            id,
            quantity,
            expiry,
        } => {
            let stash_item = StashItem::create(Quantity::from_u64(quantity), expiry);
            service.add_stash_item(&id, &stash_item).await?;
            println!("{}", stash_item.id());
        }

        Commands::SetQuantity {
            id,
            item_id,
            quantity,
        } => {
            let product = require_product(&service, &id).await?;
            let stash_item = product
                .stash_item(&item_id)
                .ok_or_else(|| anyhow!("Stash item {} not found in product {}", item_id, id))?
                .with_quantity(Quantity::from_u64(quantity));
            let updated = service.update_stash_item(&id, &stash_item).await?;
            println!("{}\t{}\t{}", updated.id(), updated.quantity(), updated.expiry_date());
        }

        Commands::RemoveItem { id, item_id } => {
            service.delete_stash_item(&id, &item_id).await?;
            info!("Removed stash item {} from product {}", item_id, id);
        }

        Commands::FindItem { item_id } => match service
            .get_product_by_stash_item_id(&item_id)
            .await?
        {
            Some(product) => print_product(&product),
            None => bail!("No product holds stash item {}", item_id),
        },

        Commands::Expiring(args) => {
            let overview = StockOverview::new(&service);
            let rows = match args.before {
                Some(date) => overview.expiring_before(&date).await?,
                None => {
                    overview
                        .expiring_within(args.within.unwrap_or(DEFAULT_EXPIRING_WITHIN_DAYS))
                        .await?
                }
            };
            print_rows(&rows);
        }
    }

    Ok(())
}

async fn require_product<S: ProductService + ?Sized>(
    service: &S,
    id: &ProductId,
) -> Result<Product> {
    service
        .get_product(id)
        .await?
        .ok_or_else(|| anyhow!("Product {} not found", id))
}

fn print_rows(rows: &[StockRow]) {
    for row in rows {
        let expiry = row
            .next_expiry_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.product_id, row.brand, row.name, row.total_quantity, expiry
        );
    }
}

fn print_product(product: &Product) {
    println!("{}\t{}\t{}", product.id(), product.brand(), product.name());
    for item in product.stash_items() {
        println!("  {}\t{}\t{}", item.id(), item.quantity(), item.expiry_date());
    }
}
