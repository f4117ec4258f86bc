//! Administrative CLI for the warehouse database.
//!
//! Configuration comes from `config/` and `APP__*` variables, see
//! [`warehouse_inventory::config::load_config`].

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::info;

use warehouse_inventory::{
    audit::{scope_auditor, Auditor},
    config::{self, AppConfig},
    db::{self, DbPool},
    entities::{category, inventory_item, location, order, order_item, product, supplier},
    services::{ServiceContainer, ServiceFactory},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = config::load_config().context("failed to load configuration")?;
    config::init_tracing(app_config.log_level(), app_config.log_json);

    let context = CliContext::initialize(&app_config).await?;
    let auditor = Auditor::new(cli.auditor.clone());

    scope_auditor(auditor, async {
        match cli.command {
            Commands::Check => handle_check(&context).await,
            Commands::Migrate => handle_migrate(&context).await,
            Commands::Seed => handle_seed(&context).await,
            Commands::ReorderReport => handle_reorder_report(&context, cli.json).await,
            Commands::TopSellers(args) => handle_top_sellers(&context, args, cli.json).await,
            Commands::Stock(command) => handle_stock_command(&context, command, cli.json).await,
        }
    })
    .await?;

    db::close_pool(context.into_pool()).await?;
    Ok(())
}

#[derive(Parser)]
#[command(name = "inventory-admin", about = "Warehouse inventory administration", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[arg(
        long,
        global = true,
        default_value = "inventory-admin",
        help = "Name recorded in the audit columns of every write"
    )]
    auditor: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify the database answers
    Check,
    /// Apply pending schema migrations
    Migrate,
    /// Populate an empty database with demo data
    Seed,
    /// List stock records at or below their reorder point
    ReorderReport,
    /// Best selling products
    TopSellers(TopSellersArgs),
    #[command(subcommand)]
    Stock(StockCommands),
}

#[derive(Clone, Copy, ValueEnum)]
enum RankBy {
    Quantity,
    Revenue,
}

#[derive(Args)]
struct TopSellersArgs {
    #[arg(long, value_enum, default_value = "quantity")]
    by: RankBy,
    #[arg(long, default_value_t = 10)]
    limit: u64,
}

#[derive(Subcommand)]
enum StockCommands {
    Receive(StockMoveArgs),
    Ship(StockMoveArgs),
    Adjust(AdjustArgs),
    Transfer(TransferArgs),
}

#[derive(Args)]
struct StockMoveArgs {
    #[arg(long)]
    product: i64,
    #[arg(long)]
    location: i64,
    #[arg(long)]
    quantity: i32,
    #[arg(long)]
    reference: Option<String>,
}

#[derive(Args)]
struct AdjustArgs {
    #[arg(long)]
    product: i64,
    #[arg(long)]
    location: i64,
    #[arg(long, help = "Counted quantity on hand")]
    quantity: i32,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args)]
struct TransferArgs {
    #[arg(long)]
    product: i64,
    #[arg(long)]
    from: i64,
    #[arg(long)]
    to: i64,
    #[arg(long)]
    quantity: i32,
    #[arg(long)]
    reference: Option<String>,
}

struct CliContext {
    db: Arc<DbPool>,
    services: ServiceContainer,
}

impl CliContext {
    async fn initialize(app_config: &AppConfig) -> Result<Self> {
        let pool = db::establish_connection_with_config(&app_config.db_config())
            .await
            .context("failed to connect to database")?;
        if app_config.auto_migrate {
            db::run_migrations(&pool).await?;
        }
        let db = Arc::new(pool);
        let services = ServiceContainer::new(&ServiceFactory::new(db.clone()));
        Ok(Self { db, services })
    }

    /// Releases the services and hands back the pool for shutdown.
    fn into_pool(self) -> DbPool {
        let Self { db, services } = self;
        drop(services);
        Arc::try_unwrap(db).unwrap_or_else(|shared| (*shared).clone())
    }
}

async fn handle_check(context: &CliContext) -> Result<()> {
    let latency = db::check_connection(&context.db)
        .await
        .context("database did not answer")?;
    println!("Database reachable ({} ms)", latency.as_millis());
    Ok(())
}

async fn handle_migrate(context: &CliContext) -> Result<()> {
    db::run_migrations(&context.db).await?;
    println!("Migrations applied");
    Ok(())
}

async fn handle_seed(context: &CliContext) -> Result<()> {
    let services = &context.services;
    if services.products.count().await? > 0 {
        println!("Database already contains products, skipping seed");
        return Ok(());
    }

    let hardware = services
        .categories
        .save(category::Model::new("Hardware").with_description("Fasteners, fittings and tools"))
        .await?;
    let packaging = services
        .categories
        .save(category::Model::new("Packaging").with_description("Boxes, tape and fillers"))
        .await?;

    let acme = services
        .suppliers
        .save(supplier::Model::new(
            "Acme Industrial",
            "Jordan Lee",
            Some("orders@acme.example".to_string()),
        ))
        .await?;

    let mut dock = location::Model::new("Receiving Dock");
    dock.zone = Some("R".to_string());
    let dock = services.locations.save(dock).await?;
    let mut aisle = location::Model::new("Aisle A3");
    aisle.zone = Some("A".to_string());
    aisle.aisle = Some("03".to_string());
    let aisle = services.locations.save(aisle).await?;

    let products = services
        .products
        .save_all(vec![
            product::Model::new("Hex Bolt M8", dec!(0.35), Some(hardware.id))
                .with_sku("HW-BOLT-M8")
                .with_supplier(acme.id),
            product::Model::new("Cordless Drill", dec!(89.99), Some(hardware.id))
                .with_sku("HW-DRILL-18V")
                .with_supplier(acme.id)
                .with_description("18V drill with two batteries"),
            product::Model::new("Shipping Box 40cm", dec!(1.20), Some(packaging.id))
                .with_sku("PK-BOX-40"),
        ])
        .await?;

    for (product, quantity) in products.iter().zip([5000, 40, 800]) {
        services
            .inventory
            .receive_stock(product.id, dock.id, quantity, Some("SEED".to_string()))
            .await?;
        services
            .inventory
            .transfer_stock(product.id, dock.id, aisle.id, quantity / 2, None)
            .await?;
    }
    for item in services.inventory.find_by_location(aisle.id).await? {
        let (min, max) = (item.quantity / 4, item.quantity * 2);
        services
            .inventory
            .save(item.with_levels(min, max, min))
            .await?;
    }

    for (index, product) in products.iter().enumerate() {
        let mut draft = order::Model::new(format!("SEED-{:04}", index + 1), "Seed Customer");
        draft.order_date = Utc::now() - Duration::days(index as i64);
        draft.shipping_cost = Some(dec!(4.95));
        let line = order_item::Model::new(product.id, 2, product.price);
        services.orders.place_order(draft, vec![line]).await?;
    }

    info!(products = products.len(), "Seed data created");
    println!("Seeded {} products", products.len());
    Ok(())
}

async fn handle_reorder_report(context: &CliContext, json: bool) -> Result<()> {
    let items = context.services.inventory.find_items_needing_reorder().await?;
    if json {
        return print_json(&items);
    }
    if items.is_empty() {
        println!("Nothing needs reordering");
        return Ok(());
    }
    println!("{:>8} {:>8} {:>8} {:>8}", "product", "location", "on hand", "reorder");
    for item in &items {
        print_stock_row(item);
    }
    Ok(())
}

async fn handle_top_sellers(context: &CliContext, args: TopSellersArgs, json: bool) -> Result<()> {
    let order_items = &context.services.order_items;
    match args.by {
        RankBy::Quantity => {
            let ranking = order_items.top_selling_by_quantity(args.limit).await?;
            if json {
                return print_json(&ranking);
            }
            for entry in ranking {
                println!("{:>8} {:>10}", entry.product_id, entry.quantity);
            }
        }
        RankBy::Revenue => {
            let ranking = order_items.top_selling_by_revenue(args.limit).await?;
            if json {
                return print_json(&ranking);
            }
            for entry in ranking {
                println!("{:>8} {:>12}", entry.product_id, entry.revenue);
            }
        }
    }
    Ok(())
}

async fn handle_stock_command(context: &CliContext, command: StockCommands, json: bool) -> Result<()> {
    let inventory = &context.services.inventory;
    let changed = match command {
        StockCommands::Receive(args) => vec![
            inventory
                .receive_stock(args.product, args.location, args.quantity, args.reference)
                .await?,
        ],
        StockCommands::Ship(args) => vec![
            inventory
                .ship_stock(args.product, args.location, args.quantity, args.reference)
                .await?,
        ],
        StockCommands::Adjust(args) => vec![
            inventory
                .adjust_stock(args.product, args.location, args.quantity, args.notes)
                .await?,
        ],
        StockCommands::Transfer(args) => {
            let (source, target) = inventory
                .transfer_stock(args.product, args.from, args.to, args.quantity, args.reference)
                .await?;
            vec![source, target]
        }
    };

    if json {
        return print_json(&changed);
    }
    for item in &changed {
        print_stock_row(item);
    }
    Ok(())
}

fn print_stock_row(item: &inventory_item::Model) {
    println!(
        "{:>8} {:>8} {:>8} {:>8}",
        item.product_id, item.location_id, item.quantity, item.reorder_point
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
