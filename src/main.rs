use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use standlytics::analytics::{AnalyticsEngine, WindowSpec};
use standlytics::auth::StaticSession;
use standlytics::catalog::{CatalogService, HttpCatalog, InMemoryCatalog};
use standlytics::config::Config;
use standlytics::models::{ClickEvent, CreateProductRequest, Product, ProductType};

#[derive(Parser)]
#[command(name = "standlytics")]
#[command(about = "Stand engagement analytics CLI", long_about = None)]
struct Cli {
    /// Use a built-in sample catalog instead of the remote API
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print aggregated click statistics as JSON
    Stats {
        /// Time window: week, month, year or custom
        #[arg(long, default_value = "week")]
        window: String,
        /// Custom window start (YYYY-MM-DD, with --window custom)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Custom window end (YYYY-MM-DD, with --window custom)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Only count products of this type (stander, sticker, kort, plate)
        #[arg(long)]
        product_type: Option<String>,
    },
    /// Keep the dataset refreshed and print statistics on every tick
    Watch {
        /// Time window: week, month or year
        #[arg(long, default_value = "week")]
        window: String,
        /// Only count products of this type (stander, sticker, kort, plate)
        #[arg(long)]
        product_type: Option<String>,
    },
    /// List catalog products with their lifetime click counts
    Products,
    /// Register a new product
    Add {
        /// Product type (stander, sticker, kort, plate)
        product_type: String,
        /// Redirect target for the device
        #[arg(long)]
        redirect_url: Option<String>,
    },
    /// Remove a product by id
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let catalog: Arc<dyn CatalogService> = if cli.demo {
        info!("Using built-in sample catalog");
        Arc::new(InMemoryCatalog::new(sample_products()))
    } else {
        info!("Using catalog API at {}", config.catalog.base_url);
        let session = Arc::new(StaticSession::new(config.catalog.api_token.clone()));
        Arc::new(HttpCatalog::new(&config.catalog.base_url, session)?)
    };

    match cli.command {
        Commands::Stats {
            window,
            from,
            to,
            product_type,
        } => {
            let window = parse_window(&window, from, to)?;
            let filter = parse_filter(product_type.as_deref())?;
            let engine = AnalyticsEngine::new(catalog, &config.analytics);

            let result = engine.query(&window, filter).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Watch {
            window,
            product_type,
        } => {
            let window = parse_window(&window, None, None)?;
            let filter = parse_filter(product_type.as_deref())?;
            let engine = AnalyticsEngine::new(catalog, &config.analytics);
            engine.start();

            info!(
                "🔄 Watching engagement (refresh every {}s), Ctrl-C to stop",
                config.analytics.refresh_secs
            );

            let mut ticker =
                tokio::time::interval(Duration::from_secs(config.analytics.refresh_secs.max(1)));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match engine.query(&window, filter).await {
                            Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                            Err(e) => warn!("Statistics unavailable this tick: {e}"),
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Stopping refresh schedule");
                        engine.stop();
                        break;
                    }
                }
            }
        }
        Commands::Products => {
            let products = catalog
                .fetch_products()
                .await
                .context("failed to list products")?;

            if products.is_empty() {
                println!("No products found.");
            } else {
                println!("{:<12} {:<10} {}", "ID", "Type", "Clicks");
                println!("{}", "-".repeat(34));
                for product in products {
                    println!(
                        "{:<12} {:<10} {}",
                        product.id,
                        product.product_type.as_str(),
                        product.click_history.len()
                    );
                }
            }
        }
        Commands::Add {
            product_type,
            redirect_url,
        } => {
            let Some(product_type) = ProductType::parse(&product_type) else {
                bail!("unknown product type '{product_type}', expected stander, sticker, kort or plate");
            };

            let product = catalog
                .create_product(&CreateProductRequest {
                    product_type,
                    redirect_url,
                })
                .await
                .context("failed to create product")?;
            println!("✓ Created {} ({})", product.id, product.product_type.as_str());
        }
        Commands::Remove { id } => {
            let removed = catalog
                .delete_product(&id)
                .await
                .context("failed to delete product")?;
            if removed {
                println!("✓ Removed {id}");
            } else {
                println!("⚠ Product '{id}' was not found");
            }
        }
    }

    Ok(())
}

fn parse_window(window: &str, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<WindowSpec> {
    match window.to_lowercase().as_str() {
        "week" => Ok(WindowSpec::week()),
        "month" => Ok(WindowSpec::month()),
        "year" => Ok(WindowSpec::year()),
        "custom" => match (from, to) {
            (Some(start), Some(end)) => Ok(WindowSpec::custom(start, end)),
            _ => bail!("--window custom requires both --from and --to"),
        },
        other => bail!("unknown window '{other}', expected week, month, year or custom"),
    }
}

fn parse_filter(product_type: Option<&str>) -> Result<Option<ProductType>> {
    match product_type {
        None => Ok(None),
        Some(raw) => match ProductType::parse(raw) {
            Some(parsed) => Ok(Some(parsed)),
            None => bail!("unknown product type '{raw}', expected stander, sticker, kort or plate"),
        },
    }
}

/// A small dataset with activity over the trailing week, for `--demo` runs.
fn sample_products() -> Vec<Product> {
    let now = chrono::Utc::now();
    let click = |days_ago: i64| ClickEvent {
        timestamp: now - chrono::Duration::days(days_ago),
    };

    vec![
        Product {
            id: "p-1".to_string(),
            product_type: ProductType::Stander,
            redirect_url: Some("https://example.com/menu".to_string()),
            click_history: vec![click(0), click(0), click(2), click(5)],
        },
        Product {
            id: "p-2".to_string(),
            product_type: ProductType::Sticker,
            redirect_url: Some("https://example.com/booking".to_string()),
            click_history: vec![click(1), click(3)],
        },
        Product {
            id: "p-3".to_string(),
            product_type: ProductType::Kort,
            redirect_url: None,
            click_history: Vec::new(),
        },
    ]
}
