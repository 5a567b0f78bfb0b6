//! Listing Publisher CLI
//!
//! Multi-marketplace listing publishing assistant

use anyhow::Result;
use clap::{Parser, Subcommand};
use listing_publisher::{
    BulkDispatcher, Item, ItemStore, JsonFileStore, PlatformRegistry, PublishError,
    PublishOrchestrator, PublishState, PublisherConfig, StatusLedger,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Multi-marketplace listing publishing assistant
#[derive(Parser)]
#[command(name = "listing-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Multi-marketplace listing publishing assistant", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true, default_value = "publisher.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the catalog
    Add {
        /// Item title
        title: String,

        /// Item description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Price in dollars
        #[arg(short, long)]
        price: f64,

        /// Quantity in stock
        #[arg(short, long, default_value = "1")]
        quantity: u32,

        /// Comma-separated platforms to publish to
        #[arg(long, default_value = "ebay,shopify")]
        platforms: String,
    },

    /// List catalog items with their publication status
    List,

    /// Publish one item to one platform
    Publish {
        /// Item id
        item_id: String,

        /// Platform name (ebay, shopify)
        #[arg(short, long)]
        platform: String,
    },

    /// Re-publish an item in place, keeping its listing id
    Update {
        /// Item id
        item_id: String,

        /// Platform name (ebay, shopify)
        #[arg(short, long)]
        platform: String,
    },

    /// Remove an item's listing from a platform
    Remove {
        /// Item id
        item_id: String,

        /// Platform name (ebay, shopify)
        #[arg(short, long)]
        platform: String,
    },

    /// Publish many items to many platforms in one run
    Bulk {
        /// Comma-separated item ids (defaults to the whole catalog)
        #[arg(long)]
        items: Option<String>,

        /// Comma-separated platforms (defaults to all registered)
        #[arg(long)]
        platforms: Option<String>,
    },

    /// Show platform configuration status
    Health,

    /// Display publication statistics
    Stats,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("listing_publisher=warn")),
        )
        .init();

    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

struct App {
    store: Arc<JsonFileStore>,
    orchestrator: Arc<PublishOrchestrator>,
}

impl App {
    async fn from_config(path: &PathBuf) -> Result<Self> {
        let config = PublisherConfig::load(path).await?;

        let store = Arc::new(JsonFileStore::new(&config.data_file));
        let ledger = Arc::new(StatusLedger::new(
            Arc::clone(&store) as Arc<dyn ItemStore>
        ));
        let timeout = Duration::from_secs(config.adapter_timeout_secs);
        let registry = Arc::new(PlatformRegistry::from_config(config));
        let orchestrator = Arc::new(PublishOrchestrator::new(registry, ledger, timeout));

        Ok(Self {
            store,
            orchestrator,
        })
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let app = App::from_config(&cli.config).await?;

    match cli.command {
        Commands::Add {
            title,
            description,
            price,
            quantity,
            platforms,
        } => add_command(app, title, description, price, quantity, &platforms).await,
        Commands::List => list_command(app).await,
        Commands::Publish { item_id, platform } => {
            pair_command(app, &item_id, &platform, PairOp::Publish).await
        }
        Commands::Update { item_id, platform } => {
            pair_command(app, &item_id, &platform, PairOp::Update).await
        }
        Commands::Remove { item_id, platform } => {
            pair_command(app, &item_id, &platform, PairOp::Remove).await
        }
        Commands::Bulk { items, platforms } => bulk_command(app, items, platforms).await,
        Commands::Health => health_command(app),
        Commands::Stats => stats_command(app).await,
    }
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

async fn add_command(
    app: App,
    title: String,
    description: String,
    price: f64,
    quantity: u32,
    platforms: &str,
) -> Result<i32> {
    let selection: HashMap<String, bool> = split_csv(platforms)
        .into_iter()
        .map(|name| (name.to_lowercase(), true))
        .collect();

    let item = Item::new(title, description, price, quantity, selection);
    let id = item.id.clone();

    let mut items = app.store.load_all().await?;
    items.push(item);
    app.store.save_all(items).await?;

    println!("\n✅ Item added: {id}");
    Ok(0)
}

async fn list_command(app: App) -> Result<i32> {
    let items = app.store.load_all().await?;

    if items.is_empty() {
        println!("\n⚠️  Catalog is empty");
        return Ok(0);
    }

    println!("\n📋 Catalog ({} items)\n", items.len());
    for item in &items {
        println!("  {} - {} (${:.2}, qty {})", item.id, item.title, item.price, item.quantity);
        let mut platforms: Vec<_> = item.platform_status.iter().collect();
        platforms.sort_by(|a, b| a.0.cmp(b.0));
        for (platform, record) in platforms {
            let state = match record.state {
                PublishState::Pending => "pending",
                PublishState::Published => "published",
                PublishState::Failed => "failed",
            };
            match &record.external_id {
                Some(external_id) => println!("    {platform}: {state} ({external_id})"),
                None => println!("    {platform}: {state}"),
            }
        }
    }
    Ok(0)
}

enum PairOp {
    Publish,
    Update,
    Remove,
}

async fn pair_command(app: App, item_id: &str, platform: &str, op: PairOp) -> Result<i32> {
    let result = match op {
        PairOp::Publish => app.orchestrator.publish_one(item_id, platform).await,
        PairOp::Update => app.orchestrator.update_one(item_id, platform).await,
        PairOp::Remove => app.orchestrator.remove_one(item_id, platform).await,
    };

    match result {
        Ok(record) => {
            match record.state {
                PublishState::Published => {
                    println!("\n✅ Published to {platform}");
                    if let Some(url) = &record.external_url {
                        println!("  {url}");
                    }
                }
                PublishState::Pending => println!("\n✅ Listing removed from {platform}"),
                PublishState::Failed => println!("\n❌ Failed on {platform}"),
            }
            Ok(0)
        }
        Err(e @ PublishError::ItemNotFound { .. }) => {
            eprintln!("\n❌ {e}");
            Ok(1)
        }
        Err(e) if e.is_configuration() => {
            eprintln!("\n❌ Configuration error: {e}");
            eprintln!("  No publish attempt was made.");
            Ok(1)
        }
        Err(e) => {
            eprintln!("\n❌ Publish failed: {e}");
            eprintln!("  The failure was recorded; re-run the command to retry.");
            Ok(1)
        }
    }
}

async fn bulk_command(
    app: App,
    items: Option<String>,
    platforms: Option<String>,
) -> Result<i32> {
    let item_ids = match items {
        Some(ref csv) => split_csv(csv),
        None => {
            app.store
                .load_all()
                .await?
                .into_iter()
                .map(|item| item.id)
                .collect()
        }
    };
    let platforms = match platforms {
        Some(ref csv) => split_csv(csv),
        None => app.orchestrator.platforms(),
    };

    if item_ids.is_empty() || platforms.is_empty() {
        println!("\n⚠️  Nothing to publish");
        return Ok(0);
    }

    println!(
        "\n📦 Bulk publish: {} items x {} platforms\n",
        item_ids.len(),
        platforms.len()
    );

    let dispatcher = BulkDispatcher::new(Arc::clone(&app.orchestrator));
    let handle = dispatcher.dispatch(item_ids, platforms);
    println!("  Job {}", handle.job_id());

    let report = handle.wait().await?;
    for outcome in &report.outcomes {
        if outcome.success {
            println!("  ✅ {} -> {}", outcome.item_id, outcome.platform);
        } else {
            println!(
                "  ❌ {} -> {}: {}",
                outcome.item_id,
                outcome.platform,
                outcome.message.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!(
        "\n{} {} succeeded, {} failed ({} attempts)",
        if report.failed == 0 { "✅" } else { "⚠️ " },
        report.succeeded,
        report.failed,
        report.total
    );
    Ok(if report.failed == 0 { 0 } else { 1 })
}

fn health_command(app: App) -> Result<i32> {
    println!("\n🔍 Platform Health\n");

    let health = app.orchestrator.health();
    let mut platforms: Vec<_> = health.iter().collect();
    platforms.sort_by(|a, b| a.0.cmp(b.0));

    for (platform, status) in platforms {
        if status.configured {
            println!("  ✅ {platform}: configured");
        } else {
            println!("  ⚠️  {platform}: not configured (mock mode)");
        }
    }
    Ok(0)
}

async fn stats_command(app: App) -> Result<i32> {
    let items = app.store.load_all().await?;

    println!("\n📊 Publication Statistics\n");
    println!("  Items: {}", items.len());

    let mut per_platform: HashMap<&str, (usize, usize, usize)> = HashMap::new();
    for item in &items {
        for (platform, record) in &item.platform_status {
            let counts = per_platform.entry(platform.as_str()).or_default();
            match record.state {
                PublishState::Pending => counts.0 += 1,
                PublishState::Published => counts.1 += 1,
                PublishState::Failed => counts.2 += 1,
            }
        }
    }

    let mut platforms: Vec<_> = per_platform.into_iter().collect();
    platforms.sort_by(|a, b| a.0.cmp(b.0));
    for (platform, (pending, published, failed)) in platforms {
        println!(
            "  {platform}: {published} published, {pending} pending, {failed} failed"
        );
    }
    Ok(0)
}
