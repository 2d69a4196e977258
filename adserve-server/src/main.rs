//! Adserve Server
//!
//! An ad bidding service: matches line items against placement requests,
//! computes performance-adjusted, budget-paced bids, and tracks spend.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use adserve_core::processors::BudgetResetJob;
use adserve_core::store::{PostgresLineItemStore, PostgresTrackingStore};
use clap::Parser;
use config::{ConfigLoader, get_database_url};
use server::{build_router, run_server};
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Adserve - ad bidding and serving service
#[derive(Parser, Debug)]
#[command(name = "adserve-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./adserve-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting adserve-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = config.server.listen;
    let pacing_offset = config.pacing.utc_offset();
    tracing::info!(
        pacing_offset = %pacing_offset,
        "Configuration loaded from {:?}",
        args.config
    );

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    // Create stores and application state
    let line_items = Arc::new(PostgresLineItemStore::new(db_pool.clone()));
    let tracking_store = Arc::new(PostgresTrackingStore::new(db_pool.clone()));
    let app_state = AppState::new(line_items.clone(), tracking_store, pacing_offset);

    // Spawn the daily budget reset processor
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let reset_job = BudgetResetJob::new(line_items, pacing_offset);
    let reset_handle = tokio::spawn(reset_job.run(shutdown_rx));

    // Build the router
    let router = build_router(app_state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop the reset processor
    let _ = shutdown_tx.send(true);
    let _ = reset_handle.await;

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
