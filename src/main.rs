//! Items server - main entry point.
//!
//! Serves the `/items` CRUD API over HTTP, backed by a lazily-initialized
//! connection pool (PostgreSQL or SQLite, selected by DATABASE_URL).

use clap::Parser;
use items_server::config::Config;
use items_server::db::{ItemRepository, PoolManager, PoolSettings};
use items_server::http::{self, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration from command line and environment
    let config = Config::parse();

    // Initialize logging
    init_tracing(&config);

    if let Err(msg) = config.validate() {
        eprintln!("Error: {}", msg);
        std::process::exit(1);
    }

    info!("Starting items server v{}", env!("CARGO_PKG_VERSION"));

    // A missing DATABASE_URL is fatal at first use, not at startup.
    if config.database_url.is_none() {
        warn!("DATABASE_URL is not set; requests will fail until it is configured");
    }

    let pools = Arc::new(PoolManager::new(PoolSettings::from_config(&config)));
    let repository = Arc::new(ItemRepository::new(
        Arc::clone(&pools),
        config.query_timeout_duration(),
    ));
    let app = http::routes(AppState { repository });

    if let Err(e) = http::serve(app, &config.http_bind_addr(), pools).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
