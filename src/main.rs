//! SearXNG-API: a JSON search API in front of SearXNG
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use searxng_api::{
    config,
    web::{create_router, AppState},
    ResponseCache,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    SEARXNG_API_SETTINGS_PATH  Path to settings.yml
    SEARXNG_URL                Upstream SearXNG base URL
    SEARXNG_INSTANCES          Comma-separated upstream pool (overrides SEARXNG_URL)
    SHUFFLE_INSTANCES          Randomize instance order per request (true/false)
    MAX_ATTEMPTS               Instances tried per request
    SEARCH_TIMEOUT             Upstream search timeout in seconds
    HEALTH_TIMEOUT             Upstream health probe timeout in seconds
    REDIS_URL                  Redis connection string for the response cache
    CACHE_ENABLED              Set to false to disable caching
    CACHE_TTL                  Cache entry lifetime in seconds
    MAX_RESULTS                Upper bound for the limit parameter
    PORT                       Server port
    BIND_ADDRESS               Bind address
    RUST_LOG                   Log filter (default: info)";

/// A caching, fallback-aware JSON search API in front of SearXNG
#[derive(Parser)]
#[command(name = "searxng-api", version, about, after_help = ENV_HELP)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional
    dotenvy::dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting SearXNG-API v{}", searxng_api::VERSION);

    // Load configuration
    let settings = config::load(cli.config.as_deref())?;
    info!(
        "Upstream pool: {} instance(s), max {} attempts per request",
        settings.upstream.instances.len(),
        settings.upstream.max_attempts
    );

    // Connect the response cache
    let cache = ResponseCache::connect(&settings.cache).await;

    // Create application state
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );
    let state = AppState::new(settings, cache)?;
    info!("Application state initialized");

    // Create router
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
