//! ZHVI lookup API service.
//!
//! Downloads the ZIP-level home value index once at startup, then serves
//! per-ZIP time series over HTTP alongside a static page.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use ingestion::{IngestConfig, Ingester, LookupStore, DEFAULT_SOURCE_URL};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use zhvi_api::{create_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "zhvi-api")]
#[command(about = "ZIP-level home value index lookup API")]
struct Args {
    /// Listen host
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value = "3001")]
    port: u16,

    /// CSV export to ingest at startup
    #[arg(long, env = "DATA_URL", default_value = DEFAULT_SOURCE_URL)]
    source_url: String,

    /// Directory holding index.html and other static assets
    #[arg(long, env = "STATIC_DIR", default_value = "public")]
    static_dir: PathBuf,

    /// Connect timeout for the download, in seconds
    #[arg(long, default_value = "30")]
    connect_timeout_secs: u64,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Starting ZHVI lookup API");

    let config = IngestConfig {
        source_url: args.source_url.clone(),
        connect_timeout: Duration::from_secs(args.connect_timeout_secs),
        ..IngestConfig::default()
    };
    let store = LookupStore::new();
    let ingester = Ingester::new(&config, store.clone())?;
    let state = Arc::new(
        AppState::new(store, ingester.source_url()).with_prometheus(prometheus_handle),
    );

    // Ingestion finishes before the listener is bound
    let outcome = ingester.run().await;
    if !outcome.is_loaded() {
        warn!("Serving without data; every lookup will return 404");
    }
    state.record_outcome(outcome).await;

    let app = create_router(state, &args.static_dir);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    info!(address = %addr, static_dir = %args.static_dir.display(), "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Received shutdown signal");
}
