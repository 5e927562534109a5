//! Valuation API server.
//!
//! Loads the reference tables, scalers and model once at startup, then serves
//! the health check and prediction endpoints.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use infath::api::{router, AppState};
use infath::config::Config;
use infath::features::SCHEMA_VERSION;
use infath::Predictor;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Property value prediction server")]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory holding the model, scalers and reference tables (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Infath Valuation Server (feature schema v{})", SCHEMA_VERSION);

    let mut config = Config::load_or_default(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(data_dir) = args.data_dir {
        config.artifacts.data_dir = data_dir;
    }

    let paths = config.artifacts.paths();
    info!("Loading artifacts from {}", config.artifacts.data_dir.display());
    let predictor = Predictor::load(&paths).context("Failed to load prediction artifacts")?;

    let reference = predictor.reference();
    info!(
        "Ready: {} cities, {} neighborhood encodings, target scaler {}",
        reference.city_count(),
        reference.encoding_count(),
        if predictor.has_target_scaler() { "loaded" } else { "absent" }
    );

    let state = Arc::new(AppState { predictor });
    let app = router(state, &config.server.allowed_origins);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
