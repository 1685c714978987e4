use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trailarr_core::{
    load_config, validate_config, CommandFetcher, ConfigProfileStore, LocalFilesystem, MediaStore,
    MonitorScheduler, PlexClient, ProfileStore, RemoteLibrary, SqliteMediaStore,
    TrailerDedupCache, TrailerFetcher, TrailerPipeline,
};

use trailarr_server::api::create_router;
use trailarr_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("trailarr v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("TRAILARR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        "Configuration loaded successfully (fingerprint {})",
        &config_hash[..16]
    );
    info!("Database path: {:?}", config.database.path);
    info!("{} trailer profiles configured", config.profiles.len());

    // Create SQLite media store
    let media_store: Arc<dyn MediaStore> = Arc::new(
        SqliteMediaStore::new(&config.database.path).context("Failed to create media store")?,
    );
    info!("Media store initialized");

    let profile_store: Arc<dyn ProfileStore> =
        Arc::new(ConfigProfileStore::new(config.profiles.clone()));

    // Remote library dedup
    let dedup = if config.plex.respect_trailers {
        let plex: Arc<dyn RemoteLibrary> =
            Arc::new(PlexClient::new(&config.plex).context("Failed to create Plex client")?);
        info!("Plex trailer dedup enabled ({})", config.plex.url);
        TrailerDedupCache::new(plex, &config.plex)
    } else {
        info!("Plex trailer dedup disabled");
        TrailerDedupCache::disabled()
    };

    let fetcher: Arc<dyn TrailerFetcher> = Arc::new(CommandFetcher::new(
        config.fetcher.clone(),
        Arc::clone(&media_store),
    ));
    info!("Trailer fetcher: {}", config.fetcher.program);

    let pipeline = Arc::new(TrailerPipeline::new(
        config.monitor.clone(),
        media_store,
        profile_store,
        Arc::new(dedup),
        Arc::new(LocalFilesystem),
        fetcher,
    ));

    let shutdown = CancellationToken::new();

    // Start the monitor scheduler
    let scheduler = MonitorScheduler::new(
        Arc::clone(&pipeline),
        Duration::from_secs(config.monitor.interval_secs),
        &shutdown,
    );
    if config.monitor.enabled {
        scheduler.start();
    } else {
        info!("Monitoring disabled, scheduler not started");
    }

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::clone(&pipeline),
        shutdown.clone(),
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down");
    shutdown.cancel();
    scheduler.stop().await;
    info!("Server stopped");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
