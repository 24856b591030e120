use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use manicomio_core::{
    load_config, validate_config, ManicomioProvider, ProperFinder, RssCache, SqliteLibrary,
    TorrentProvider,
};
use manicomio_server::{api::create_router, state::AppState};

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

    // Determine config path
    let config_path = std::env::var("MANICOMIO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Fingerprint without secrets
    let sanitized_json =
        serde_json::to_string(&manicomio_core::SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(sanitized_json.as_bytes()));
    let config_hash = config_hash[..16].to_string();

    info!(config_hash = %config_hash, "Configuration loaded successfully");
    info!("Tracker: {}", config.provider.base_url);
    info!("Library path: {:?}", config.library.path);

    // Create provider
    let provider: Arc<dyn TorrentProvider> = Arc::new(
        ManicomioProvider::new(config.provider.clone()).context("Failed to create provider")?,
    );
    if !config.provider.enabled {
        warn!("Provider disabled in config, searches will return no results");
    }
    if let Err(e) = provider.check_auth() {
        warn!("{}", e);
    }

    // Open the media library read-only
    let propers = match SqliteLibrary::open(&config.library.path) {
        Ok(library) => {
            info!("Media library opened");
            Some(ProperFinder::new(Arc::new(library)))
        }
        Err(e) => {
            warn!(
                path = ?config.library.path,
                error = %e,
                "Media library unavailable, proper search disabled"
            );
            None
        }
    };

    let rss = RssCache::from_config(Arc::clone(&provider), &config.provider);

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        config_hash,
        provider,
        propers,
        rss,
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

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
