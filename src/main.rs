//! Video Range Server
//!
//! A self-hosted video server that streams stored uploads to browser
//! `<video>` elements, answering HTTP `Range` requests so players can seek
//! and play progressively without whole files being loaded into memory.

mod auth;
mod config;
mod config_file;
mod error;
mod http;
#[cfg(test)]
mod integration;
mod metrics;
mod range;
mod state;
mod storage;
mod streaming;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::config_file::ConfigFile;
use crate::error::{Result, StreamError};
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "video-range-server";

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| "config.toml".to_string());

    // `video-range-server --write-config <path>` writes the default config and exits
    if config_path == "--write-config" {
        let target = args.next().unwrap_or_else(|| "config.toml".to_string());
        ConfigFile::default_config()
            .to_file(&target)
            .map_err(|e| StreamError::Config(format!("failed to write {}: {}", target, e)))?;
        println!("Wrote default configuration to {}", target);
        return Ok(());
    }

    // Load configuration
    let loaded = ConfigFile::load_optional(&config_path);
    let config = match &loaded {
        Ok(Some(cf)) => cf.clone().into_server_config(),
        _ => ServerConfig::default(),
    };

    // Initialize logging
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    if let Err(e) = &loaded {
        tracing::warn!(
            "Failed to load config file {}: {}. Using defaults.",
            config_path,
            e
        );
    }
    config.validate()?;
    tracing::info!("Configuration loaded: {:?}", config);

    // Create application state
    let state = Arc::new(AppState::from_config(config.clone()).await?);

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .socket_addr()
        .parse()
        .map_err(|e| StreamError::Config(format!("invalid listen address: {}", e)))?;
    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Initialize logging with tracing
fn init_logging(config: &ServerConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("video_range_server={},tower_http=debug", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
