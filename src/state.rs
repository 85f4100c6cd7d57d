//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - The Storage Resolver and Authorization Gate capabilities
//! - Per-video view counters
//! - Metrics and server configuration

use dashmap::DashMap;
use std::sync::Arc;

use crate::auth::{self, AuthCheck};
use crate::config::ServerConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::storage::{DirectoryLookup, VideoId, VideoLookup};

/// Application state shared across all handlers
pub struct AppState {
    /// Resolves video ids to files
    pub lookup: Arc<dyn VideoLookup>,

    /// Decides who may read which video
    pub auth: Arc<dyn AuthCheck>,

    /// Successful stream responses per video id
    pub views: DashMap<String, u64>,

    /// Streaming counters
    pub metrics: Arc<Metrics>,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create an AppState with explicit capabilities
    pub fn new(
        config: ServerConfig,
        lookup: Arc<dyn VideoLookup>,
        auth: Arc<dyn AuthCheck>,
    ) -> Self {
        Self {
            lookup,
            auth,
            views: DashMap::new(),
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }

    /// Create an AppState backed by the configured media directory and auth mode
    pub async fn from_config(config: ServerConfig) -> Result<Self> {
        let lookup = DirectoryLookup::open(&config.storage.media_dir).await?;
        tracing::info!("Serving videos from {}", lookup.root().display());
        let gate: Arc<dyn AuthCheck> = Arc::from(auth::from_config(&config.auth));
        Ok(Self::new(config, Arc::new(lookup), gate))
    }

    /// Read chunk size for streams, in bytes
    pub fn chunk_size(&self) -> usize {
        self.config.streaming.chunk_size_bytes()
    }

    /// Count a view and return the new total
    pub fn record_view(&self, id: &VideoId) -> u64 {
        let mut entry = self.views.entry(id.as_str().to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Views recorded for a video
    pub fn view_count(&self, id: &VideoId) -> u64 {
        self.views.get(id.as_str()).map(|v| *v).unwrap_or(0)
    }
}
