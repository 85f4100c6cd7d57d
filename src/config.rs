//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, StreamError};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded video files
    pub media_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("uploads"),
        }
    }
}

/// Largest accepted read size, in kilobytes (64 MiB)
pub const MAX_CHUNK_SIZE_KB: usize = 64 * 1024;

/// Streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// Size of each read from disk in kilobytes
    pub chunk_size_kb: usize,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            chunk_size_kb: 1024, // 1 MiB
        }
    }
}

impl StreamingConfig {
    /// Get chunk size in bytes, capped at `MAX_CHUNK_SIZE_KB`
    pub fn chunk_size_bytes(&self) -> usize {
        self.chunk_size_kb
            .min(MAX_CHUNK_SIZE_KB)
            .saturating_mul(1024)
    }
}

/// How callers are authorized to read videos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Every caller may stream every video
    Open,
    /// Only callers presenting a configured token
    Token,
}

/// A bearer token and the videos it may read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: String,
    /// Video ids this token may read; `None` grants all videos
    pub videos: Option<Vec<String>>,
}

/// Authorization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub tokens: Vec<TokenGrant>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            mode: AuthMode::Open,
            tokens: Vec::new(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Streaming configuration
    pub streaming: StreamingConfig,

    /// Authorization configuration
    pub auth: AuthConfig,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            storage: StorageConfig::default(),
            streaming: StreamingConfig::default(),
            auth: AuthConfig::default(),
            cors_enabled: true,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.streaming.chunk_size_kb == 0 {
            return Err(StreamError::Config(
                "streaming.chunk_size_kb must be greater than zero".to_string(),
            ));
        }
        if self.streaming.chunk_size_kb > MAX_CHUNK_SIZE_KB {
            return Err(StreamError::Config(format!(
                "streaming.chunk_size_kb must be at most {} (got {})",
                MAX_CHUNK_SIZE_KB, self.streaming.chunk_size_kb
            )));
        }
        if self.auth.mode == AuthMode::Token && self.auth.tokens.is_empty() {
            tracing::warn!("Token auth enabled with no tokens configured; every stream will be rejected");
        }
        Ok(())
    }
}
