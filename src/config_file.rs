//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{AuthConfig, AuthMode, ServerConfig, StorageConfig, StreamingConfig, TokenGrant};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Storage settings
    pub storage: Option<StorageSettings>,
    /// Streaming settings
    pub streaming: Option<StreamingSettings>,
    /// Authorization settings
    pub auth: Option<AuthSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory holding uploaded videos
    pub media_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingSettings {
    /// Read chunk size in KB
    pub chunk_size_kb: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// `open` or `token`
    pub mode: AuthMode,
    /// Token grants, used in `token` mode
    #[serde(default)]
    pub tokens: Vec<TokenGrant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration if the file exists; `Ok(None)` when it does not
    pub fn load_optional<P: AsRef<Path>>(
        path: P,
    ) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_enabled: Some(true),
            },
            storage: Some(StorageSettings {
                media_dir: PathBuf::from("uploads"),
            }),
            streaming: Some(StreamingSettings { chunk_size_kb: 1024 }),
            auth: Some(AuthSettings {
                mode: AuthMode::Open,
                tokens: Vec::new(),
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        let (log_level, log_json) = match self.logging {
            Some(l) => (l.level, l.format.as_deref() == Some("json")),
            None => (defaults.log_level, defaults.log_json),
        };

        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            storage: self
                .storage
                .map(|s| StorageConfig { media_dir: s.media_dir })
                .unwrap_or(defaults.storage),
            streaming: self
                .streaming
                .map(|s| StreamingConfig {
                    chunk_size_kb: s.chunk_size_kb,
                })
                .unwrap_or(defaults.streaming),
            auth: self
                .auth
                .map(|a| AuthConfig {
                    mode: a.mode,
                    tokens: a.tokens,
                })
                .unwrap_or(defaults.auth),
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level,
            log_json,
        }
    }
}
