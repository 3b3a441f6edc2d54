//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the gateway client and server configuration.

use serde::Deserialize;
use sp_core::SharedPaymentGateway;
use sp_gateway::ShurjopayClient;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Optional TOML overlay for server settings
pub const CONFIG_FILE: &str = "config/server.toml";

/// Errors while loading server configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid socket address {0}")]
    InvalidAddress(String),
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory for the log file
    pub log_dir: String,
    /// Log file name inside `log_dir`
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            log_dir: ".".to_string(),
            log_file: "shurjopay-plugin.log".to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, overlaid by `config/server.toml` when present, then by env vars.
    pub fn load() -> Result<Self, ConfigError> {
        let base = if Path::new(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// Read settings from a TOML file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Apply `HOST`, `PORT`, `ENVIRONMENT` and `LOG_DIR` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        dotenvy::dotenv().ok();

        if let Ok(host) = std::env::var("HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Ok(environment) = std::env::var("ENVIRONMENT") {
            self.environment = environment;
        }
        if let Ok(log_dir) = std::env::var("LOG_DIR") {
            self.log_dir = log_dir;
        }
        self
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway client
    pub gateway: SharedPaymentGateway,
    /// Prefix for generated order ids
    pub order_prefix: String,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state backed by the shurjoPay client configured from the environment
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let client = ShurjopayClient::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize shurjoPay: {}", e))?;
        let order_prefix = client.credentials().merchant_key_prefix().to_string();

        Ok(Self::with_gateway(Arc::new(client), order_prefix, config))
    }

    /// Create state around an existing gateway
    pub fn with_gateway(
        gateway: SharedPaymentGateway,
        order_prefix: impl Into<String>,
        config: AppConfig,
    ) -> Self {
        Self {
            gateway,
            order_prefix: order_prefix.into(),
            config,
        }
    }
}
