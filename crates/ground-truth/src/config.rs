//! Configuration for the ground truth backend
//!
//! Loading order: built-in defaults, then an optional TOML file, then
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Provider selection
    #[serde(default)]
    pub providers: ProviderConfig,
    /// Token settings for the auth provider
    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.auth.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production)
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid PORT: {}", port)))?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = split_list(&origins);
        }
        if let Some(database) = lookup("DATABASE_PROVIDER") {
            self.providers.database = database;
        }
        if let Some(auth) = lookup("AUTH_PROVIDER") {
            self.providers.auth = auth;
        }
        if let Some(generation) = lookup("GENERATION_PROVIDER") {
            self.providers.generation = generation;
        }
        if let Some(sources) = lookup("ENABLED_DATA_SOURCES") {
            self.providers.data_sources = split_list(&sources);
        }
        if let Some(secret) = lookup("AUTH_SECRET_KEY") {
            self.auth.secret_key = secret;
        }
        if let Some(minutes) = lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.auth.token_expire_minutes = minutes.parse().map_err(|_| {
                Error::Config(format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: {}", minutes))
            })?;
            self.auth.validate()?;
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Origins allowed by the CORS layer
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_cors_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:4000",
        "http://localhost:54083",
        "http://localhost:54430",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:54083",
        "http://127.0.0.1:54430",
        "http://frontend:3000",
        "http://frontend:4000",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: default_cors_origins(),
        }
    }
}

/// Which implementation backs each provider capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Database provider (only "memory" ships)
    pub database: String,
    /// Authentication provider (only "simple" ships)
    pub auth: String,
    /// Generation provider (only "demo" ships)
    pub generation: String,
    /// Enabled data source ids, searched in order
    pub data_sources: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            database: "memory".to_string(),
            auth: "simple".to_string(),
            generation: "demo".to_string(),
            data_sources: vec!["memory".to_string()],
        }
    }
}

/// Longest accepted access token lifetime (one year)
pub const MAX_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign access tokens
    pub secret_key: String,
    /// Access token lifetime in minutes
    pub token_expire_minutes: i64,
}

impl AuthConfig {
    /// Reject token lifetimes outside `1..=MAX_TOKEN_EXPIRE_MINUTES`
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOKEN_EXPIRE_MINUTES).contains(&self.token_expire_minutes) {
            return Err(Error::Config(format!(
                "Token lifetime must be between 1 and {} minutes, got {}",
                MAX_TOKEN_EXPIRE_MINUTES, self.token_expire_minutes
            )));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "development_secret_key_change_in_production".to_string(),
            token_expire_minutes: 30,
        }
    }
}
