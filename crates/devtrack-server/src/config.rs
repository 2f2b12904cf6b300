//! Environment-based server configuration.
//!
//! Variable names match what deployments of the original backend already
//! export; nothing here invents a new configuration surface.

use std::net::SocketAddr;

use devtrack_store::DEFAULT_BLOB_NAME;

/// Errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is set but unparseable.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Why it failed to parse.
        message: String,
    },
}

/// Full server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Azure storage connection string.
    pub connection_string: String,
    /// Blob container holding the dataset object.
    pub container: String,
    /// Dataset object name within the container.
    pub blob_name: String,
    /// JWT signing secret.
    pub secret: String,
    /// Legacy static API key; configured but mounted on no route.
    pub api_key: Option<String>,
    /// Admin username for token issuance.
    pub admin_username: String,
    /// Admin password for token issuance.
    pub admin_password: String,
    /// Origin the CORS middleware admits.
    pub frontend_origin: String,
    /// Address the API listens on.
    pub bind_addr: SocketAddr,
    /// Read-endpoint budget per client address per minute.
    pub read_limit_per_minute: u32,
    /// Write-endpoint budget per client address per minute.
    pub write_limit_per_minute: u32,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            connection_string: require("AZURE_STORAGE_CONNECTION_STRING")?,
            container: require("AZURE_STORAGE_CONTAINER_NAME")?,
            blob_name: optional("DEVTRACK_BLOB_NAME")
                .unwrap_or_else(|| DEFAULT_BLOB_NAME.to_string()),
            secret: require("SECRET_KEY")?,
            api_key: optional("API_KEY"),
            admin_username: require("ADMIN_USERNAME")?,
            admin_password: require("ADMIN_PASSWORD")?,
            frontend_origin: optional("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            bind_addr: parse_var("DEVTRACK_BIND_ADDR", "0.0.0.0:8000")?,
            read_limit_per_minute: parse_var("DEVTRACK_READ_LIMIT", "5")?,
            write_limit_per_minute: parse_var("DEVTRACK_WRITE_LIMIT", "3")?,
        })
    }
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

fn parse_var<T>(name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = optional(name).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        message: e.to_string(),
    })
}
