//! Application configuration loaded from environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use cart_service::DEFAULT_CART_KEY;

/// Where the cart slot is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// A JSON file on disk.
    File,
    /// A PostgreSQL table.
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::Postgres => "postgres",
        };
        f.write_str(name)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `text` or `json` (default: `text`)
/// - `CART_STORAGE`: `memory`, `file` or `postgres` (default: `memory`)
/// - `CART_STORAGE_PATH`: file backend location (default: `"cart.json"`)
/// - `DATABASE_URL`: PostgreSQL connection string, required by the postgres backend
/// - `CART_STORAGE_KEY`: slot key (default: `"@RocketShoes:cart"`)
/// - `CATALOG_SEED_PATH`: JSON file with products and stock (default: bundled fixture)
///
/// Unparseable values fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub storage: StorageBackend,
    pub storage_path: PathBuf,
    pub database_url: Option<String>,
    pub cart_key: String,
    pub catalog_seed_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: lookup("LOG_FORMAT")
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            storage: lookup("CART_STORAGE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.storage),
            storage_path: lookup("CART_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            cart_key: lookup("CART_STORAGE_KEY")
                .filter(|key| !key.is_empty())
                .unwrap_or(defaults.cart_key),
            catalog_seed_path: lookup("CATALOG_SEED_PATH").map(PathBuf::from),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            storage: StorageBackend::Memory,
            storage_path: PathBuf::from("cart.json"),
            database_url: None,
            cart_key: DEFAULT_CART_KEY.to_string(),
            catalog_seed_path: None,
        }
    }
}
