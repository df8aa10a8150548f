//! Server configuration
//!
//! Loaded from environment variables (with `.env` support via dotenvy in
//! main). Every field has a default so the server can boot with no
//! configuration at all.

use std::path::PathBuf;

/// Default HTTP port
const DEFAULT_PORT: u16 = 4000;

/// Default request body cap: 10MB
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

/// Filesystem storage locations
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding signable source documents
    pub documents_dir: PathBuf,
    /// Directory signed artifacts are written to
    pub artifacts_dir: PathBuf,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: DEFAULT_PORT,
                max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            },
            storage: StorageConfig {
                documents_dir: PathBuf::from("data/documents"),
                artifacts_dir: PathBuf::from("data/signed"),
            },
            database: DatabaseConfig {
                url: "sqlite://data/signet.db".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        let port = match std::env::var("SIGNET_PORT") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.server.port,
        };

        let max_body_bytes = match std::env::var("SIGNET_MAX_BODY_BYTES") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.server.max_body_bytes,
        };

        let documents_dir = std::env::var("SIGNET_DOCUMENTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.documents_dir);

        let artifacts_dir = std::env::var("SIGNET_ARTIFACTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage.artifacts_dir);

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.database.url);

        Ok(Self {
            server: ServerConfig {
                port,
                max_body_bytes,
            },
            storage: StorageConfig {
                documents_dir,
                artifacts_dir,
            },
            database: DatabaseConfig { url },
        })
    }
}
