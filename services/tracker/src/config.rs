//! Service configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by the binary) layered over built-in defaults.
//!
//! # Environment Variables
//! - `DATABASE_URL`: PostgreSQL URL, or `memory://` for the in-process store (default: `memory://`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 5)
//! - `PORT`: listen port (default: 3000)
//! - `BIND_ADDRESS`: listen address (default: `0.0.0.0`)
//! - `PUBLIC_DIR`: static assets directory (default: `public`)
//! - `INDEX_FILE`: landing page (default: `views/index.html`)

use std::path::PathBuf;

use common::database::DatabaseConfig;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "memory://";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_INDEX_FILE: &str = "views/index.html";

/// Tracker service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub port: u16,
    pub bind_address: String,
    pub public_dir: PathBuf,
    pub index_file: PathBuf,
}

impl AppConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("database_max_connections", i64::from(DEFAULT_MAX_CONNECTIONS))?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("public_dir", DEFAULT_PUBLIC_DIR)?
            .set_default("index_file", DEFAULT_INDEX_FILE)?
            .add_source(Environment::default())
            .build()?
            .try_deserialize()
    }

    /// Database settings for the store
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone(), self.database_max_connections)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            port: DEFAULT_PORT,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
            index_file: PathBuf::from(DEFAULT_INDEX_FILE),
        }
    }
}
