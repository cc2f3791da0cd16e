use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";

pub const STORE_URI_VAR: &str = "MONGO_URI";
pub const PORT_VAR: &str = "PORT";
pub const STATIC_DIR_VAR: &str = "STATIC_DIR";

/// Startup configuration failures. Always fatal.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not defined in the environment variables")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub store_uri: String,
    pub port: u16,
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Reads configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store_uri = lookup(STORE_URI_VAR).ok_or(ConfigError::MissingVar(STORE_URI_VAR))?;

        let port = match lookup(PORT_VAR) {
            Some(port_str) => match port_str.parse::<u16>() {
                Ok(port_num) => {
                    info!("Using port {} from environment variable PORT.", port_num);
                    port_num
                }
                Err(_) => {
                    warn!(
                        "Invalid PORT value '{}' in environment variable. Using default port {}.",
                        port_str, DEFAULT_PORT
                    );
                    DEFAULT_PORT
                }
            },
            None => {
                info!(
                    "PORT environment variable not set. Using default port {}.",
                    DEFAULT_PORT
                );
                DEFAULT_PORT
            }
        };

        let static_dir = lookup(STATIC_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        Ok(Self {
            store_uri,
            port,
            static_dir,
        })
    }
}
