use serde::{Deserialize, Serialize};
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    /// Only required when the MongoDB backend is selected.
    pub uri: Option<String>,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

impl LedgerConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongodb"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let uri = match backend {
            StoreBackend::MongoDb => Some(get_env("MONGODB_URI", None, is_prod)?),
            StoreBackend::Memory => env::var("MONGODB_URI").ok(),
        };

        Ok(LedgerConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri,
                database: get_env("MONGODB_DATABASE", Some("rent_softs"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("rent"), is_prod)?,
            },
            store: StoreConfig { backend },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.is_empty()),
        })
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}
