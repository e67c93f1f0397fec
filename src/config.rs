use anyhow::{bail, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    pub store_backend: StoreBackend,
    pub mongo_uri: String,
    pub mongo_db: String,
    pub request_timeout: Duration,
    pub update_attempts: u32,
    pub seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads `.env` (if present) and then the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_port = var("API_PORT", "8080")
            .parse::<u16>()
            .context("API_PORT must be a valid port number (1-65535)")?;

        let store_backend = match var("STORE_BACKEND", "mongo").trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            other => bail!("STORE_BACKEND must be 'mongo' or 'memory', got {other:?}"),
        };

        let request_timeout = var("REQUEST_TIMEOUT_MS", "5000")
            .parse::<u64>()
            .map(Duration::from_millis)
            .context("REQUEST_TIMEOUT_MS must be a number of milliseconds")?;

        let update_attempts = var("UPDATE_ATTEMPTS", "3")
            .parse::<u32>()
            .context("UPDATE_ATTEMPTS must be a positive integer")?;
        if update_attempts == 0 {
            bail!("UPDATE_ATTEMPTS must be at least 1");
        }

        let log_format = match var("LOG_FORMAT", "text").trim().to_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => bail!("LOG_FORMAT must be 'text' or 'json', got {other:?}"),
        };

        Ok(Self {
            api_port,
            store_backend,
            mongo_uri: var("MONGO_URI", "mongodb://localhost:27017"),
            mongo_db: var("MONGO_DB", "Movies"),
            request_timeout,
            update_attempts,
            seed_file: lookup("SEED_FILE").map(PathBuf::from),
            log_format,
        })
    }
}
