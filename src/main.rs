mod api;
mod catalog;
mod config;
mod errors;
mod models;
mod store;

use anyhow::Context;
use api::ApiServer;
use catalog::Catalog;
use config::{Config, LogFormat, StoreBackend};
use std::sync::Arc;
use store::{CatalogStore, MemoryStore, MongoStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    tracing::info!(
        "Movie ratings starting — {:?} store, port {}",
        config.store_backend,
        config.api_port
    );

    let store: Arc<dyn CatalogStore> = match config.store_backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&config.mongo_uri, &config.mongo_db).await?;
            store.ensure_indexes().await;
            Arc::new(store)
        }
        StoreBackend::Memory => match &config.seed_file {
            Some(path) => Arc::new(
                MemoryStore::from_seed_file(path)
                    .await
                    .with_context(|| format!("loading seed file {}", path.display()))?,
            ),
            None => {
                tracing::warn!("Memory store started empty, set SEED_FILE to preload it");
                Arc::new(MemoryStore::new())
            }
        },
    };

    let catalog = Catalog::new(store, config.request_timeout, config.update_attempts);
    ApiServer::new(catalog).run(&config).await
}
