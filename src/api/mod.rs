pub mod handlers;
pub mod models;
pub mod router;

use crate::catalog::Catalog;
use crate::config::Config;
use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct ApiServer {
    catalog: Arc<Catalog>,
}

impl ApiServer {
    /// Wraps the catalog in an Arc for shared handler access.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Binds the server to the configured port and serves until Ctrl+C.
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        // the Prometheus recorder is process-global, so it is installed here once
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        let app = router::build(Arc::clone(&self.catalog))
            .route("/metrics", get(move || async move { metric_handle.render() }))
            .layer(prometheus_layer);
        let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));

        tracing::info!("API server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}
