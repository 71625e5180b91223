pub mod api; // HTTP boundary
pub mod config;
pub mod hl7; // ORU parsing
pub mod intelligence; // Metric lookup, range evaluation, risk, aggregation
pub mod models;
pub mod provider; // Reference-range sources

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::api::{start_server, ApiContext};
use crate::config::AppConfig;
use crate::intelligence::MetricStore;
use crate::provider::CsvMetricProvider;

/// Service entry point: load configuration and the metric table, serve until
/// Ctrl-C, then drain.
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = AppConfig::from_env().context("invalid configuration")?;

    let provider = CsvMetricProvider::new(&app_config.metrics_csv);
    let store = MetricStore::load(&provider).with_context(|| {
        format!(
            "failed to load metrics from {}",
            provider.path().display()
        )
    })?;

    let ctx = ApiContext::new(Arc::new(store), app_config.health_assessment);
    let server = start_server(ctx, &app_config)
        .await
        .with_context(|| format!("failed to bind {}", app_config.socket_addr()))?;

    tracing::info!(addr = %server.addr, "Listening");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    server.stop().await;
    Ok(())
}
