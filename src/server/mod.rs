pub mod app;
pub mod error;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::services::DatasetCache;

/// Load and normalize the dataset, then serve it until the process stops.
///
/// The dataset is ready before the listener binds, so a bad source file stops
/// startup instead of failing requests.
pub async fn start_server(config: &AppConfig) -> Result<()> {
    let cache = DatasetCache::new(config.delimiter_byte()?);
    let dataset = cache.get_or_load(&config.data_path)?;
    info!(
        "Dataset ready from {}: {} characters, {} deaths",
        dataset.source(),
        dataset.len(),
        dataset.count_deaths()
    );

    let app = app::create_app(dataset, config.cors_origin.as_deref())?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api/statistics             - Death year statistics");
    info!("  /api/gender_count           - Characters per gender");
    info!("  /api/summary                - Headline metrics");
    info!("  /api/record/:id             - Single record by ID");
    info!("  /api/records                - Filtered records (gender, status, nobility, columns, limit)");
}
