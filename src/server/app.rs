use anyhow::{Context, Result};
use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{health, records, statistics};
use crate::services::Dataset;

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

pub fn create_app(dataset: Arc<Dataset>, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { dataset };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(statistics::get_statistics))
        .route("/gender_count", get(statistics::get_gender_count))
        .route("/summary", get(statistics::get_summary))
        .route("/record/:id", get(records::get_record))
        .route("/records", get(records::list_records))
}
