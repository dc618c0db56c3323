use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::server::app::AppState;
use crate::services::summary_service::{self, DatasetSummary};
use crate::transformations::GenderCounts;

/// Death statistics; 500 when the table lacks `Morreu` or `Death_Year`
pub async fn get_statistics(State(state): State<AppState>) -> Response {
    let stats = state.dataset.statistics();
    let status = if stats.is_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(stats)).into_response()
}

pub async fn get_gender_count(State(state): State<AppState>) -> Json<GenderCounts> {
    Json(state.dataset.gender_counts().clone())
}

pub async fn get_summary(State(state): State<AppState>) -> Json<DatasetSummary> {
    Json(summary_service::summarize(&state.dataset))
}
