use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::DatasetError;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::services::record_query_service::{RecordFilter, RecordQueryResult};

#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    /// Comma-separated gender labels
    pub gender: Option<String>,
    pub status: Option<String>,
    pub nobility: Option<String>,
    /// Comma-separated column names
    pub columns: Option<String>,
    pub limit: Option<usize>,
}

impl RecordsQuery {
    pub fn into_filter(self) -> Result<RecordFilter, DatasetError> {
        Ok(RecordFilter {
            genders: self
                .gender
                .as_deref()
                .map(RecordFilter::parse_list)
                .unwrap_or_default(),
            status: self.status.as_deref().unwrap_or_default().parse()?,
            nobility: self.nobility.as_deref().unwrap_or_default().parse()?,
            columns: self
                .columns
                .as_deref()
                .map(RecordFilter::parse_list)
                .unwrap_or_default(),
            limit: self.limit,
        })
    }
}

/// One row by its `ID`.
///
/// Unknown IDs get 404. The path must be a non-negative integer; anything
/// else, `-1` included, is rejected with 400 by the `Path` extractor.
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    let not_found = || ApiError::not_found(format!("ID {} not found", id));

    let id = i64::try_from(id).map_err(|_| not_found())?;
    let row = state.dataset.record(id)?.ok_or_else(not_found)?;

    debug!("Record {} served", id);
    Ok(Json(json!({
        "status": "success",
        "data": row,
    })))
}

pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<RecordQueryResult>, ApiError> {
    let filter = query.into_filter()?;
    let result = filter
        .query(state.dataset.table())
        .map_err(|err| match err {
            DatasetError::MissingColumn(column) => {
                ApiError::bad_request(format!("Unknown column: {}", column))
            }
            other => other.into(),
        })?;

    Ok(Json(result))
}
