//! Stock dataset handlers

use axum::extract::State;
use axum::response::Json;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    api::{models::ApiError, AppState},
    types::StockRecord,
};

/// Full dataset, in source-file order.
///
/// The file is read on every request; nothing is cached between requests.
#[utoipa::path(
    get,
    path = "/api/stock-data",
    responses(
        (status = 200, description = "Every usable record in the dataset", body = [StockRecord]),
        (status = 500, description = "Dataset missing, unreadable or malformed", body = crate::api::models::ErrorResponse)
    ),
    tag = "Stock Data"
)]
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn get_stock_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StockRecord>>, ApiError> {
    let start_time = Instant::now();

    let records = state.reader.read_records_async(&state.data_path).await?;

    tracing::info!(
        records = records.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "served stock data"
    );
    Ok(Json(records))
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
