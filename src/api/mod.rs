//! HTTP API: the dataset endpoint plus static file hosting

pub mod handlers;
pub mod models;

use axum::routing::get;
use axum::{Json, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::ServerConfig;
use crate::csv_loader::StockCsvReader;

/// Route serving the dataset
pub const STOCK_DATA_PATH: &str = "/api/stock-data";

/// Legacy route kept for clients of the single-ticker dashboard
pub const LEGACY_DATA_PATH: &str = "/api/tesla-data";

/// Shared, read-only handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub reader: StockCsvReader,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            data_path: config.data_path.clone(),
            reader: StockCsvReader::with_volume_column(config.volume_column),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::stock_data::get_stock_data),
    components(schemas(crate::types::StockRecord, models::ErrorResponse)),
    tags((name = "Stock Data", description = "Historical daily OHLCV records"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router for `config`
pub fn router(config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::from_config(config));
    let static_files = ServeDir::new(&config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route(STOCK_DATA_PATH, get(handlers::get_stock_data))
        .route(LEGACY_DATA_PATH, get(handlers::get_stock_data))
        .route("/api/openapi.json", get(openapi_json))
        .route("/health", get(handlers::health))
        .with_state(state)
        .fallback_service(static_files)
        .layer(ConcurrencyLimitLayer::new(config.max_concurrent_requests.max(1)))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
