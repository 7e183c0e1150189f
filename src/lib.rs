//! # Stockchart
//!
//! Serves a daily stock price CSV over HTTP as JSON, for the chart renderer in
//! `stockchart-visualization`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stockchart::StockCsvReader;
//!
//! // Volume falls back to column 5 when the header names are not recognised
//! let reader = StockCsvReader::new();
//! let records = reader.read_records("public/data/TESLA.csv").unwrap();
//!
//! for record in &records {
//!     println!("{}: O={} H={} L={} C={} V={}",
//!              record.date, record.open, record.high, record.low, record.close, record.volume);
//! }
//! ```
//!
//! ## Loading rules
//!
//! 1. **Header resolution**: `Date/Open/High/Low/Close/Volume` are located by name,
//!    so an extra `Adj Close` column is tolerated
//! 2. **Row exclusion**: rows with a non-numeric price or volume are skipped
//! 3. **Hard failures**: unreadable files, ragged rows and invalid dates fail the
//!    whole load, as does a file with no usable rows
//!
//! ## Features
//!
//! - `api` (default): axum router for `GET /api/stock-data`, static file hosting,
//!   and the `stockchart-server` binary

pub mod config;
pub mod csv_loader;
pub mod errors;
pub mod types;

#[cfg(feature = "api")]
pub mod api;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use csv_loader::{ColumnLayout, StockCsvReader};
pub use errors::DataError;
pub use types::{Direction, StockRecord};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`.
#[cfg(feature = "api")]
pub fn init_tracing(json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
