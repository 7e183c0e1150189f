//! Stock Chart Visualization Library
//!
//! Renders daily price/volume data as a two-panel chart: a close-price line
//! with area fill and hover markers on top, direction-colored volume bars
//! below.
//!
//! # Architecture
//!
//! Rendering is declarative. A [`ChartController`] owns an explicit
//! [`ViewState`] (dataset, time range, zoom, layout); every interaction
//! updates it, recomputes a [`Scene`] and reconciles the retained scene with
//! a keyed diff.
//!
//! - `source`: where records come from (HTTP API or CSV file)
//! - `data`: the retained, date-sorted dataset
//! - `filter`: time-range windows
//! - `scales` / `layouts`: data-to-pixel mapping and panel geometry
//! - `scene` / `reconcile`: drawable elements and keyed diffing
//! - `state`: view state and the chart lifecycle
//! - `interactive`: zoom transform and resize debouncing
//! - `summary` / `format`: summary panel figures and display formatting
//! - `styles`: color schemes
//! - `export`: static SVG/PNG export

pub mod data;
pub mod errors;
pub mod export;
pub mod filter;
pub mod format;
pub mod interactive;
pub mod layouts;
pub mod reconcile;
pub mod scales;
pub mod scene;
pub mod source;
pub mod state;
pub mod styles;
pub mod summary;

// Re-export key types for convenience
pub use data::ChartData;
pub use errors::{Result, VisualizationError};
pub use export::{ChartExporter, PngExporter, SvgExporter};
pub use filter::TimeRange;
pub use interactive::{Debouncer, ZoomGesture, ZoomTransform};
pub use layouts::{ChartLayout, Margins};
pub use reconcile::SceneDiff;
pub use scene::{ElementKey, Scene, Tooltip};
pub use source::{DataSource, FileSource, HttpSource};
pub use state::{ChartController, ChartEvent, Phase, ViewState};
pub use styles::{ChartStyle, ColorScheme};
pub use summary::{Sign, Summary};

/// Version of the visualization library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default container width
pub const DEFAULT_WIDTH: u32 = 1200;
/// Default image height for both panels with margins
pub const DEFAULT_HEIGHT: u32 = 590;
