//! Error types for stock chart visualization

use thiserror::Error;

/// Result type alias for visualization operations
pub type Result<T> = std::result::Result<T, VisualizationError>;

/// Errors that can occur during visualization
#[derive(Error, Debug)]
pub enum VisualizationError {
    #[error("Invalid data format: {message}")]
    InvalidData { message: String },

    #[error("Chart rendering failed: {message}")]
    RenderingError { message: String },

    #[error("File I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Layout calculation error: {message}")]
    LayoutError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Any failed, non-2xx or empty dataset fetch
    #[error("Failed to load data: {message}")]
    Fetch { message: String },

    #[error("No chart to render: {message}")]
    NoChart { message: String },
}

impl VisualizationError {
    pub fn fetch(message: impl Into<String>) -> Self {
        VisualizationError::Fetch {
            message: message.into(),
        }
    }
}

impl<T: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<T>>
    for VisualizationError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        VisualizationError::RenderingError {
            message: format!("Drawing area error: {}", err),
        }
    }
}

impl From<reqwest::Error> for VisualizationError {
    fn from(err: reqwest::Error) -> Self {
        VisualizationError::fetch(err.to_string())
    }
}

impl From<stockchart::DataError> for VisualizationError {
    fn from(err: stockchart::DataError) -> Self {
        VisualizationError::fetch(err.to_string())
    }
}
