//! Chart layout: panel sizes and margins for the price and volume panels

use crate::errors::{Result, VisualizationError};
use serde::{Deserialize, Serialize};

/// Chart layout configuration and calculations.
///
/// The chart is two panels stacked vertically, each with its own margins,
/// sharing one horizontal extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    /// Container width in pixels, margins included
    pub width: u32,
    /// Price panel height in pixels, margins included
    pub price_height: u32,
    /// Volume panel plot height in pixels, margins excluded
    pub volume_height: u32,
    /// Margins applied around each panel's plot area
    pub margins: Margins,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: crate::DEFAULT_WIDTH,
            price_height: 400,
            volume_height: 100,
            margins: Margins::default(),
        }
    }
}

/// Plot rectangle in image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelRect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

impl ChartLayout {
    /// Same layout at a new container width
    pub fn resized(&self, width: u32) -> Self {
        Self { width, ..*self }
    }

    /// Plot width shared by both panels
    pub fn inner_width(&self) -> f64 {
        self.width.saturating_sub(self.margins.left + self.margins.right) as f64
    }

    /// Plot height of the price panel
    pub fn price_inner_height(&self) -> f64 {
        self.price_height
            .saturating_sub(self.margins.top + self.margins.bottom) as f64
    }

    pub fn volume_inner_height(&self) -> f64 {
        self.volume_height as f64
    }

    /// Price plot area in image coordinates
    pub fn price_area(&self) -> PanelRect {
        PanelRect {
            left: self.margins.left as f64,
            top: self.margins.top as f64,
            width: self.inner_width(),
            height: self.price_inner_height(),
        }
    }

    /// Volume plot area in image coordinates, below the price panel
    pub fn volume_area(&self) -> PanelRect {
        PanelRect {
            left: self.margins.left as f64,
            top: (self.price_height + self.margins.top) as f64,
            width: self.inner_width(),
            height: self.volume_inner_height(),
        }
    }

    /// Full image height for both panels
    pub fn total_height(&self) -> u32 {
        self.price_height + self.volume_height + self.margins.top + self.margins.bottom
    }

    /// Reject layouts with no room to plot
    pub fn validate(&self) -> Result<()> {
        if self.inner_width() <= 0.0 || self.price_inner_height() <= 0.0 || self.volume_height == 0 {
            return Err(VisualizationError::LayoutError {
                message: format!(
                    "no plot area left in {}x{} after margins",
                    self.width,
                    self.total_height()
                ),
            });
        }
        Ok(())
    }
}

/// Margin configuration for chart layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 100,  // Space for currency labels
            right: 70,
            top: 30,
            bottom: 60, // Space for date labels
        }
    }
}
