//! Visual styling and color schemes for stock charts

use crate::errors::VisualizationError;
use plotters::style::RGBColor;
use std::str::FromStr;
use stockchart::Direction;

/// Color scheme for the price and volume panels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScheme {
    /// Volume bars and summary values for a rising close
    pub positive: RGBColor,
    /// Volume bars and summary values for a falling close
    pub negative: RGBColor,
    /// Price line and markers
    pub line: RGBColor,
    /// Fill beneath the price line
    pub area: RGBColor,
    /// Background color
    pub background: RGBColor,
    /// Axis lines and ticks
    pub axis: RGBColor,
    /// Text color
    pub text: RGBColor,
}

impl ColorScheme {
    /// Light dashboard theme
    pub fn light() -> Self {
        Self {
            positive: RGBColor(38, 166, 91),   // Green
            negative: RGBColor(231, 76, 60),   // Red
            line: RGBColor(41, 128, 185),      // Belize Blue
            area: RGBColor(174, 214, 241),     // Pale Blue
            background: RGBColor(255, 255, 255),
            axis: RGBColor(149, 165, 166),     // Concrete
            text: RGBColor(44, 62, 80),        // Midnight Blue
        }
    }

    /// Dark theme color scheme
    pub fn dark() -> Self {
        Self {
            positive: RGBColor(0, 200, 83),    // Bright Green
            negative: RGBColor(255, 77, 77),   // Bright Red
            line: RGBColor(79, 195, 247),      // Sky Blue
            area: RGBColor(33, 70, 99),        // Deep Blue
            background: RGBColor(21, 23, 25),  // Very Dark Gray
            axis: RGBColor(64, 68, 75),        // Dark Gray
            text: RGBColor(208, 210, 214),     // Light Gray
        }
    }

    pub fn direction(&self, direction: Direction) -> RGBColor {
        match direction {
            Direction::Up => self.positive,
            Direction::Down => self.negative,
        }
    }
}

impl FromStr for ColorScheme {
    type Err = VisualizationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::light()),
            "dark" => Ok(Self::dark()),
            other => Err(VisualizationError::ConfigError {
                message: format!("unknown theme {other:?}, expected light or dark"),
            }),
        }
    }
}

/// Visual styling configuration for the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub colors: ColorScheme,
    /// Price line width in pixels
    pub line_width: u32,
    /// Marker radius in pixels
    pub marker_radius: u32,
    /// Opacity of the area fill (0.0 to 1.0)
    pub area_opacity: f64,
    /// Volume bar width relative to the per-record slot (0.1 to 1.0)
    pub bar_width_ratio: f64,
    /// Font size for labels
    pub font_size: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            colors: ColorScheme::light(),
            line_width: 2,
            marker_radius: 3,
            area_opacity: 0.6,
            bar_width_ratio: 0.8,
            font_size: 12,
        }
    }
}

impl ChartStyle {
    pub fn with_colors(colors: ColorScheme) -> Self {
        Self {
            colors,
            ..Self::default()
        }
    }

    /// Area fill pre-blended with the background
    pub fn area_fill(&self) -> RGBColor {
        self.apply_opacity(self.colors.area, self.area_opacity)
    }

    /// Alpha blend with the background
    fn apply_opacity(&self, color: RGBColor, opacity: f64) -> RGBColor {
        let opacity = opacity.clamp(0.0, 1.0);
        let bg = self.colors.background;

        let r = (color.0 as f64 * opacity + bg.0 as f64 * (1.0 - opacity)) as u8;
        let g = (color.1 as f64 * opacity + bg.1 as f64 * (1.0 - opacity)) as u8;
        let b = (color.2 as f64 * opacity + bg.2 as f64 * (1.0 - opacity)) as u8;

        RGBColor(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_colors() {
        let colors = ColorScheme::light();
        assert_eq!(colors.direction(Direction::Up), colors.positive);
        assert_eq!(colors.direction(Direction::Down), colors.negative);
    }

    #[test]
    fn test_theme_names() {
        assert_eq!("Dark".parse::<ColorScheme>().unwrap(), ColorScheme::dark());
        assert!("neon".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn test_area_fill_blends_toward_background() {
        let mut style = ChartStyle::default();
        style.area_opacity = 0.0;
        assert_eq!(style.area_fill(), style.colors.background);
        style.area_opacity = 1.0;
        assert_eq!(style.area_fill(), style.colors.area);
    }
}
