//! Static export of a scene through plotters backends

use crate::errors::Result;
use crate::layouts::{ChartLayout, PanelRect};
use crate::scene::{Point, Scene, Tick};
use crate::styles::ChartStyle;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const TICK_LENGTH: i32 = 6;
const LABEL_GAP: i32 = 3;

/// Anything that can write a scene to a file
pub trait ChartExporter {
    fn export(&self, scene: &Scene, path: &Path) -> Result<()>;
}

/// Draw `scene` onto `root`, which must span the layout's full image size
pub fn draw_scene<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    scene: &Scene,
    layout: &ChartLayout,
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let colors = &style.colors;
    root.fill(&colors.background)?;

    let price = layout.price_area();
    let volume = layout.volume_area();

    if scene.area.len() >= 3 {
        let polygon = to_pixels(&price, &scene.area);
        root.draw(&Polygon::new(polygon, style.area_fill().filled()))?;
    }
    if scene.price_line.len() >= 2 {
        let line = to_pixels(&price, &scene.price_line);
        root.draw(&PathElement::new(line, colors.line.stroke_width(style.line_width)))?;
    }
    for marker in scene.markers.values() {
        root.draw(&Circle::new(
            pixel(&price, (marker.cx, marker.cy)),
            style.marker_radius,
            colors.line.filled(),
        ))?;
    }
    for bar in scene.volume_bars.values() {
        let corners = [
            pixel(&volume, (bar.x, bar.y)),
            pixel(&volume, (bar.x + bar.width, bar.y + bar.height)),
        ];
        root.draw(&Rectangle::new(corners, colors.direction(bar.direction).filled()))?;
    }

    draw_x_axis(root, &price, &scene.axes.price_x, style)?;
    draw_y_axis(root, &price, &scene.axes.price_y, style)?;
    draw_x_axis(root, &volume, &scene.axes.volume_x, style)?;
    draw_y_axis(root, &volume, &scene.axes.volume_y, style)?;
    Ok(())
}

fn pixel(panel: &PanelRect, (x, y): Point) -> (i32, i32) {
    (
        (panel.left + x).round() as i32,
        (panel.top + y).round() as i32,
    )
}

fn to_pixels(panel: &PanelRect, points: &[Point]) -> Vec<(i32, i32)> {
    points.iter().map(|p| pixel(panel, *p)).collect()
}

fn draw_x_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: &PanelRect,
    ticks: &[Tick],
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let axis = style.colors.axis.stroke_width(1);
    let (left, bottom) = pixel(panel, (0.0, panel.height));
    let right = pixel(panel, (panel.width, panel.height)).0;
    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], axis))?;

    let font = ("sans-serif", style.font_size as f64)
        .into_font()
        .color(&style.colors.text)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for tick in ticks {
        let x = pixel(panel, (tick.position, panel.height)).0;
        root.draw(&PathElement::new(vec![(x, bottom), (x, bottom + TICK_LENGTH)], axis))?;
        root.draw(&Text::new(
            tick.label.clone(),
            (x, bottom + TICK_LENGTH + LABEL_GAP),
            font.clone(),
        ))?;
    }
    Ok(())
}

fn draw_y_axis<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    panel: &PanelRect,
    ticks: &[Tick],
    style: &ChartStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let axis = style.colors.axis.stroke_width(1);
    let (left, top) = pixel(panel, (0.0, 0.0));
    let bottom = pixel(panel, (0.0, panel.height)).1;
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], axis))?;

    let font = ("sans-serif", style.font_size as f64)
        .into_font()
        .color(&style.colors.text)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for tick in ticks {
        let y = pixel(panel, (0.0, tick.position)).1;
        root.draw(&PathElement::new(vec![(left - TICK_LENGTH, y), (left, y)], axis))?;
        root.draw(&Text::new(
            tick.label.clone(),
            (left - TICK_LENGTH - LABEL_GAP, y),
            font.clone(),
        ))?;
    }
    Ok(())
}

/// SVG export, to a file or an in-memory string
#[derive(Debug, Clone)]
pub struct SvgExporter {
    layout: ChartLayout,
    style: ChartStyle,
}

impl SvgExporter {
    pub fn new(layout: ChartLayout, style: ChartStyle) -> Self {
        Self { layout, style }
    }

    pub fn render_to_string(&self, scene: &Scene) -> Result<String> {
        self.layout.validate()?;
        let mut svg = String::new();
        {
            let size = (self.layout.width, self.layout.total_height());
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            draw_scene(&root, scene, &self.layout, &self.style)?;
            root.present()?;
        }
        Ok(svg)
    }
}

impl ChartExporter for SvgExporter {
    fn export(&self, scene: &Scene, path: &Path) -> Result<()> {
        let svg = self.render_to_string(scene)?;
        std::fs::write(path, svg)?;
        tracing::info!(path = %path.display(), "chart exported as SVG");
        Ok(())
    }
}

/// PNG export through the bitmap backend
#[derive(Debug, Clone)]
pub struct PngExporter {
    layout: ChartLayout,
    style: ChartStyle,
}

impl PngExporter {
    pub fn new(layout: ChartLayout, style: ChartStyle) -> Self {
        Self { layout, style }
    }
}

impl ChartExporter for PngExporter {
    #[cfg(feature = "png_export")]
    fn export(&self, scene: &Scene, path: &Path) -> Result<()> {
        self.layout.validate()?;
        let size = (self.layout.width, self.layout.total_height());
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_scene(&root, scene, &self.layout, &self.style)?;
        root.present()?;
        tracing::info!(path = %path.display(), "chart exported as PNG");
        Ok(())
    }

    #[cfg(not(feature = "png_export"))]
    fn export(&self, _scene: &Scene, path: &Path) -> Result<()> {
        Err(crate::errors::VisualizationError::ConfigError {
            message: format!(
                "cannot write {}: built without the png_export feature",
                path.display()
            ),
        })
    }
}
