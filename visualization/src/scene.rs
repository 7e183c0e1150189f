//! Declarative scene: every drawable element computed from a [`ViewState`]
//!
//! Coordinates are panel-local: `(0, 0)` is the top-left corner of the
//! panel's plot area. Price elements live in the price panel, volume bars in
//! the volume panel.

use crate::format;
use crate::scales::{tick_step, Domains, LinearScale, TimeScale};
use crate::state::ViewState;
use crate::styles::ChartStyle;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use stockchart::{Direction, StockRecord};

/// Pixel position inside a panel
pub type Point = (f64, f64);

/// Identity of a per-record element across renders.
///
/// `seq` separates records sharing a date, counted in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementKey {
    pub date: NaiveDate,
    pub seq: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// `January 05, 2024`
    pub title: String,
    pub lines: Vec<(&'static str, String)>,
}

impl Tooltip {
    fn for_record(record: &StockRecord) -> Self {
        Self {
            title: record.date.format("%B %d, %Y").to_string(),
            lines: vec![
                ("Open", format::currency(record.open)),
                ("High", format::currency(record.high)),
                ("Low", format::currency(record.low)),
                ("Close", format::currency(record.close)),
                ("Volume", format::thousands(record.volume)),
            ],
        }
    }
}

/// Close-price marker on the price line
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub cx: f64,
    pub cy: f64,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// Tick sets of the four axes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes {
    /// Zoomed time axis under the price panel
    pub price_x: Vec<Tick>,
    pub price_y: Vec<Tick>,
    /// Unzoomed time axis under the volume panel
    pub volume_x: Vec<Tick>,
    pub volume_y: Vec<Tick>,
}

/// Everything drawn for one view state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Close-price polyline, clipped to the plot width
    pub price_line: Vec<Point>,
    /// Closed polygon between the price line and the panel bottom
    pub area: Vec<Point>,
    pub markers: BTreeMap<ElementKey, Marker>,
    pub volume_bars: BTreeMap<ElementKey, VolumeBar>,
    pub axes: Axes,
}

impl Scene {
    /// Compute the scene for the visible records of `state`.
    ///
    /// An empty visible subset yields an empty scene.
    pub fn compute(state: &ViewState, style: &ChartStyle) -> Self {
        let visible = state.visible();
        let Some(domains) = Domains::from_records(visible) else {
            return Self::default();
        };

        let layout = state.layout();
        let width = layout.inner_width();
        let price_height = layout.price_inner_height();
        let volume_height = layout.volume_inner_height();

        let x = TimeScale::new(domains.time, (0.0, width));
        let zoom = state.zoom();
        let zoomed_x = x.rescaled(zoom.k, zoom.x);
        let y = LinearScale::new(domains.price, (price_height, 0.0));
        let volume_y = LinearScale::new(domains.volume, (volume_height, 0.0));

        let keys = element_keys(visible);

        let points: Vec<Point> = visible
            .iter()
            .map(|r| (zoomed_x.apply(r.date), y.apply(r.close)))
            .collect();
        let price_line = clip_polyline(&points, 0.0, width);
        let area = area_polygon(&price_line, price_height);

        let markers = keys
            .iter()
            .zip(visible)
            .zip(&points)
            .filter(|(_, (cx, _))| (0.0..=width).contains(cx))
            .map(|((key, record), &(cx, cy))| {
                let tooltip = Tooltip::for_record(record);
                (*key, Marker { cx, cy, tooltip })
            })
            .collect();

        let slot = width / visible.len() as f64;
        let bar_width = slot * style.bar_width_ratio.clamp(0.1, 1.0);
        let data = state.data();
        let volume_bars = keys
            .iter()
            .zip(visible)
            .enumerate()
            .map(|(i, (key, record))| {
                let top = volume_y.apply(record.volume as f64);
                let bar = VolumeBar {
                    x: x.apply(record.date) - bar_width / 2.0,
                    y: top,
                    width: bar_width,
                    height: volume_height - top,
                    direction: data.direction_at(state.window_start() + i),
                };
                (*key, bar)
            })
            .collect();

        let x_ticks = (width / 120.0).max(2.0) as usize;
        let axes = Axes {
            price_x: time_ticks(&zoomed_x, x_ticks, width),
            price_y: price_ticks(&y, 5),
            volume_x: time_ticks(&x, x_ticks, width),
            volume_y: volume_y
                .ticks(3)
                .into_iter()
                .map(|v| Tick {
                    position: volume_y.apply(v),
                    label: format::si(v),
                })
                .collect(),
        };

        Self {
            price_line,
            area,
            markers,
            volume_bars,
            axes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.price_line.is_empty() && self.markers.is_empty() && self.volume_bars.is_empty()
    }

    /// Nearest marker within `radius` pixels of a price-panel position
    pub fn marker_at(&self, x: f64, y: f64, radius: f64) -> Option<(&ElementKey, &Marker)> {
        self.markers
            .iter()
            .map(|(key, marker)| (key, marker, (marker.cx - x).hypot(marker.cy - y)))
            .filter(|(_, _, distance)| *distance <= radius)
            .min_by(|a, b| a.2.total_cmp(&b.2))
            .map(|(key, marker, _)| (key, marker))
    }
}

fn element_keys(records: &[StockRecord]) -> Vec<ElementKey> {
    let mut keys: Vec<ElementKey> = Vec::with_capacity(records.len());
    for record in records {
        let seq = match keys.last() {
            Some(prev) if prev.date == record.date => prev.seq + 1,
            _ => 0,
        };
        keys.push(ElementKey {
            date: record.date,
            seq,
        });
    }
    keys
}

fn time_ticks(scale: &TimeScale, count: usize, width: f64) -> Vec<Tick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|(date, label)| Tick {
            position: scale.apply(date),
            label,
        })
        .filter(|tick| (0.0..=width).contains(&tick.position))
        .collect()
}

fn price_ticks(scale: &LinearScale, count: usize) -> Vec<Tick> {
    let (lo, hi) = scale.domain();
    let decimals = if tick_step(lo, hi, count) >= 1.0 { 0 } else { 2 };
    scale
        .ticks(count)
        .into_iter()
        .map(|v| Tick {
            position: scale.apply(v),
            label: format::currency_with(v, decimals),
        })
        .collect()
}

/// Clip a polyline with ascending x to `lo..=hi`, interpolating at the edges
pub fn clip_polyline(points: &[Point], lo: f64, hi: f64) -> Vec<Point> {
    if let [only] = points {
        return if (lo..=hi).contains(&only.0) {
            vec![*only]
        } else {
            Vec::new()
        };
    }

    let mut out: Vec<Point> = Vec::new();
    for segment in points.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let dx = b.0 - a.0;
        let (mut t0, mut t1) = (0.0, 1.0);
        if dx == 0.0 {
            if !(lo..=hi).contains(&a.0) {
                continue;
            }
        } else {
            let (enter, exit) = {
                let ta = (lo - a.0) / dx;
                let tb = (hi - a.0) / dx;
                if dx > 0.0 { (ta, tb) } else { (tb, ta) }
            };
            t0 = f64::max(t0, enter);
            t1 = f64::min(t1, exit);
            if t0 > t1 {
                continue;
            }
        }

        let start = point_at(a, b, t0);
        let end = point_at(a, b, t1);
        for point in [start, end] {
            if out.last() != Some(&point) {
                out.push(point);
            }
        }
    }
    out
}

fn point_at(a: Point, b: Point, t: f64) -> Point {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t)
    }
}

/// Close `line` down to `baseline`
fn area_polygon(line: &[Point], baseline: f64) -> Vec<Point> {
    let (Some(first), Some(last)) = (line.first(), line.last()) else {
        return Vec::new();
    };
    let mut polygon = Vec::with_capacity(line.len() + 2);
    polygon.push((first.0, baseline));
    polygon.extend_from_slice(line);
    polygon.push((last.0, baseline));
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ChartData;
    use crate::filter::TimeRange;
    use crate::interactive::ZoomGesture;
    use crate::layouts::ChartLayout;
    use chrono::Days;

    fn series(closes: &[f64]) -> Vec<StockRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| StockRecord {
                date: start.checked_add_days(Days::new(i as u64)).unwrap(),
                open: 100.0,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000 * (i as u64 + 1),
            })
            .collect()
    }

    fn state(records: Vec<StockRecord>) -> ViewState {
        let mut state = ViewState::new(ChartLayout::default().resized(1170));
        let today = records.last().map_or(NaiveDate::MIN, |r| r.date);
        state.set_data(ChartData::from_records(records), today);
        state
    }

    #[test]
    fn test_empty_state_gives_empty_scene() {
        let scene = Scene::compute(&ViewState::new(ChartLayout::default()), &ChartStyle::default());
        assert!(scene.is_empty());
        assert_eq!(scene, Scene::default());
    }

    #[test]
    fn test_one_element_per_record() {
        let scene = Scene::compute(&state(series(&[101.0, 99.0, 103.0])), &ChartStyle::default());
        assert_eq!(scene.markers.len(), 3);
        assert_eq!(scene.volume_bars.len(), 3);
        assert_eq!(scene.price_line.len(), 3);
        assert_eq!(scene.area.len(), 5);
        assert_eq!(scene.price_line.first().unwrap().0, 0.0);
        assert_eq!(scene.price_line.last().unwrap().0, 1000.0);
    }

    #[test]
    fn test_bar_height_proportional_to_volume() {
        let scene = Scene::compute(&state(series(&[100.0, 100.0])), &ChartStyle::default());
        let bars: Vec<&VolumeBar> = scene.volume_bars.values().collect();
        // Volumes 1000 and 2000 over a [0, 2000] domain in a 100px panel
        assert_eq!(bars[0].height, 50.0);
        assert_eq!(bars[1].height, 100.0);
        assert_eq!(bars[1].y, 0.0);
    }

    #[test]
    fn test_bar_direction_against_previous_close() {
        let scene = Scene::compute(&state(series(&[101.0, 99.0, 99.0])), &ChartStyle::default());
        let directions: Vec<Direction> = scene.volume_bars.values().map(|b| b.direction).collect();
        assert_eq!(directions, vec![Direction::Up, Direction::Down, Direction::Up]);
    }

    #[test]
    fn test_filtered_window_direction_uses_record_before_window() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let mut records = series(&[120.0, 110.0, 105.0]);
        records[0].date = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let mut view = state(records);
        view.set_range(TimeRange::OneMonth, today);
        assert_eq!(view.visible().len(), 2);

        let scene = Scene::compute(&view, &ChartStyle::default());
        let first = scene.volume_bars.values().next().unwrap();
        // 110 against the hidden 120, not its own open of 100
        assert_eq!(first.direction, Direction::Down);
    }

    #[test]
    fn test_tooltip_content() {
        let scene = Scene::compute(&state(series(&[248.42])), &ChartStyle::default());
        let marker = scene.markers.values().next().unwrap();
        assert_eq!(marker.tooltip.title, "January 01, 2024");
        assert_eq!(marker.tooltip.lines[3], ("Close", "$248.42".to_string()));
        assert_eq!(marker.tooltip.lines[4], ("Volume", "1,000".to_string()));
    }

    #[test]
    fn test_single_record_sits_mid_panel() {
        let scene = Scene::compute(&state(series(&[50.0])), &ChartStyle::default());
        let marker = scene.markers.values().next().unwrap();
        assert_eq!(marker.cx, 500.0);
        assert_eq!(scene.price_line.len(), 1);
    }

    #[test]
    fn test_zoom_hides_markers_outside_viewport() {
        let closes: Vec<f64> = (0..11).map(|i| 100.0 + i as f64).collect();
        let mut view = state(series(&closes));
        let unzoomed = Scene::compute(&view, &ChartStyle::default());

        view.apply_zoom(ZoomGesture::Scale { factor: 2.0, anchor_x: 0.0 });
        let zoomed = Scene::compute(&view, &ChartStyle::default());

        // First half of the days remains, line ends at the right edge
        assert_eq!(zoomed.markers.len(), 6);
        assert!(zoomed.price_line.iter().all(|p| (0.0..=1000.0).contains(&p.0)));
        // Volume panel and price scale are unaffected
        assert_eq!(zoomed.volume_bars, unzoomed.volume_bars);
        assert_eq!(zoomed.axes.volume_x, unzoomed.axes.volume_x);
        assert_eq!(zoomed.axes.price_y, unzoomed.axes.price_y);
    }

    #[test]
    fn test_duplicate_dates_get_distinct_keys() {
        let mut records = series(&[1.0, 2.0]);
        records[1].date = records[0].date;
        let scene = Scene::compute(&state(records), &ChartStyle::default());
        assert_eq!(scene.markers.len(), 2);
        let seqs: Vec<u32> = scene.markers.keys().map(|k| k.seq).collect();
        assert_eq!(seqs, vec![0, 1]);
    }

    #[test]
    fn test_clip_interpolates_at_edges() {
        let clipped = clip_polyline(&[(-10.0, 0.0), (10.0, 20.0), (30.0, 0.0)], 0.0, 20.0);
        assert_eq!(clipped, vec![(0.0, 10.0), (10.0, 20.0), (20.0, 10.0)]);
        assert!(clip_polyline(&[(30.0, 1.0), (40.0, 1.0)], 0.0, 20.0).is_empty());
    }

    #[test]
    fn test_marker_hit_test() {
        let scene = Scene::compute(&state(series(&[100.0, 102.0])), &ChartStyle::default());
        let (cx, cy) = {
            let m = scene.markers.values().next().unwrap();
            (m.cx, m.cy)
        };
        assert!(scene.marker_at(cx + 5.0, cy, 8.0).is_some());
        assert!(scene.marker_at(cx + 9.0, cy, 8.0).is_none());
    }
}
