//! View state and the chart controller
//!
//! Every interaction goes through [`ChartController`], which updates the
//! explicit [`ViewState`], recomputes the [`Scene`] from it and reconciles
//! the retained scene with a keyed [`SceneDiff`].

use crate::data::ChartData;
use crate::errors::{Result, VisualizationError};
use crate::export::{ChartExporter, PngExporter, SvgExporter};
use crate::filter::TimeRange;
use crate::interactive::{Debouncer, ZoomGesture, ZoomTransform, DEFAULT_RESIZE_DEBOUNCE};
use crate::layouts::ChartLayout;
use crate::reconcile::SceneDiff;
use crate::scene::{ElementKey, Scene, Tooltip};
use crate::source::DataSource;
use crate::styles::ChartStyle;
use crate::summary::Summary;
use chrono::{Local, NaiveDate};
use std::path::Path;
use std::time::Instant;
use stockchart::StockRecord;

/// Message shown in place of the chart when a fetch fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data";

/// Pixel distance within which hovering picks a marker
pub const HOVER_RADIUS: f64 = 8.0;

/// Inputs of a render: dataset, time window, zoom and container size
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    data: ChartData,
    range: TimeRange,
    window_start: usize,
    zoom: ZoomTransform,
    layout: ChartLayout,
}

impl ViewState {
    pub fn new(layout: ChartLayout) -> Self {
        Self {
            data: ChartData::default(),
            range: TimeRange::default(),
            window_start: 0,
            zoom: ZoomTransform::identity(),
            layout,
        }
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    /// Index into the dataset of the first visible record
    pub fn window_start(&self) -> usize {
        self.window_start
    }

    /// Records inside the selected time range
    pub fn visible(&self) -> &[StockRecord] {
        self.data.window(self.window_start)
    }

    /// Replace the dataset; zoom resets
    pub fn set_data(&mut self, data: ChartData, today: NaiveDate) {
        self.data = data;
        self.zoom = ZoomTransform::identity();
        self.refilter(today);
    }

    /// Select a time range; zoom resets
    pub fn set_range(&mut self, range: TimeRange, today: NaiveDate) {
        self.range = range;
        self.zoom = ZoomTransform::identity();
        self.refilter(today);
    }

    pub fn apply_zoom(&mut self, gesture: ZoomGesture) {
        self.zoom = gesture.apply(self.zoom, self.layout.inner_width());
    }

    /// New container width; the zoom is re-constrained to the new viewport
    pub fn resize(&mut self, width: u32) {
        self.layout = self.layout.resized(width);
        self.zoom = self.zoom.constrain(self.layout.inner_width());
    }

    fn refilter(&mut self, today: NaiveDate) {
        self.window_start = self.range.window_start(self.data.records(), today);
    }
}

/// Lifecycle of a chart
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Loading,
    /// Showing the full dataset
    Loaded,
    /// Showing a time-range window of the dataset
    Filtered(TimeRange),
    /// The last fetch failed; any earlier scene is kept
    Error { message: String },
}

/// Inputs the controller reacts to
#[derive(Debug)]
pub enum ChartEvent {
    FetchStarted,
    FetchCompleted(Result<Vec<StockRecord>>),
    RangeSelected(TimeRange),
    Zoom(ZoomGesture),
    Resize { width: u32, at: Instant },
    Tick(Instant),
    /// Pointer position in price-panel coordinates
    Hover { x: f64, y: f64 },
}

/// Owns the view state and the retained scene of one chart
#[derive(Debug)]
pub struct ChartController {
    state: ViewState,
    style: ChartStyle,
    phase: Phase,
    scene: Option<Scene>,
    last_diff: Option<SceneDiff>,
    hovered: Option<ElementKey>,
    resize: Debouncer<u32>,
    fetch_in_flight: bool,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl ChartController {
    pub fn new(layout: ChartLayout, style: ChartStyle) -> Self {
        Self {
            state: ViewState::new(layout),
            style,
            phase: Phase::Idle,
            scene: None,
            last_diff: None,
            hovered: None,
            resize: Debouncer::new(DEFAULT_RESIZE_DEBOUNCE),
            fetch_in_flight: false,
            clock: local_today,
        }
    }

    /// Override the date time ranges are measured back from
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The retained scene; `None` until a fetch has succeeded
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Diff applied by the most recent render
    pub fn last_diff(&self) -> Option<&SceneDiff> {
        self.last_diff.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Summary of the visible records
    pub fn summary(&self) -> Option<Summary> {
        Summary::from_records(self.state.visible())
    }

    /// Enter `Loading`. Refused while a fetch is already in flight.
    pub fn begin_fetch(&mut self) -> bool {
        if self.fetch_in_flight {
            tracing::debug!("fetch already in flight");
            return false;
        }
        self.fetch_in_flight = true;
        self.phase = Phase::Loading;
        true
    }

    /// Settle the in-flight fetch.
    ///
    /// Success replaces the dataset and renders. Failure, including an empty
    /// dataset, moves to `Error` and leaves any earlier scene untouched.
    /// A result with no fetch in flight (no [`ChartController::begin_fetch`]
    /// or [`ChartEvent::FetchStarted`] before it) is logged and ignored.
    pub fn complete_fetch(&mut self, result: Result<Vec<StockRecord>>) -> Result<()> {
        if !self.fetch_in_flight {
            tracing::warn!("fetch result arrived with no fetch in flight, ignoring");
            return Ok(());
        }
        self.fetch_in_flight = false;

        let outcome = result.and_then(|records| {
            if records.is_empty() {
                Err(VisualizationError::fetch("dataset is empty"))
            } else {
                Ok(records)
            }
        });

        match outcome {
            Ok(records) => {
                tracing::info!(records = records.len(), "dataset loaded");
                self.state.set_data(ChartData::from_records(records), (self.clock)());
                self.phase = self.settled_phase();
                self.render();
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load stock data");
                self.phase = Phase::Error {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                };
                Err(err)
            }
        }
    }

    /// Fetch from `source` and settle the result
    pub async fn load<S: DataSource>(&mut self, source: &S) -> Result<()> {
        if !self.begin_fetch() {
            return Ok(());
        }
        let result = source.fetch().await;
        self.complete_fetch(result)
    }

    /// Window the retained dataset. Applies immediately, also while a
    /// refetch is in flight or after a failed one.
    pub fn select_range(&mut self, range: TimeRange) {
        self.state.set_range(range, (self.clock)());
        if matches!(self.phase, Phase::Loaded | Phase::Filtered(_)) {
            self.phase = self.settled_phase();
        }
        if self.has_data() {
            self.render();
        }
    }

    pub fn zoom(&mut self, gesture: ZoomGesture) {
        if !self.has_data() {
            return;
        }
        self.state.apply_zoom(gesture);
        self.render();
    }

    /// Queue a container resize; applied by [`ChartController::tick`] once
    /// resizing has settled
    pub fn resize(&mut self, width: u32, at: Instant) {
        self.resize.push(width, at);
    }

    /// Apply a settled resize. Returns whether anything was re-rendered.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(width) = self.resize.poll(now) else {
            return false;
        };
        self.state.resize(width);
        if self.has_data() {
            self.render();
            return true;
        }
        false
    }

    /// Tooltip of the marker nearest a price-panel position
    pub fn hover(&self, x: f64, y: f64) -> Option<&Tooltip> {
        self.scene
            .as_ref()?
            .marker_at(x, y, HOVER_RADIUS)
            .map(|(_, marker)| &marker.tooltip)
    }

    /// Tooltip left showing by the last [`ChartEvent::Hover`]
    pub fn hovered(&self) -> Option<&Tooltip> {
        let key = self.hovered.as_ref()?;
        self.scene.as_ref()?.markers.get(key).map(|marker| &marker.tooltip)
    }

    pub fn handle(&mut self, event: ChartEvent) -> Result<()> {
        match event {
            ChartEvent::FetchStarted => {
                self.begin_fetch();
            }
            ChartEvent::FetchCompleted(result) => return self.complete_fetch(result),
            ChartEvent::RangeSelected(range) => self.select_range(range),
            ChartEvent::Zoom(gesture) => self.zoom(gesture),
            ChartEvent::Resize { width, at } => self.resize(width, at),
            ChartEvent::Tick(now) => {
                self.tick(now);
            }
            ChartEvent::Hover { x, y } => {
                self.hovered = self
                    .scene
                    .as_ref()
                    .and_then(|scene| scene.marker_at(x, y, HOVER_RADIUS))
                    .map(|(key, _)| *key);
            }
        }
        Ok(())
    }

    pub fn render_svg(&self) -> Result<String> {
        SvgExporter::new(*self.state.layout(), self.style.clone()).render_to_string(self.retained()?)
    }

    /// Export to `path` as SVG, or PNG when the extension is `.png`
    pub fn export(&self, path: &Path) -> Result<()> {
        let scene = self.retained()?;
        let layout = *self.state.layout();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png {
            PngExporter::new(layout, self.style.clone()).export(scene, path)
        } else {
            SvgExporter::new(layout, self.style.clone()).export(scene, path)
        }
    }

    fn retained(&self) -> Result<&Scene> {
        self.scene.as_ref().ok_or_else(|| VisualizationError::NoChart {
            message: "no dataset has been loaded".to_string(),
        })
    }

    /// A dataset is retained, whatever the fetch phase
    fn has_data(&self) -> bool {
        !self.state.data().is_empty()
    }

    fn settled_phase(&self) -> Phase {
        match self.state.range() {
            TimeRange::All => Phase::Loaded,
            range => Phase::Filtered(range),
        }
    }

    fn render(&mut self) {
        let next = Scene::compute(&self.state, &self.style);
        let retained = self.scene.get_or_insert_with(Scene::default);
        let diff = SceneDiff::between(retained, &next);
        retained.apply(&diff);
        tracing::debug!(
            markers = diff.markers.len(),
            bars = diff.volume_bars.len(),
            visible = self.state.visible().len(),
            "scene reconciled"
        );
        self.last_diff = Some(diff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn records(days: u64) -> Vec<StockRecord> {
        let start = today().checked_sub_days(Days::new(days - 1)).unwrap();
        (0..days)
            .map(|i| StockRecord {
                date: start.checked_add_days(Days::new(i)).unwrap(),
                open: 100.0,
                high: 110.0,
                low: 90.0,
                close: 100.0 + (i % 7) as f64,
                volume: 1_000,
            })
            .collect()
    }

    fn loaded(days: u64) -> ChartController {
        let mut controller =
            ChartController::new(ChartLayout::default(), ChartStyle::default()).with_clock(today);
        assert!(controller.begin_fetch());
        controller.complete_fetch(Ok(records(days))).unwrap();
        controller
    }

    #[test]
    fn test_starts_idle_without_scene() {
        let controller = ChartController::new(ChartLayout::default(), ChartStyle::default());
        assert_eq!(controller.phase(), &Phase::Idle);
        assert!(controller.scene().is_none());
        assert!(matches!(controller.render_svg(), Err(VisualizationError::NoChart { .. })));
    }

    #[test]
    fn test_second_fetch_refused_while_in_flight() {
        let mut controller = ChartController::new(ChartLayout::default(), ChartStyle::default());
        assert!(controller.begin_fetch());
        assert!(!controller.begin_fetch());
        assert_eq!(controller.phase(), &Phase::Loading);
    }

    #[test]
    fn test_successful_fetch_renders() {
        let controller = loaded(10);
        assert_eq!(controller.phase(), &Phase::Loaded);
        assert_eq!(controller.scene().unwrap().markers.len(), 10);
        assert_eq!(controller.last_diff().unwrap().markers.entered.len(), 10);
    }

    #[test]
    fn test_failed_fetch_keeps_last_scene() {
        let mut controller = loaded(10);
        let before = controller.scene().cloned();

        assert!(controller.begin_fetch());
        let err = controller.complete_fetch(Err(VisualizationError::fetch("boom")));
        assert!(err.is_err());
        assert_eq!(controller.error_message(), Some(LOAD_FAILED_MESSAGE));
        assert_eq!(controller.scene().cloned(), before);
    }

    #[test]
    fn test_empty_dataset_is_error() {
        let mut controller = ChartController::new(ChartLayout::default(), ChartStyle::default());
        controller.begin_fetch();
        assert!(controller.complete_fetch(Ok(Vec::new())).is_err());
        assert_eq!(controller.error_message(), Some(LOAD_FAILED_MESSAGE));
        assert!(controller.scene().is_none());
    }

    #[test]
    fn test_range_selection_filters_and_resets_zoom() {
        let mut controller = loaded(400);
        controller.zoom(ZoomGesture::Scale { factor: 2.0, anchor_x: 100.0 });
        assert!(!controller.state().zoom().is_identity());

        controller.select_range(TimeRange::OneMonth);
        assert_eq!(controller.phase(), &Phase::Filtered(TimeRange::OneMonth));
        assert!(controller.state().zoom().is_identity());
        // May 30 through June 30
        assert_eq!(controller.state().visible().len(), 32);
        assert_eq!(controller.scene().unwrap().markers.len(), 32);

        controller.select_range(TimeRange::All);
        assert_eq!(controller.phase(), &Phase::Loaded);
        assert_eq!(controller.scene().unwrap().markers.len(), 400);
    }

    #[test]
    fn test_zoom_keeps_price_axis() {
        let mut controller = loaded(60);
        let price_y = controller.scene().unwrap().axes.price_y.clone();
        controller.zoom(ZoomGesture::Scale { factor: 4.0, anchor_x: 500.0 });
        let scene = controller.scene().unwrap();
        assert_eq!(scene.axes.price_y, price_y);
        assert!(controller.last_diff().unwrap().volume_bars.is_empty());
    }

    #[test]
    fn test_resize_is_debounced() {
        let mut controller = loaded(10);
        let start = Instant::now();
        controller.resize(800, start);
        controller.resize(900, start + Duration::from_millis(100));

        assert!(!controller.tick(start + Duration::from_millis(300)));
        assert_eq!(controller.state().layout().width, crate::DEFAULT_WIDTH);

        assert!(controller.tick(start + Duration::from_millis(350)));
        assert_eq!(controller.state().layout().width, 900);
        let last = controller.scene().unwrap().price_line.last().copied().unwrap();
        assert_eq!(last.0, 900.0 - 170.0);
    }

    #[test]
    fn test_hover_shows_tooltip() {
        let controller = loaded(3);
        let marker = controller.scene().unwrap().markers.values().next().cloned().unwrap();
        let tooltip = controller.hover(marker.cx + 3.0, marker.cy - 3.0).unwrap();
        assert_eq!(tooltip, &marker.tooltip);
        assert!(controller.hover(marker.cx + 50.0, marker.cy + 50.0).is_none());
    }

    #[test]
    fn test_summary_follows_visible_window() {
        let controller = loaded(10);
        let summary = controller.summary().unwrap();
        let visible = controller.state().visible();
        assert_eq!(summary.latest_close, visible[visible.len() - 1].close);
    }

    #[test]
    fn test_events_dispatch() {
        let mut controller =
            ChartController::new(ChartLayout::default(), ChartStyle::default()).with_clock(today);
        controller.begin_fetch();
        controller.handle(ChartEvent::FetchCompleted(Ok(records(90)))).unwrap();
        controller.handle(ChartEvent::RangeSelected(TimeRange::OneMonth)).unwrap();
        assert_eq!(controller.phase(), &Phase::Filtered(TimeRange::OneMonth));

        let at = Instant::now();
        controller.handle(ChartEvent::Resize { width: 1000, at }).unwrap();
        controller.handle(ChartEvent::Tick(at + DEFAULT_RESIZE_DEBOUNCE)).unwrap();
        assert_eq!(controller.state().layout().width, 1000);

        let marker = controller.scene().unwrap().markers.values().last().cloned().unwrap();
        controller.handle(ChartEvent::Hover { x: marker.cx, y: marker.cy }).unwrap();
        assert_eq!(controller.hovered(), Some(&marker.tooltip));
        controller.handle(ChartEvent::Hover { x: -100.0, y: -100.0 }).unwrap();
        assert!(controller.hovered().is_none());
    }

    #[test]
    fn test_interactions_apply_while_refetching() {
        let mut controller = loaded(400);
        assert!(controller.begin_fetch());

        controller.zoom(ZoomGesture::Scale { factor: 2.0, anchor_x: 100.0 });
        assert!(!controller.state().zoom().is_identity());
        assert!(!controller.last_diff().unwrap().markers.is_empty());

        controller.select_range(TimeRange::OneMonth);
        assert_eq!(controller.phase(), &Phase::Loading);
        assert_eq!(controller.state().visible().len(), 32);
        assert_eq!(controller.scene().unwrap().markers.len(), 32);
        let visible = controller.state().visible();
        assert_eq!(controller.summary().unwrap().latest_close, visible[visible.len() - 1].close);

        // The refetch still settles normally afterwards
        controller.complete_fetch(Ok(records(400))).unwrap();
        assert_eq!(controller.phase(), &Phase::Filtered(TimeRange::OneMonth));
        assert_eq!(controller.scene().unwrap().markers.len(), 32);
    }

    #[test]
    fn test_interactions_apply_after_failed_refresh() {
        let mut controller = loaded(400);
        controller.select_range(TimeRange::OneMonth);
        controller.begin_fetch();
        assert!(controller.complete_fetch(Err(VisualizationError::fetch("down"))).is_err());

        controller.select_range(TimeRange::All);
        assert_eq!(controller.scene().unwrap().markers.len(), 400);
        controller.zoom(ZoomGesture::Scale { factor: 2.0, anchor_x: 0.0 });
        assert!(!controller.state().zoom().is_identity());
        assert!(controller.scene().unwrap().markers.len() < 400);
        assert_eq!(controller.error_message(), Some(LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn test_fetch_started_event_arms_completion() {
        let mut controller =
            ChartController::new(ChartLayout::default(), ChartStyle::default()).with_clock(today);
        // No fetch in flight: the result is ignored
        controller.handle(ChartEvent::FetchCompleted(Ok(records(5)))).unwrap();
        assert_eq!(controller.phase(), &Phase::Idle);
        assert!(controller.scene().is_none());

        controller.handle(ChartEvent::FetchStarted).unwrap();
        assert_eq!(controller.phase(), &Phase::Loading);
        controller.handle(ChartEvent::FetchCompleted(Ok(records(5)))).unwrap();
        assert_eq!(controller.phase(), &Phase::Loaded);
        assert_eq!(controller.scene().unwrap().markers.len(), 5);
    }

    #[test]
    fn test_export_writes_svg_file() {
        let controller = loaded(10);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        controller.export(&path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches("<circle").count(), 10);

        let idle = ChartController::new(ChartLayout::default(), ChartStyle::default());
        let err = idle.export(&dir.path().join("none.svg")).unwrap_err();
        assert!(matches!(err, VisualizationError::NoChart { .. }));
    }
}
