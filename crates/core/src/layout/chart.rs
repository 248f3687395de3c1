use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfloor_protocol::{Point, RecordRef};

use super::bars::{Bar, project_all};
use super::filter::WindowRecords;
use super::grid::{Grid, build_grid};
use super::interval::Interval;
use super::now::{NowMarker, compute_marker, scroll_offset_for};
use super::rows::{Band, RowLayout, SubRow};
use super::scale::{TimeScale, compute_scale};
use crate::config::LayoutConfig;
use crate::model::{Dataset, TimeWindow};

/// Everything a layout pass reads.
#[derive(Debug, Clone, Copy)]
pub struct ChartInput<'a> {
    pub dataset: &'a Dataset,
    pub window: TimeWindow,
    pub interval: Interval,
    pub viewport_width: f64,
    pub config: &'a LayoutConfig,
}

/// The geometry of one chart.
///
/// Bars and bands are relative to the top of the content area, which sits
/// `axis_height` below the canvas top. Grid and marker `x` values are canvas
/// offsets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub window: TimeWindow,
    pub interval: Interval,
    pub viewport_width: f64,
    pub scale: TimeScale,
    pub rows: RowLayout,
    pub grid: Grid,
    pub bands: Vec<Band>,
    pub bars: Vec<Bar>,
    pub now_marker: Option<NowMarker>,
    pub axis_height: f64,
    pub content_height: f64,
    pub total_height: f64,
}

/// Run a full layout pass: filter records to the window, build the scale,
/// grid and bands, project bars and place the now marker.
///
/// `now` is `None` when the host does not want a marker.
pub fn layout_chart(input: &ChartInput<'_>, now: Option<DateTime<Utc>>) -> ChartLayout {
    let config = input.config;
    let machines = &input.dataset.machines;

    let scale = compute_scale(&input.window, &input.interval, input.viewport_width);
    let grid = build_grid(&input.window, &input.interval, &scale);
    let rows = RowLayout::from_config(config);
    let records = WindowRecords::select(input.dataset, &input.window);
    let bars = project_all(machines, &records, &rows, &scale, config);
    let now_marker = now.and_then(|t| compute_marker(t, &scale));

    let content_height = rows.total_content_height(machines.len());
    let total_height = content_height + config.axis_height + config.bottom_padding;

    tracing::debug!(
        interval = %input.interval,
        machines = machines.len(),
        in_window = records.len(),
        bars = bars.len(),
        grid_lines = grid.major.len() + grid.minor.len(),
        width = scale.total_width,
        "laid out chart"
    );

    ChartLayout {
        window: input.window,
        interval: input.interval,
        viewport_width: input.viewport_width,
        scale,
        rows,
        grid,
        bands: rows.bands(machines.len()),
        bars,
        now_marker,
        axis_height: config.axis_height,
        content_height,
        total_height,
    }
}

impl ChartLayout {
    pub fn total_width(&self) -> f64 {
        self.scale.total_width
    }

    /// The record under a canvas point. Later bars are drawn on top, so
    /// they win.
    pub fn hit_test(&self, point: Point) -> Option<RecordRef> {
        let local = Point::new(point.x, point.y - self.axis_height);
        let (machine, sub_row) = self.rows.slot_at(local.y, self.bands.len())?;
        self.bars
            .iter()
            .rev()
            .filter(|bar| bar.machine == machine && SubRow::for_kind(bar.source.kind) == sub_row)
            .find(|bar| bar.rect.contains(local))
            .map(|bar| bar.source)
    }

    /// Scroll offset that brings `now` to the middle of the viewport.
    pub fn scroll_offset_for(&self, now: DateTime<Utc>) -> f64 {
        scroll_offset_for(now, &self.scale, self.viewport_width)
    }
}
