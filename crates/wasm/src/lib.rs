use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfloor_core::LayoutConfig;
use shopfloor_core::layout::{ChartInput, ChartLayout, Interval, IntervalCatalog, layout_chart};
use shopfloor_core::model::{Dataset, RecordView, TimeWindow};
use shopfloor_core::parsers::timestamp::format_timestamp;
use shopfloor_core::parsers::{parse_dataset, parse_records_auto, parse_timestamp};
use shopfloor_core::views;
use shopfloor_protocol::{Point, RecordRef, ThemeToken, theme};
use wasm_bindgen::prelude::*;

/// A loaded dataset plus the chart constants it is drawn with.
struct Chart {
    dataset: Dataset,
    config: LayoutConfig,
}

static CHARTS: Mutex<Vec<Chart>> = Mutex::new(Vec::new());

fn charts() -> Result<MutexGuard<'static, Vec<Chart>>, JsError> {
    CHARTS
        .lock()
        .map_err(|_| JsError::new("chart store is poisoned"))
}

fn js_err(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn with_chart<T>(handle: usize, f: impl FnOnce(&Chart) -> Result<T, JsError>) -> Result<T, JsError> {
    let charts = charts()?;
    let chart = charts
        .get(handle)
        .ok_or_else(|| JsError::new("invalid chart handle"))?;
    f(chart)
}

/// Window of `days` starting at `start_iso`.
fn window_at(start_iso: &str, days: u32) -> Result<TimeWindow, String> {
    let start = parse_timestamp(start_iso).map_err(|e| e.to_string())?;
    Ok(TimeWindow::from_anchor(start, days))
}

fn parse_now(now_iso: Option<String>) -> Result<Option<DateTime<Utc>>, String> {
    now_iso
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_timestamp(&s).map_err(|e| e.to_string()))
        .transpose()
}

fn lay_out(
    chart: &Chart,
    start_iso: &str,
    interval_label: &str,
    viewport_width: f64,
    now: Option<DateTime<Utc>>,
) -> Result<ChartLayout, String> {
    if !(viewport_width.is_finite() && viewport_width > 0.0) {
        return Err(format!("viewport width must be positive, got {viewport_width}"));
    }
    let interval = interval_label
        .parse::<Interval>()
        .map_err(|e| e.to_string())?;
    let input = ChartInput {
        dataset: &chart.dataset,
        window: window_at(start_iso, chart.config.window_days)?,
        interval,
        viewport_width,
        config: &chart.config,
    };
    Ok(layout_chart(&input, now))
}

/// Parse a whole dataset object (`{"machines": [...], "orders": [...], ...}`).
/// Returns a handle for later calls.
#[wasm_bindgen]
pub fn load_dataset(data: &[u8]) -> Result<usize, JsError> {
    let dataset = parse_dataset(data).map_err(js_err)?;
    let mut charts = charts()?;
    charts.push(Chart {
        dataset,
        config: LayoutConfig::default(),
    });
    Ok(charts.len() - 1)
}

/// Add one record export (machines, orders, status history or maintenance,
/// detected from its keys) to a loaded dataset. Returns the number of
/// records added.
#[wasm_bindgen]
pub fn add_records(handle: usize, data: &[u8]) -> Result<usize, JsError> {
    let records = parse_records_auto(data).map_err(js_err)?;
    let added = records.len();
    let mut charts = charts()?;
    let chart = charts
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid chart handle"))?;
    chart.dataset.absorb(records);
    Ok(added)
}

/// Replace the chart constants with a JSON object; missing keys keep their
/// defaults.
#[wasm_bindgen]
pub fn set_config(handle: usize, data: &[u8]) -> Result<(), JsError> {
    let config = LayoutConfig::from_json(data).map_err(js_err)?;
    let mut charts = charts()?;
    let chart = charts
        .get_mut(handle)
        .ok_or_else(|| JsError::new("invalid chart handle"))?;
    chart.config = config;
    Ok(())
}

/// Start of the earliest order, as the default window anchor.
#[wasm_bindgen]
pub fn initial_window_start(handle: usize) -> Result<Option<String>, JsError> {
    with_chart(handle, |chart| {
        Ok(chart
            .dataset
            .earliest_order_start()
            .map(|t| format_timestamp(&t)))
    })
}

/// The zoom catalog as JSON: `[{"label": "1h", "value": 60, "unit": "minute", "primary": true}, ...]`.
#[wasm_bindgen]
pub fn intervals() -> Result<String, JsError> {
    #[derive(Serialize)]
    struct Entry {
        label: String,
        #[serde(flatten)]
        interval: Interval,
    }
    let entries: Vec<_> = IntervalCatalog::all()
        .iter()
        .map(|i| Entry {
            label: i.label(),
            interval: *i,
        })
        .collect();
    serde_json::to_string(&entries).map_err(js_err)
}

/// Theme tokens mapped to `#rrggbb` colors, as JSON.
#[wasm_bindgen]
pub fn palette() -> Result<String, JsError> {
    let map: BTreeMap<String, String> = ThemeToken::ALL
        .iter()
        .map(|t| (format!("{t:?}"), theme::resolve(*t).to_hex()))
        .collect();
    serde_json::to_string(&map).map_err(js_err)
}

/// Lay out a chart and return its render commands as JSON.
#[wasm_bindgen]
pub fn render_chart(
    handle: usize,
    start_iso: &str,
    interval_label: &str,
    viewport_width: f64,
    now_iso: Option<String>,
) -> Result<String, JsError> {
    let now = parse_now(now_iso).map_err(js_err)?;
    with_chart(handle, |chart| {
        let layout =
            lay_out(chart, start_iso, interval_label, viewport_width, now).map_err(js_err)?;
        let commands = views::render_chart(&layout, &chart.dataset.machines, &chart.config);
        serde_json::to_string(&commands).map_err(js_err)
    })
}

/// Lay out a chart and return the raw geometry as JSON.
#[wasm_bindgen]
pub fn chart_layout(
    handle: usize,
    start_iso: &str,
    interval_label: &str,
    viewport_width: f64,
    now_iso: Option<String>,
) -> Result<String, JsError> {
    let now = parse_now(now_iso).map_err(js_err)?;
    with_chart(handle, |chart| {
        let layout =
            lay_out(chart, start_iso, interval_label, viewport_width, now).map_err(js_err)?;
        serde_json::to_string(&layout).map_err(js_err)
    })
}

/// Horizontal scroll offset that centers `now_iso` in the viewport.
#[wasm_bindgen]
pub fn scroll_offset(
    handle: usize,
    start_iso: &str,
    interval_label: &str,
    viewport_width: f64,
    now_iso: &str,
) -> Result<f64, JsError> {
    let now = parse_timestamp(now_iso).map_err(js_err)?;
    with_chart(handle, |chart| {
        let layout =
            lay_out(chart, start_iso, interval_label, viewport_width, None).map_err(js_err)?;
        Ok(layout.scroll_offset_for(now))
    })
}

/// The record under canvas point `(x, y)` as JSON, or `None` when the point
/// hits no bar. Orders also carry their detail rows.
#[wasm_bindgen]
pub fn hit_test(
    handle: usize,
    start_iso: &str,
    interval_label: &str,
    viewport_width: f64,
    x: f64,
    y: f64,
) -> Result<Option<String>, JsError> {
    with_chart(handle, |chart| {
        let layout =
            lay_out(chart, start_iso, interval_label, viewport_width, None).map_err(js_err)?;
        let Some(hit) = layout.hit_test(Point::new(x, y)) else {
            return Ok(None);
        };
        describe(&chart.dataset, hit).map_err(js_err)
    })
}

fn describe(dataset: &Dataset, hit: RecordRef) -> Result<Option<String>, serde_json::Error> {
    let value = match dataset.record(hit) {
        Some(RecordView::Order(order)) => serde_json::json!({
            "ref": hit,
            "record": order,
            "title": order.part_number,
            "details": order.details(),
        }),
        Some(RecordView::Status(period)) => serde_json::json!({ "ref": hit, "record": period }),
        Some(RecordView::Maintenance(event)) => {
            serde_json::json!({ "ref": hit, "record": event })
        }
        None => return Ok(None),
    };
    serde_json::to_string(&value).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &[u8] = br#"{
        "machines": [{"machine_id": 1, "machine_name": "Press 1", "status": "Idle"}],
        "orders": [{"of_id": 4, "machine_id": 1, "part_number": "PN-4",
            "start_datetime_utc": "2024-01-02T00:00:00Z",
            "end_datetime_utc": "2024-01-02T12:00:00Z"}]
    }"#;

    fn chart() -> Chart {
        Chart {
            dataset: parse_dataset(DATASET).expect("dataset"),
            config: LayoutConfig::default(),
        }
    }

    #[test]
    fn lays_out_from_strings() {
        let layout = lay_out(&chart(), "2024-01-01", "1d", 1024.0, None).expect("layout");
        assert_eq!(layout.bars.len(), 1);
        assert!(lay_out(&chart(), "2024-01-01", "3y", 1024.0, None).is_err());
        assert!(lay_out(&chart(), "soon", "1d", 1024.0, None).is_err());
    }

    #[test]
    fn rejects_unusable_viewport_widths() {
        for width in [0.0, -320.0, f64::NAN, f64::INFINITY] {
            let err = lay_out(&chart(), "2024-01-01", "1d", width, None).err();
            assert!(err.is_some_and(|e| e.contains("viewport width")), "{width}");
        }
    }

    #[test]
    fn blank_now_means_no_marker() {
        assert_eq!(parse_now(Some("  ".into())), Ok(None));
        assert!(parse_now(Some("2024-01-03T10:00:00Z".into())).is_ok_and(|t| t.is_some()));
    }

    #[test]
    fn describes_orders_with_details() {
        let chart = chart();
        let hit = RecordRef::new(shopfloor_protocol::RecordKind::Order, 4);
        let json = describe(&chart.dataset, hit).expect("serialize").expect("order exists");
        assert!(json.contains("\"title\":\"PN-4\""));
        assert!(json.contains("Cycle Time"));
    }
}
