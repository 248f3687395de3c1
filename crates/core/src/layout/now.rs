use chrono::{DateTime, Utc};
use serde::Serialize;

use super::scale::{TimeScale, minutes_between};

/// The current-time indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NowMarker {
    pub at: DateTime<Utc>,
    pub x: f64,
    /// `now` as `HH:mm`.
    pub label: String,
}

/// Place the now marker, or `None` when `now` falls outside the drawable
/// range `[label_width, total_width]`.
pub fn compute_marker(now: DateTime<Utc>, scale: &TimeScale) -> Option<NowMarker> {
    if scale.is_degenerate() {
        return None;
    }
    let x = scale.x_at(now);
    if x < scale.label_width || x > scale.total_width {
        return None;
    }
    Some(NowMarker {
        at: now,
        x,
        label: now.format("%H:%M").to_string(),
    })
}

/// Horizontal scroll offset that centers `now` in the scrollable part of a
/// viewport `viewport_width` wide, clamped to the canvas.
pub fn scroll_offset_for(now: DateTime<Utc>, scale: &TimeScale, viewport_width: f64) -> f64 {
    let visible = viewport_width - scale.label_width;
    let x = minutes_between(scale.origin, now) as f64 * scale.pixels_per_minute;
    let max_scroll = (scale.total_width - visible).max(0.0);
    (x - visible / 2.0).clamp(0.0, max_scroll)
}
