use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::interval::Interval;
use crate::model::TimeWindow;

/// Space after the last minute of the window so end-of-window bars and
/// labels are not flush against the canvas edge.
pub const TRAILING_PADDING: f64 = 100.0;

/// Width of the fixed machine-name column for a viewport width.
pub fn label_column_width(viewport_width: f64) -> f64 {
    if viewport_width <= 300.0 {
        60.0
    } else if viewport_width <= 768.0 {
        80.0
    } else if viewport_width <= 1024.0 {
        100.0
    } else {
        120.0
    }
}

/// Whole minutes from `from` to `to`, truncated toward zero.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes()
}

/// Maps instants to horizontal pixel offsets for one window and interval.
///
/// `x = label_width + minutes_since_origin × pixels_per_minute`. The canvas
/// spans `[0, total_width]`; time starts after the label column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeScale {
    pub origin: DateTime<Utc>,
    pub pixels_per_minute: f64,
    pub label_width: f64,
    pub total_width: f64,
}

impl TimeScale {
    /// Pixel offset of `instant` on the canvas. Instants before the origin
    /// land inside or left of the label column.
    pub fn x_at(&self, instant: DateTime<Utc>) -> f64 {
        self.label_width + minutes_between(self.origin, instant) as f64 * self.pixels_per_minute
    }

    /// Width covered by a duration, truncated to whole minutes.
    pub fn width_of(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
        minutes_between(from, to) as f64 * self.pixels_per_minute
    }

    /// Instant under canvas offset `x`, to the nearest minute. `None` for a
    /// degenerate scale.
    pub fn instant_at(&self, x: f64) -> Option<DateTime<Utc>> {
        if self.is_degenerate() {
            return None;
        }
        let minutes = ((x - self.label_width) / self.pixels_per_minute).round();
        self.origin
            .checked_add_signed(Duration::minutes(minutes as i64))
    }

    /// True when built from a window shorter than one whole minute.
    pub fn is_degenerate(&self) -> bool {
        self.pixels_per_minute <= 0.0
    }
}

/// Scale for `window` at zoom `interval` on a viewport `viewport_width` wide.
///
/// Pixels-per-minute comes from the interval alone: the zoom level sets the
/// density, the window only sets how far the canvas extends. A window shorter
/// than one minute yields a degenerate scale with zero density and width.
pub fn compute_scale(window: &TimeWindow, interval: &Interval, viewport_width: f64) -> TimeScale {
    let label_width = label_column_width(viewport_width);
    let window_minutes = window.minutes();
    if window_minutes <= 0 {
        tracing::warn!(
            start = %window.start(),
            end = %window.end(),
            "window shorter than one minute, scale is degenerate"
        );
        return TimeScale {
            origin: window.start(),
            pixels_per_minute: 0.0,
            label_width,
            total_width: 0.0,
        };
    }

    let pixels_per_minute = viewport_width / interval.visible_span_minutes() as f64;
    let total_width = if interval.is_week_fit() {
        viewport_width + label_width
    } else {
        let range_width = window_minutes as f64 * pixels_per_minute;
        range_width.max(viewport_width) + label_width + TRAILING_PADDING
    };

    TimeScale {
        origin: window.start(),
        pixels_per_minute,
        label_width,
        total_width,
    }
}
