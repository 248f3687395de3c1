use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::interval::Interval;
use super::scale::TimeScale;
use crate::model::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub at: DateTime<Utc>,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLabel {
    pub at: DateTime<Utc>,
    pub x: f64,
    pub text: String,
}

/// Vertical reference lines for one window at one interval.
///
/// `major` and `labels` are parallel: one label per major line.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Grid {
    pub major: Vec<GridLine>,
    pub minor: Vec<GridLine>,
    pub labels: Vec<GridLabel>,
}

impl Grid {
    pub fn is_empty(&self) -> bool {
        self.major.is_empty() && self.minor.is_empty()
    }
}

/// Step from `window.start` to `window.end` at the interval's tick step,
/// emitting a major line and label at each step, plus hourly minor lines up
/// to the next step.
///
/// Only geometry inside `[label_width, total_width]` is emitted. Minor lines
/// are generated only after a visible major line and never at or past the
/// next major line or the window end.
pub fn build_grid(window: &TimeWindow, interval: &Interval, scale: &TimeScale) -> Grid {
    let mut grid = Grid::default();
    if scale.is_degenerate() {
        return grid;
    }

    let step = interval.tick_step();
    let subdivisions = interval.hour_subdivisions();
    let format = interval.label_format();
    let visible = |x: f64| x >= scale.label_width && x <= scale.total_width;

    let mut t = window.start();
    while t <= window.end() {
        let next = step.advance(t);
        let x = scale.x_at(t);
        if x > scale.total_width {
            break;
        }
        if visible(x) {
            grid.major.push(GridLine { at: t, x });
            grid.labels.push(GridLabel {
                at: t,
                x,
                text: t.format(format).to_string(),
            });

            for hour in 1..subdivisions {
                let at = t + Duration::hours(i64::from(hour));
                if at > window.end() || next.is_some_and(|n| at >= n) {
                    break;
                }
                let x = scale.x_at(at);
                if x > scale.total_width {
                    break;
                }
                if visible(x) {
                    grid.minor.push(GridLine { at, x });
                }
            }
        }

        match next {
            Some(n) => t = n,
            None => break,
        }
    }

    tracing::trace!(
        major = grid.major.len(),
        minor = grid.minor.len(),
        interval = %interval,
        "built grid"
    );
    grid
}
