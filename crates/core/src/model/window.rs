use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window end {end} is not after its start {start}")]
    Empty {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// The time range being laid out. `start < end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

/// Span of a window derived from an anchor date.
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::Empty { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[anchor, anchor + days]`. A zero `days` is treated as one day.
    pub fn from_anchor(anchor: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: anchor,
            end: anchor + Duration::days(i64::from(days.max(1))),
        }
    }

    /// A window of `days` whose midpoint is `now`.
    pub fn centered_on(now: DateTime<Utc>, days: u32) -> Self {
        let half = Duration::hours(i64::from(days.max(1)) * 12);
        Self::from_anchor(now - half, days)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whole minutes between start and end, truncated.
    pub fn minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Closed-interval membership: both endpoints count as inside.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// The same-length window immediately before this one.
    pub fn previous(&self) -> Self {
        let span = self.duration();
        Self {
            start: self.start - span,
            end: self.start,
        }
    }

    /// The same-length window immediately after this one.
    pub fn next(&self) -> Self {
        let span = self.duration();
        Self {
            start: self.end,
            end: self.end + span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted() {
        assert!(TimeWindow::new(at(1, 0), at(1, 0)).is_err());
        assert!(matches!(
            TimeWindow::new(at(2, 0), at(1, 0)),
            Err(WindowError::Empty { .. })
        ));
        assert!(TimeWindow::new(at(1, 0), at(1, 1)).is_ok());
    }

    #[test]
    fn anchor_spans_seven_days() {
        let w = TimeWindow::from_anchor(at(1, 0), DEFAULT_WINDOW_DAYS);
        assert_eq!(w.end(), at(8, 0));
        assert_eq!(w.minutes(), 7 * 24 * 60);
    }

    #[test]
    fn centered_window_starts_half_a_span_earlier() {
        let w = TimeWindow::centered_on(at(10, 12), DEFAULT_WINDOW_DAYS);
        assert_eq!(w.start(), at(7, 0));
        assert_eq!(w.end(), at(14, 0));
    }

    #[test]
    fn contains_is_closed() {
        let w = TimeWindow::from_anchor(at(1, 0), 1);
        assert!(w.contains(at(1, 0)));
        assert!(w.contains(at(2, 0)));
        assert!(!w.contains(at(2, 1)));
    }

    #[test]
    fn navigation_keeps_span() {
        let w = TimeWindow::from_anchor(at(8, 0), DEFAULT_WINDOW_DAYS);
        assert_eq!(w.previous().start(), at(1, 0));
        assert_eq!(w.previous().end(), w.start());
        assert_eq!(w.next().start(), w.end());
        assert_eq!(w.next().duration(), w.duration());
    }
}
