use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
}

/// A zoom level: how far apart the major grid lines are and, through
/// [`Interval::visible_span_minutes`], how much time fits on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    #[serde(rename = "value")]
    pub magnitude: u32,
    pub unit: TimeUnit,
    /// Offered by the default interval selector.
    pub primary: bool,
}

/// The unit the grid actually steps in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickStep {
    Minutes(u32),
    Hours(u32),
    Days(u32),
    Weeks(u32),
    Months(u32),
}

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

impl Interval {
    pub const fn new(magnitude: u32, unit: TimeUnit, primary: bool) -> Self {
        Self {
            magnitude,
            unit,
            primary,
        }
    }

    /// Minute intervals above one hour that divide evenly into hours step
    /// in hours (240 minutes → every 4 hours).
    pub fn tick_step(&self) -> TickStep {
        let m = self.magnitude.max(1);
        match self.unit {
            TimeUnit::Minute if m > 60 && m % 60 == 0 => TickStep::Hours(m / 60),
            TimeUnit::Minute => TickStep::Minutes(m),
            TimeUnit::Hour => TickStep::Hours(m),
            TimeUnit::Day => TickStep::Days(m),
            TimeUnit::Week => TickStep::Weeks(m),
            TimeUnit::Month => TickStep::Months(m),
        }
    }

    /// How many hourly lines (counting the major line itself) fall in one
    /// step.
    pub fn hour_subdivisions(&self) -> u32 {
        match self.tick_step() {
            TickStep::Minutes(m) => 60 / m,
            TickStep::Hours(h) => h,
            TickStep::Days(d) => d * 24,
            TickStep::Weeks(w) => w * 7 * 24,
            // Upper bound; the grid stops subdividing at the next major line.
            TickStep::Months(n) => n * 31 * 24,
        }
    }

    /// Minutes of time shown across one viewport width.
    ///
    /// Each interval shows a fixed number of its own steps: 24 for short
    /// minute steps, 8 for multi-hour minute steps, 12 for hours, 3 for
    /// days, 2 for weeks and months. The 7-day interval shows exactly one
    /// week so a default window fits without scrolling.
    pub fn visible_span_minutes(&self) -> i64 {
        let m = i64::from(self.magnitude.max(1));
        match self.unit {
            TimeUnit::Minute if matches!(self.tick_step(), TickStep::Hours(_)) => m * 8,
            TimeUnit::Minute => m * 24,
            TimeUnit::Hour => m * MINUTES_PER_HOUR * 12,
            TimeUnit::Day if self.is_week_fit() => 7 * MINUTES_PER_DAY,
            TimeUnit::Day => m * MINUTES_PER_DAY * 3,
            TimeUnit::Week => m * 7 * MINUTES_PER_DAY * 2,
            TimeUnit::Month => m * 30 * MINUTES_PER_DAY * 2,
        }
    }

    /// The 7-day interval sizes the canvas to the viewport instead of the
    /// window.
    pub fn is_week_fit(&self) -> bool {
        self.unit == TimeUnit::Day && self.magnitude == 7
    }

    /// Short label for selector buttons.
    pub fn label(&self) -> String {
        let m = self.magnitude;
        match self.unit {
            TimeUnit::Minute if m < 60 => format!("{m}m"),
            TimeUnit::Minute => format!("{}h", f64::from(m) / 60.0),
            TimeUnit::Hour => format!("{m}h"),
            TimeUnit::Day => match m {
                1 => "1d".to_string(),
                7 => "1w".to_string(),
                14 => "2w".to_string(),
                30 => "1m".to_string(),
                60 => "2m".to_string(),
                180 => "6m".to_string(),
                _ => format!("{m}d"),
            },
            TimeUnit::Week => format!("{m}w"),
            TimeUnit::Month => format!("{m}mo"),
        }
    }

    /// chrono format string for grid labels at this interval.
    pub fn label_format(&self) -> &'static str {
        match self.tick_step() {
            TickStep::Minutes(_) | TickStep::Hours(_) => "%H:%M",
            TickStep::Days(_) | TickStep::Weeks(_) => "%b %-d",
            TickStep::Months(_) => "%b %Y",
        }
    }
}

impl TickStep {
    /// `t` moved forward by one step, or `None` past the representable range.
    pub fn advance(self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Minutes(n) => t.checked_add_signed(Duration::minutes(i64::from(n))),
            Self::Hours(n) => t.checked_add_signed(Duration::hours(i64::from(n))),
            Self::Days(n) => t.checked_add_signed(Duration::days(i64::from(n))),
            Self::Weeks(n) => t.checked_add_signed(Duration::weeks(i64::from(n))),
            Self::Months(n) => t.checked_add_months(Months::new(n)),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown interval {0:?}")]
pub struct UnknownInterval(pub String);

/// The supported zoom levels, finest first.
pub struct IntervalCatalog;

impl IntervalCatalog {
    const ENTRIES: [Interval; 10] = [
        Interval::new(60, TimeUnit::Minute, true),
        Interval::new(240, TimeUnit::Minute, false),
        Interval::new(480, TimeUnit::Minute, true),
        Interval::new(1, TimeUnit::Day, true),
        Interval::new(2, TimeUnit::Day, false),
        Interval::new(7, TimeUnit::Day, true),
        Interval::new(14, TimeUnit::Day, false),
        Interval::new(30, TimeUnit::Day, false),
        Interval::new(60, TimeUnit::Day, false),
        Interval::new(180, TimeUnit::Day, false),
    ];

    pub fn all() -> &'static [Interval] {
        &Self::ENTRIES
    }

    /// Entries shown by the default selector.
    pub fn primary() -> impl Iterator<Item = Interval> {
        Self::ENTRIES.into_iter().filter(|i| i.primary)
    }

    /// One day.
    pub fn default_interval() -> Interval {
        Self::ENTRIES[3]
    }

    /// Look an entry up by its selector label (`"8h"`, `"1w"`, ...).
    pub fn find(label: &str) -> Result<Interval, UnknownInterval> {
        let label = label.trim();
        Self::ENTRIES
            .into_iter()
            .find(|i| i.label() == label)
            .ok_or_else(|| UnknownInterval(label.to_string()))
    }
}

impl FromStr for Interval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntervalCatalog::find(s)
    }
}
