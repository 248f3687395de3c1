//! Pure geometry: time → pixels, records → bars.
//!
//! Each submodule covers one step of a layout pass; [`chart::layout_chart`]
//! runs them all in order.

pub mod bars;
pub mod chart;
pub mod filter;
pub mod grid;
pub mod interval;
pub mod now;
pub mod rows;
pub mod scale;

pub use bars::{Bar, Projectable, project, project_all};
pub use chart::{ChartInput, ChartLayout, layout_chart};
pub use filter::{WindowRecords, filter_in_window};
pub use grid::{Grid, GridLabel, GridLine, build_grid};
pub use interval::{Interval, IntervalCatalog, TickStep, TimeUnit, UnknownInterval};
pub use now::{NowMarker, compute_marker, scroll_offset_for};
pub use rows::{Band, RowLayout, SubRow};
pub use scale::{TimeScale, compute_scale, label_column_width, minutes_between};
