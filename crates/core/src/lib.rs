//! Timeline layout engine for machine-activity Gantt charts.
//!
//! ```text
//!   JSON records ─▶ parsers ─▶ Dataset ─▶ layout::chart ─▶ ChartLayout ─▶ views ─▶ RenderCommand[]
//!                                          (scale, grid,     (geometry)
//!                                           filter, bars,
//!                                           rows, now)
//! ```
//!
//! Every step after parsing is a pure function of its inputs. The engine
//! reads no clock and no screen size: `now` and the viewport width are
//! arguments.

pub mod config;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod views;

pub use config::LayoutConfig;
