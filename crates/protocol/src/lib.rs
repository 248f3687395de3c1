pub mod commands;
pub mod theme;
pub mod types;

pub use commands::{RecordKind, RecordRef, RenderCommand, TextAlign};
pub use theme::ThemeToken;
pub use types::{Color, Point, Rect};
