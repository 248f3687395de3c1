use shopfloor_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::layout::NowMarker;

const BOX_WIDTH: f64 = 40.0;
const BOX_HEIGHT: f64 = 20.0;
const BOX_TOP: f64 = 5.0;
const BASELINE: f64 = 20.0;
const FONT_SIZE: f64 = 11.0;
const LINE_DASH: (f64, f64) = (4.0, 4.0);

/// Render the now marker: a time badge in the axis strip and a dashed line
/// down through the rows.
pub fn render_now_marker(
    marker: &NowMarker,
    axis_height: f64,
    content_height: f64,
) -> Vec<RenderCommand> {
    let x = marker.x;
    vec![
        RenderCommand::BeginGroup {
            id: "now".into(),
            label: Some("Now".into()),
        },
        RenderCommand::DrawLine {
            from: Point::new(x, axis_height),
            to: Point::new(x, axis_height + content_height),
            color: ThemeToken::NowMarker,
            width: 2.0,
            dash: Some(LINE_DASH),
        },
        RenderCommand::DrawRect {
            rect: Rect::new(x - BOX_WIDTH / 2.0, BOX_TOP, BOX_WIDTH, BOX_HEIGHT),
            color: ThemeToken::NowMarker,
            opacity: 1.0,
            corner_radius: 0.0,
            label: None,
            record: None,
        },
        RenderCommand::DrawText {
            position: Point::new(x, BASELINE),
            text: marker.label.clone(),
            color: ThemeToken::NowMarkerText,
            font_size: FONT_SIZE,
            bold: true,
            align: TextAlign::Center,
        },
        RenderCommand::EndGroup,
    ]
}
