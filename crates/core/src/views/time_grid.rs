use shopfloor_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::layout::Grid;

const LABEL_BOX_WIDTH: f64 = 50.0;
const LABEL_BOX_HEIGHT: f64 = 20.0;
const LABEL_BOX_TOP: f64 = 5.0;
const LABEL_BASELINE: f64 = 20.0;
const FONT_SIZE: f64 = 11.0;
const MINOR_DASH: (f64, f64) = (2.0, 2.0);

/// Render the time grid: solid major lines with a boxed label in the axis
/// strip, dashed hourly minor lines through the rows.
pub fn render_time_grid(grid: &Grid, axis_height: f64, content_height: f64) -> Vec<RenderCommand> {
    if grid.is_empty() {
        return Vec::new();
    }

    let bottom = axis_height + content_height;
    let mut commands = Vec::with_capacity(grid.minor.len() + grid.major.len() * 3 + 2);

    commands.push(RenderCommand::BeginGroup {
        id: "grid".into(),
        label: Some("Time grid".into()),
    });

    for line in &grid.minor {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(line.x, axis_height),
            to: Point::new(line.x, bottom),
            color: ThemeToken::GridMinor,
            width: 0.5,
            dash: Some(MINOR_DASH),
        });
    }

    for line in &grid.major {
        commands.push(RenderCommand::DrawLine {
            from: Point::new(line.x, axis_height),
            to: Point::new(line.x, bottom),
            color: ThemeToken::GridMajor,
            width: 1.0,
            dash: None,
        });
    }

    // Labels last so lines never cross them.
    for label in &grid.labels {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                label.x - LABEL_BOX_WIDTH / 2.0,
                LABEL_BOX_TOP,
                LABEL_BOX_WIDTH,
                LABEL_BOX_HEIGHT,
            ),
            color: ThemeToken::AxisLabelBackground,
            opacity: 1.0,
            corner_radius: 0.0,
            label: None,
            record: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(label.x, LABEL_BASELINE),
            text: label.text.clone(),
            color: ThemeToken::AxisLabelText,
            font_size: FONT_SIZE,
            bold: true,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridLabel, GridLine};
    use chrono::{TimeZone, Utc};

    fn grid() -> Grid {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Grid {
            major: vec![GridLine { at, x: 100.0 }],
            minor: vec![
                GridLine { at, x: 110.0 },
                GridLine { at, x: 120.0 },
            ],
            labels: vec![GridLabel {
                at,
                x: 100.0,
                text: "Jan 1".into(),
            }],
        }
    }

    #[test]
    fn lines_span_the_content_area() {
        let cmds = render_time_grid(&grid(), 40.0, 300.0);
        let lines: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawLine { from, to, dash, .. } => Some((from.y, to.y, *dash)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|&(top, bottom, _)| top == 40.0 && bottom == 340.0));
        assert_eq!(lines.iter().filter(|l| l.2.is_some()).count(), 2);
    }

    #[test]
    fn labels_are_boxed_and_centered() {
        let cmds = render_time_grid(&grid(), 40.0, 300.0);
        let boxed = cmds.iter().any(|c| {
            matches!(c, RenderCommand::DrawRect { rect, color: ThemeToken::AxisLabelBackground, .. }
                if rect.x == 75.0 && rect.w == 50.0)
        });
        assert!(boxed);
        assert!(cmds.iter().any(|c| matches!(
            c,
            RenderCommand::DrawText { text, align: TextAlign::Center, .. } if text == "Jan 1"
        )));
    }

    #[test]
    fn empty_grid_renders_nothing() {
        assert!(render_time_grid(&Grid::default(), 40.0, 300.0).is_empty());
    }
}
