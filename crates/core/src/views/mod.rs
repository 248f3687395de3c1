//! Turn a [`ChartLayout`] into a flat render command stream.
//!
//! Row, bar and sidebar geometry is emitted relative to the content area
//! inside a `PushTransform` by the axis height; grid and now marker span the
//! axis and are emitted in canvas coordinates.

pub mod bars;
pub mod now_marker;
pub mod rows;
pub mod time_grid;

pub use bars::render_bars;
pub use now_marker::render_now_marker;
pub use rows::{render_row_tints, render_sidebar};
pub use time_grid::render_time_grid;

use shopfloor_protocol::{Point, Rect, RenderCommand, ThemeToken};

use crate::config::LayoutConfig;
use crate::layout::ChartLayout;
use crate::model::Machine;

/// Render a whole chart, back to front: background, row tints, grid, bars,
/// now marker and the machine sidebar on top.
pub fn render_chart(
    layout: &ChartLayout,
    machines: &[Machine],
    config: &LayoutConfig,
) -> Vec<RenderCommand> {
    let width = layout.total_width();
    let grid_len = 3 * layout.grid.major.len() + layout.grid.minor.len();
    let mut commands =
        Vec::with_capacity(layout.bars.len() + grid_len + 8 * machines.len() + 16);

    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, 0.0, width, layout.total_height),
        color: ThemeToken::Background,
        opacity: 1.0,
        corner_radius: 0.0,
        label: None,
        record: None,
    });

    let content_offset = RenderCommand::PushTransform {
        translate: Point::new(0.0, config.axis_height),
    };

    commands.push(content_offset.clone());
    commands.extend(render_row_tints(&layout.bands, width));
    commands.push(RenderCommand::PopTransform);

    commands.extend(render_time_grid(
        &layout.grid,
        config.axis_height,
        layout.content_height,
    ));

    commands.push(content_offset.clone());
    commands.extend(render_bars(&layout.bars));
    commands.push(RenderCommand::PopTransform);

    if let Some(marker) = &layout.now_marker {
        commands.extend(render_now_marker(
            marker,
            config.axis_height,
            layout.content_height,
        ));
    }

    commands.push(content_offset);
    commands.extend(render_sidebar(
        machines,
        &layout.bands,
        &layout.rows,
        layout.scale.label_width,
    ));
    commands.push(RenderCommand::PopTransform);

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ChartInput, IntervalCatalog, layout_chart};
    use crate::model::{Dataset, TimeWindow};
    use chrono::{TimeZone, Utc};
    use shopfloor_protocol::RecordKind;

    fn dataset() -> Dataset {
        serde_json::from_str(
            r#"{
                "machines": [
                    {"machine_id": 1, "machine_name": "Press 1", "machine_type": "Injection", "status": "Operational"}
                ],
                "orders": [
                    {"of_id": 5, "machine_id": 1, "part_number": "PN",
                     "start_datetime_utc": "2024-01-02T08:00:00Z",
                     "end_datetime_utc": "2024-01-02T20:00:00Z",
                     "status": "Completed"}
                ]
            }"#,
        )
        .expect("dataset")
    }

    #[test]
    fn transforms_are_balanced_and_bars_are_tagged() {
        let dataset = dataset();
        let config = LayoutConfig::default();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let input = ChartInput {
            dataset: &dataset,
            window: TimeWindow::from_anchor(start, 7),
            interval: IntervalCatalog::default_interval(),
            viewport_width: 1024.0,
            config: &config,
        };
        let layout = layout_chart(&input, Some(start + chrono::Duration::hours(30)));
        let cmds = render_chart(&layout, &dataset.machines, &config);

        let pushes = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::PushTransform { .. }))
            .count();
        let pops = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::PopTransform))
            .count();
        assert_eq!(pushes, 3);
        assert_eq!(pushes, pops);

        let begins = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::BeginGroup { .. }))
            .count();
        let ends = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::EndGroup))
            .count();
        assert_eq!(begins, ends);

        let tagged: Vec<_> = cmds
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect {
                    record: Some(r), ..
                } => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].kind, RecordKind::Order);

        assert!(matches!(
            cmds.first(),
            Some(RenderCommand::DrawRect {
                color: ThemeToken::Background,
                ..
            })
        ));
    }
}
