use shopfloor_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::layout::{Band, RowLayout, SubRow};
use crate::model::Machine;

const SIDEBAR_PADDING: f64 = 6.0;
const NAME_FONT_SIZE: f64 = 12.0;
const DETAIL_FONT_SIZE: f64 = 10.0;
/// Status tint behind the machine name (0x30 alpha).
const SIDEBAR_TINT_OPACITY: f32 = 0x30 as f32 / 255.0;

/// Alternating background stripes across the full canvas width.
pub fn render_row_tints(bands: &[Band], width: f64) -> Vec<RenderCommand> {
    let tinted: Vec<_> = bands.iter().filter(|b| b.tinted).collect();
    if tinted.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(tinted.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "rows".into(),
        label: None,
    });
    for band in tinted {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, band.y, width, band.height),
            color: ThemeToken::RowTint,
            opacity: 1.0,
            corner_radius: 0.0,
            label: None,
            record: None,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}

/// The fixed machine column: status-tinted cell, machine name and type, and
/// the category label of each sub-row.
pub fn render_sidebar(
    machines: &[Machine],
    bands: &[Band],
    rows: &RowLayout,
    label_width: f64,
) -> Vec<RenderCommand> {
    if bands.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(bands.len() * 6 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "sidebar".into(),
        label: Some("Machines".into()),
    });

    for (band, machine) in bands.iter().zip(machines) {
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(0.0, band.y, label_width, band.height),
            color: machine.status_kind().fill(),
            opacity: SIDEBAR_TINT_OPACITY,
            corner_radius: 0.0,
            label: None,
            record: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(SIDEBAR_PADDING, band.y + NAME_FONT_SIZE + SIDEBAR_PADDING),
            text: machine.name.clone(),
            color: ThemeToken::SidebarText,
            font_size: NAME_FONT_SIZE,
            bold: true,
            align: TextAlign::Left,
        });
        if !machine.machine_type.is_empty() {
            commands.push(RenderCommand::DrawText {
                position: Point::new(
                    SIDEBAR_PADDING,
                    band.y + NAME_FONT_SIZE + DETAIL_FONT_SIZE + 2.0 * SIDEBAR_PADDING,
                ),
                text: machine.machine_type.clone(),
                color: ThemeToken::SidebarTextMuted,
                font_size: DETAIL_FONT_SIZE,
                bold: false,
                align: TextAlign::Left,
            });
        }

        for sub in SubRow::ALL {
            let y = rows.row_slot(band.index, sub) + rows.bar_height / 2.0 + DETAIL_FONT_SIZE / 2.0;
            commands.push(RenderCommand::DrawText {
                position: Point::new(label_width - SIDEBAR_PADDING, y),
                text: sub.label().to_string(),
                color: ThemeToken::SidebarTextMuted,
                font_size: DETAIL_FONT_SIZE,
                bold: false,
                align: TextAlign::Right,
            });
        }
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
