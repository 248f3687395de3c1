use shopfloor_protocol::RenderCommand;

use crate::layout::Bar;

const CORNER_RADIUS: f64 = 4.0;

/// Render projected bars. Each rect carries its record reference so the
/// host can resolve activations, and its label (order progress) is drawn by
/// the renderer inside the rect.
pub fn render_bars(bars: &[Bar]) -> Vec<RenderCommand> {
    if bars.is_empty() {
        return Vec::new();
    }

    let mut commands = Vec::with_capacity(bars.len() + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "bars".into(),
        label: Some("Records".into()),
    });
    commands.extend(bars.iter().map(|bar| RenderCommand::DrawRect {
        rect: bar.rect,
        color: bar.fill,
        opacity: bar.opacity,
        corner_radius: CORNER_RADIUS,
        label: bar.label.clone(),
        record: Some(bar.source),
    }));
    commands.push(RenderCommand::EndGroup);
    commands
}
