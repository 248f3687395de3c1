use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
};
use shopfloor_core::layout::{ChartLayout, TimeScale};
use shopfloor_protocol::{RenderCommand, TextAlign, ThemeToken, theme};

use crate::load::Session;

/// Logical pixels per terminal column.
const CELL_WIDTH: f64 = 8.0;

fn theme_to_color(token: ThemeToken) -> Color {
    let c = theme::resolve(token);
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb(channel(c.r), channel(c.g), channel(c.b))
}

/// Maps canvas coordinates to cells of one terminal area. The axis strip is
/// the first row; every sub-row below it is one terminal row.
struct CellMap {
    area: Rect,
    label_width: f64,
    axis_height: f64,
    row_pitch: f64,
    scroll_x: f64,
    first_row: usize,
}

impl CellMap {
    fn col(&self, x: f64, sticky: bool) -> Option<u16> {
        let x = if sticky { x } else { x - self.scroll_x };
        let col = (x / CELL_WIDTH).floor();
        (col >= 0.0 && col < f64::from(self.area.width)).then(|| self.area.x + col as u16)
    }

    fn row(&self, y: f64) -> Option<u16> {
        if y < self.axis_height {
            return Some(self.area.y);
        }
        let sub_row = ((y - self.axis_height) / self.row_pitch).floor() as usize;
        let visible = sub_row.checked_sub(self.first_row)? + 1;
        (visible < usize::from(self.area.height)).then(|| self.area.y + visible as u16)
    }

    fn right_edge(&self) -> u16 {
        self.area.x + self.area.width
    }

    /// Blank the machine column below the axis so the sidebar draws over
    /// scrolled bars.
    fn clear_sidebar(&self, buf: &mut Buffer) {
        let cols = ((self.label_width / CELL_WIDTH).ceil() as u16).min(self.area.width);
        for row in self.area.y + 1..self.area.y + self.area.height {
            for col in self.area.x..self.area.x + cols {
                buf[(col, row)].reset();
            }
        }
    }
}

/// Paint a command stream onto the buffer. Only geometry that survives the
/// cell grid is drawn: bars, grid lines, the now marker and text.
fn paint(buf: &mut Buffer, map: &CellMap, commands: &[RenderCommand]) {
    let mut offset_y = 0.0;
    let mut offsets = Vec::new();
    let mut sticky = false;

    for cmd in commands {
        match cmd {
            RenderCommand::PushTransform { translate } => {
                offsets.push(offset_y);
                offset_y += translate.y;
            }
            RenderCommand::PopTransform => offset_y = offsets.pop().unwrap_or(0.0),
            RenderCommand::BeginGroup { id, .. } => {
                sticky = id == "sidebar";
                if sticky {
                    map.clear_sidebar(buf);
                }
            }
            RenderCommand::EndGroup => sticky = false,
            RenderCommand::DrawRect {
                rect,
                color,
                label,
                record: Some(_),
                ..
            } => {
                let Some(row) = map.row(rect.y + offset_y + 1.0) else {
                    continue;
                };
                let start = ((rect.x - map.scroll_x) / CELL_WIDTH).floor();
                let cells = (rect.w / CELL_WIDTH).ceil().max(1.0) as usize;
                let label = label.as_deref().unwrap_or("");
                let text: Vec<char> = if cells >= label.chars().count() + 2 {
                    format!(" {label:<w$}", w = cells.saturating_sub(1)).chars().collect()
                } else {
                    vec!['█'; cells]
                };
                let fg = theme_to_color(*color);
                for (i, ch) in text.into_iter().enumerate() {
                    let col = start + i as f64;
                    if col < 0.0 || col >= f64::from(map.area.width) {
                        continue;
                    }
                    let x = map.area.x + col as u16;
                    let style = if ch == '█' {
                        Style::default().fg(fg)
                    } else {
                        Style::default()
                            .fg(theme_to_color(ThemeToken::BarText))
                            .bg(fg)
                    };
                    buf[(x, row)].set_char(ch).set_style(style);
                }
            }
            RenderCommand::DrawRect { .. } => {}
            RenderCommand::DrawLine {
                from, to, color, dash, ..
            } => {
                let Some(col) = map.col(from.x, sticky) else {
                    continue;
                };
                let glyph = if dash.is_some() { '┊' } else { '│' };
                let overwrite = *color == ThemeToken::NowMarker;
                let fg = theme_to_color(*color);
                let (top, bottom) = (from.y + offset_y, to.y + offset_y);
                let mut y = top;
                while y < bottom {
                    if let Some(row) = map.row(y)
                        && row > map.area.y
                    {
                        let cell = &mut buf[(col, row)];
                        if overwrite || cell.symbol() == " " {
                            cell.set_char(glyph).set_fg(fg);
                        }
                    }
                    y += map.row_pitch;
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let Some(row) = map.row(position.y + offset_y - 1.0) else {
                    continue;
                };
                let len = text.chars().count() as f64 * CELL_WIDTH;
                let x = match align {
                    TextAlign::Left => position.x,
                    TextAlign::Center => position.x - len / 2.0,
                    TextAlign::Right => position.x - len,
                };
                write_text(buf, map, row, x, sticky, text, theme_to_color(*color));
            }
        }
    }
}

/// Text is written only where its whole span is free, so overlapping labels
/// drop out instead of garbling each other.
fn write_text(buf: &mut Buffer, map: &CellMap, row: u16, x: f64, sticky: bool, text: &str, fg: Color) {
    let Some(first) = map.col(x.max(if sticky { 0.0 } else { map.scroll_x }), sticky) else {
        return;
    };
    let cols: Vec<u16> = (first..map.right_edge()).take(text.chars().count()).collect();
    if cols.iter().any(|&c| buf[(c, row)].symbol() != " ") {
        return;
    }
    for (col, ch) in cols.into_iter().zip(text.chars()) {
        buf[(col, row)].set_char(ch).set_fg(fg);
    }
}

/// Time at the left edge of the scrolled timeline.
fn view_start(scale: &TimeScale, scroll_x: f64) -> String {
    scale
        .instant_at(scroll_x + scale.label_width)
        .map(|t| t.format("%b %-d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn max_scroll(layout: &ChartLayout) -> f64 {
    (layout.total_width() - layout.viewport_width).max(0.0)
}

pub fn render_tui(mut session: Session) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut scroll_x: f64 = 0.0;
    let mut first_machine: usize = 0;

    loop {
        let term_size = terminal.size()?;
        session.viewport_width = f64::from(term_size.width.max(1)) * CELL_WIDTH;
        let layout = session.layout();
        let commands =
            shopfloor_core::views::render_chart(&layout, &session.dataset.machines, &session.config);
        scroll_x = scroll_x.clamp(0.0, max_scroll(&layout));
        let machine_count = session.dataset.machines.len();

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " shopfloor | {} → {} | from {} | {} | {} bars | ←→ scroll  [ ] week  +/- zoom  t today  q quit ",
                    layout.window.start().format("%b %-d"),
                    layout.window.end().format("%b %-d"),
                    view_start(&layout.scale, scroll_x),
                    layout.interval,
                    layout.bars.len(),
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            frame.render_widget(block, content_area);

            let map = CellMap {
                area: content_area,
                label_width: layout.scale.label_width,
                axis_height: layout.axis_height,
                row_pitch: layout.rows.row_pitch(),
                scroll_x,
                first_row: first_machine * 3,
            };
            paint(frame.buffer_mut(), &map, &commands);
        })?;

        if event::poll(std::time::Duration::from_millis(100))? {
            let page = session.viewport_width * 0.1;
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left => scroll_x -= page,
                    KeyCode::Right => scroll_x += page,
                    KeyCode::Up => first_machine = first_machine.saturating_sub(1),
                    KeyCode::Down => {
                        first_machine = (first_machine + 1).min(machine_count.saturating_sub(1));
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => session.zoom(-1),
                    KeyCode::Char('-') => session.zoom(1),
                    KeyCode::Char('[') => {
                        session.window = session.window.previous();
                        scroll_x = 0.0;
                    }
                    KeyCode::Char(']') => {
                        session.window = session.window.next();
                        scroll_x = 0.0;
                    }
                    KeyCode::Char('t') => {
                        session.today();
                        scroll_x = session.layout().scroll_offset_for(session.now);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => {
                        first_machine = (first_machine + 1).min(machine_count.saturating_sub(1));
                    }
                    MouseEventKind::ScrollUp => first_machine = first_machine.saturating_sub(1),
                    MouseEventKind::ScrollLeft => scroll_x -= CELL_WIDTH * 4.0,
                    MouseEventKind::ScrollRight => scroll_x += CELL_WIDTH * 4.0,
                    _ => {}
                },
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
