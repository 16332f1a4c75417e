use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use review_anchor_engine::{
    AnnotationStatus, GeometrySource, LineMarker, MarkerType, Size, Viewport, place_for,
};

use crate::app::{App, Mode};

// Terminal cells are measured as pixels so placement distances from the
// config keep their meaning.
const CELL_WIDTH_PX: f32 = 8.0;
const CELL_HEIGHT_PX: f32 = 16.0;

const POPUP_WIDTH: u16 = 56;

fn status_style(status: AnnotationStatus) -> (char, Color) {
    match status {
        AnnotationStatus::Pending => ('●', Color::Yellow),
        AnnotationStatus::Reopened => ('◆', Color::Magenta),
        AnnotationStatus::Resolved => ('✓', Color::Green),
        AnnotationStatus::Closed => ('■', Color::DarkGray),
        AnnotationStatus::WontFix => ('✗', Color::Gray),
    }
}

fn marker_span(marker: Option<&LineMarker<'_>>) -> Span<'static> {
    let Some(marker) = marker else {
        return Span::raw("   ");
    };
    let (glyph, color) = status_style(marker.primary.status);
    let shape = match marker.marker_type {
        MarkerType::Single => glyph,
        MarkerType::Start => '┬',
        MarkerType::Middle => '│',
        MarkerType::End => '┴',
    };
    let count = if marker.count > 1 {
        char::from_digit(marker.count.min(9) as u32, 10).unwrap_or('+')
    } else {
        ' '
    };
    Span::styled(format!("{shape}{count} "), Style::default().fg(color))
}

/// Places popups against the code pane, one text row per source line
struct PaneGeometry {
    frame: Rect,
    pane: Rect,
    gutter_width: u16,
    scroll: usize,
}

impl GeometrySource for PaneGeometry {
    type Element = usize;

    fn measure_anchor(&self, line: &usize) -> review_anchor_engine::Rect {
        let row = self.pane.y as usize + 1 + line.saturating_sub(1 + self.scroll);
        review_anchor_engine::Rect::new(
            (self.pane.x + 1) as f32 * CELL_WIDTH_PX,
            row as f32 * CELL_HEIGHT_PX,
            self.gutter_width as f32 * CELL_WIDTH_PX,
            CELL_HEIGHT_PX,
        )
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.frame.width as f32 * CELL_WIDTH_PX,
            self.frame.height as f32 * CELL_HEIGHT_PX,
        )
    }
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.area());
    let pane = chunks[0];

    let visible = pane.height.saturating_sub(2) as usize;
    app.scroll_into_view(visible);

    let number_width = app.line_count().to_string().len();
    let gutter_width = (number_width + 4) as u16;
    let markers = app.markers();

    let lines: Vec<Line> = app
        .document
        .lines()
        .skip(app.scroll)
        .take(visible)
        .map(|(n, text)| {
            let mut style = Style::default();
            if app.is_selected(n) {
                style = style.bg(Color::Blue);
            }
            if n == app.cursor_line {
                style = style.add_modifier(Modifier::BOLD);
            }
            Line::from(vec![
                marker_span(markers.get(&n)),
                Span::styled(
                    format!("{n:>number_width$} "),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(text.to_string(), style),
            ])
        })
        .collect();

    let title = format!(
        "{}{}",
        app.path.display(),
        if app.dirty { " [modified]" } else { "" }
    );
    let code = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(code, pane);

    if app.show_popup
        && let Some(marker) = markers.get(&app.cursor_line)
    {
        let geometry = PaneGeometry {
            frame: f.area(),
            pane,
            gutter_width,
            scroll: app.scroll,
        };
        draw_popup(f, &geometry, marker, app);
    }

    let footer = match &app.mode {
        Mode::Commenting { input, .. } => Line::from(vec![
            Span::styled("Comment: ", Style::default().fg(Color::Yellow)),
            Span::raw(input.clone()),
            Span::raw("▏  (Enter: submit | Esc: cancel)"),
        ]),
        Mode::Normal => Line::from(vec![
            Span::raw(app.status.clone()),
            Span::raw(" | q: Quit | ↑↓/jk: Move | Shift+↑↓: Select | "),
            Span::raw("Tab/Shift+Tab: Indent | c: Comment | Space: Show | "),
            Span::raw("r/o/d: Resolve/Reopen/Delete | s: Save"),
        ]),
    };
    let help = Paragraph::new(vec![footer])
        .block(Block::default().borders(Borders::TOP))
        .wrap(Wrap { trim: true });
    f.render_widget(help, chunks[1]);
}

fn draw_popup(f: &mut Frame, geometry: &PaneGeometry, marker: &LineMarker<'_>, app: &App) {
    let mut body = Vec::new();
    for annotation in &marker.all_annotations {
        let (glyph, color) = status_style(annotation.status);
        body.push(Line::from(vec![
            Span::styled(format!("{glyph} {} ", annotation.status), Style::default().fg(color)),
            Span::styled(
                format!(
                    "{} · lines {}-{}",
                    annotation.author,
                    annotation.range.start_line(),
                    annotation.range.end_line()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        body.push(Line::from(annotation.content.clone()));
    }

    let frame = geometry.frame;
    let width = POPUP_WIDTH.min(frame.width);
    let height = (body.len() as u16 + 2).min(frame.height);
    let size = Size::new(
        width as f32 * CELL_WIDTH_PX,
        height as f32 * CELL_HEIGHT_PX,
    );
    let placement = place_for(geometry, &app.cursor_line, size, &app.placement);

    let x = ((placement.x / CELL_WIDTH_PX).round() as u16).min(frame.width - width);
    let y = ((placement.y / CELL_HEIGHT_PX).round() as u16).min(frame.height - height);
    let area = Rect::new(frame.x + x, frame.y + y, width, height);

    let title = format!("Line {} · {} annotation(s)", marker.line_number, marker.count);
    let popup = Paragraph::new(body)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}
