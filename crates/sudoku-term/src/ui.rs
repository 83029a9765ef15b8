use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
};

use crate::app::{App, StatusKind};

// One text row per cell, five columns wide.
const CELL_WIDTH: usize = 5;
const GRID_WIDTH: u16 = 55;
const GRID_HEIGHT: u16 = 19;

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let outer = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);
    let main_area = outer[0];
    let bottom_area = outer[1];

    let h_chunks = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(GRID_WIDTH + 2),
        Constraint::Length(2),
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .split(main_area);

    let grid_v = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(GRID_HEIGHT + 2),
        Constraint::Min(0),
    ])
    .split(h_chunks[1]);

    draw_grid(f, app, grid_v[1]);

    let panel_v = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(14),
        Constraint::Min(0),
    ])
    .split(h_chunks[3]);

    draw_panel(f, app, panel_v[1]);
    draw_key_hints(f, bottom_area);

    if app.solved {
        draw_solved_banner(f);
    }
    if app.show_quit_confirm {
        draw_quit_confirm(f);
    }
}

// ── Grid rendering ───────────────────────────────────────────────────────────

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::with_capacity(GRID_HEIGHT as usize);

    lines.push(horizontal_border('╔', '╤', '╦', '╗', '═', Color::White));
    for r in 0..9 {
        lines.push(cell_line(app, r));
        if r == 8 {
            lines.push(horizontal_border('╚', '╧', '╩', '╝', '═', Color::White));
        } else if r % 3 == 2 {
            lines.push(horizontal_border('╠', '╪', '╬', '╣', '═', Color::White));
        } else {
            lines.push(horizontal_border('╟', '┼', '╫', '╢', '─', Color::DarkGray));
        }
    }

    let block = Block::bordered()
        .title(" Sudoku ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// One visual row of cells with its vertical separators.
fn cell_line(app: &App, row: usize) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::with_capacity(19);

    for col in 0..9 {
        let border = if col % 3 == 0 {
            Span::styled("║", Style::default().fg(Color::White))
        } else {
            Span::styled("│", Style::default().fg(Color::DarkGray))
        };
        spans.push(border);
        spans.push(cell_span(app, row, col));
    }
    spans.push(Span::styled("║", Style::default().fg(Color::White)));

    Line::from(spans)
}

fn cell_span(app: &App, row: usize, col: usize) -> Span<'static> {
    let cell = app.session.board()[row][col];
    let is_selected = app.session.selected() == Some((row, col));
    let is_cursor = (row, col) == (app.cursor_row, app.cursor_col);
    let is_flagged = app.flagged.contains(&(row, col));

    let bg = if is_selected {
        Color::Yellow
    } else if is_flagged {
        Color::Red
    } else if is_cursor {
        Color::DarkGray
    } else {
        Color::Reset
    };

    let text = match cell.value() {
        Some(v) => format!("  {}  ", v),
        None if is_selected || is_cursor => "  ·  ".to_string(),
        None => " ".repeat(CELL_WIDTH),
    };

    let fg = match bg {
        Color::Yellow => Color::Black,
        Color::Red => Color::White,
        _ if cell.is_given() => Color::White,
        _ if cell.value().is_some() => Color::Cyan,
        _ => Color::DarkGray,
    };

    let mut style = Style::default().fg(fg).bg(bg);
    if cell.is_given() {
        style = style.add_modifier(Modifier::BOLD);
    }
    Span::styled(text, style)
}

/// Build a horizontal separator. `thin_cross` joins cell columns inside a
/// box, `thick_cross` joins box columns.
fn horizontal_border(
    left: char,
    thin_cross: char,
    thick_cross: char,
    right: char,
    fill: char,
    color: Color,
) -> Line<'static> {
    let mut s = String::with_capacity(GRID_WIDTH as usize);
    s.push(left);
    for box_idx in 0..3 {
        for cell_idx in 0..3 {
            for _ in 0..CELL_WIDTH {
                s.push(fill);
            }
            if cell_idx < 2 {
                s.push(thin_cross);
            }
        }
        if box_idx < 2 {
            s.push(thick_cross);
        }
    }
    s.push(right);

    Line::from(Span::styled(s, Style::default().fg(color)))
}

// ── Side panel ───────────────────────────────────────────────────────────────

fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::bordered()
        .title(" Game ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White));

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Filled  ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/81", app.filled_count()),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(""),
    ];

    match &app.status {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Cyan,
                StatusKind::Error => Color::Red,
                StatusKind::Success => Color::Green,
            };
            lines.push(Line::from(Span::styled(
                status.text.clone(),
                Style::default().fg(color),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Select a cell, then type",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(Span::styled(
                "a number.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let panel = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn draw_key_hints(f: &mut Frame, area: Rect) {
    let hints = Paragraph::new(Line::from(Span::styled(
        "↑↓←→ move · Enter select · 1-9 place · 0/Del clear · c check · n new game · q quit",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hints, area);
}

// ── Popups ───────────────────────────────────────────────────────────────────

fn draw_solved_banner(f: &mut Frame) {
    let area = center_rect(44, 6, f.area());
    f.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Double)
        .style(Style::default().fg(Color::Green));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "You solved the puzzle!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "n: new game · q: quit",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(text, area);
}

fn draw_quit_confirm(f: &mut Frame) {
    let area = center_rect(34, 5, f.area());
    f.render_widget(Clear, area);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Red));

    let text = Paragraph::new(vec![
        Line::from(Span::styled("Quit?", Style::default().fg(Color::White))),
        Line::from(Span::styled(
            "y: quit · any other key: stay",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(block);

    f.render_widget(text, area);
}

fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
