//! Modal holdings entry dialog drawn over the menu.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::tui::app::App;

/// Renders the dialog centered in `area` and places the cursor in the field.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(area, 44, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Set Holdings ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let prompt = Line::from(Span::styled(
        format!("Enter your {} holdings:", app.asset),
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(Paragraph::new(prompt), rows[0]);
    frame.render_widget(
        Paragraph::new(app.holdings_input.as_str()).style(Style::default().fg(Color::White)),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter save · Esc cancel",
            Style::default().fg(Color::DarkGray),
        )),
        rows[2],
    );

    let cursor_x = rows[1].x + (app.holdings_input.cursor_width() as u16).min(rows[1].width);
    frame.set_cursor_position(Position::new(cursor_x, rows[1].y));
}

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
