//! Menu list component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::tui::app::{App, Mode};

/// Renders the info rows and actions, highlighting the selected action.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let selected = app.selected_action();
    let dimmed = app.mode != Mode::Normal;

    let lines: Vec<Line> = app
        .menu_items()
        .into_iter()
        .map(|item| match item.action {
            None => Line::from(Span::styled(
                format!("  {}", item.label),
                Style::default().fg(Color::DarkGray),
            )),
            Some(action) => {
                let style = if action == selected && !dimmed {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(format!("  {}  ", item.label), style),
                    Span::styled(
                        format!("({})", action.shortcut()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.asset));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
