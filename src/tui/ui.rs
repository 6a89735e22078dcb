//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::app::{App, Mode};
use super::components::{holdings_dialog, menu_list, status_bar};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status bar
            Constraint::Min(5),    // Menu
            Constraint::Length(1), // Keybindings help
        ])
        .split(area);

    status_bar::render(frame, layout[0], app);
    menu_list::render(frame, layout[1], app);
    render_keybindings(frame, layout[2], app);

    if app.mode == Mode::EditHoldings {
        holdings_dialog::render(frame, layout[1], app);
    }
}

/// Renders the keybindings help line for the current mode.
fn render_keybindings(frame: &mut Frame, area: Rect, app: &App) {
    let bindings: &[(&str, &str)] = match app.mode {
        Mode::Normal => &[
            ("↑/↓", "select"),
            ("Enter", "activate"),
            ("r", "refresh"),
            ("h", "holdings"),
            ("q", "quit"),
        ],
        Mode::EditHoldings => &[("Enter", "save"), ("Esc", "cancel")],
    };

    let spans: Vec<Span> = bindings
        .iter()
        .flat_map(|(key, help)| {
            [
                Span::styled(format!(" {key} "), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{help} "), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
