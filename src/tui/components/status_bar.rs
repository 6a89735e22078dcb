//! Status bar component: the title plus source health.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::config::PriceSourceKind;
use crate::tui::app::App;
use crate::websocket::ConnectionState;

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let title_style = if app.price_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    };

    let status_color = match (app.source, app.connection_status) {
        (PriceSourceKind::Poll, _) if app.price_error => Color::Red,
        (PriceSourceKind::Poll, _) | (_, ConnectionState::Subscribed) => Color::Green,
        (_, ConnectionState::Connecting | ConnectionState::Backoff) => Color::Yellow,
        (_, ConnectionState::Disconnected) => Color::Red,
    };

    let updated = match app.last_tick {
        Some(at) => format!(" updated {}s ago ", at.elapsed().as_secs()),
        None => " waiting for price ".to_string(),
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", app.title()), title_style),
        Span::raw("│"),
        Span::styled(
            format!(" {} ", app.source_label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        error_span,
    ];

    // Right-align the freshness indicator in whatever space is left.
    let used: usize = spans.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(used + updated.width());
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(updated, Style::default().fg(Color::Gray)));

    let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
