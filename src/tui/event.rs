//! Event handling for the TUI.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::holdings::parse_holdings_input;
use crate::state::PriceReading;
use crate::websocket::ConnectionState;

use super::app::{App, Mode};
use super::input::text_input::TextInput;
use super::menu::MenuAction;

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI updates.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    /// Input event from terminal.
    Input(Event),

    /// Accepted price reading from the active source.
    Price(PriceReading),
    /// A poll of the price source failed.
    PriceError(String),
    /// Fresh conversion rate into the display currency.
    ExchangeRate(f64),

    /// Feed connection changed state.
    Connection(ConnectionState),
    /// The feed reported an error frame.
    FeedError(String),

    /// Answer from the native holdings dialog; `None` if cancelled.
    HoldingsEntered(Option<String>),
    /// The native holdings dialog could not be launched.
    PromptUnavailable(String),

    /// Request to quit the application.
    Quit,
}

/// Actions that require external handling (I/O outside the UI loop).
#[derive(Debug, PartialEq)]
pub enum Action {
    /// Poll the price and exchange rate now.
    Refresh,
    /// Open the native holdings dialog prefilled with `default`.
    PromptHoldings { default: String },
    /// Write the new holdings to disk.
    PersistHoldings(f64),
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            // Poll for events with a 50ms timeout
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Spawns a task that turns SIGINT into a quit request.
pub fn spawn_shutdown_listener(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, quitting");
            let _ = tx.send(Message::Quit);
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Price(reading) => {
            app.tracker.apply_price(reading);
            app.price_error = false;
            app.last_tick = Some(Instant::now());
            None
        }
        Message::PriceError(error) => {
            app.price_error = true;
            app.show_error(error);
            None
        }
        Message::ExchangeRate(rate) => {
            app.tracker.set_fx_rate(rate);
            None
        }
        Message::Connection(state) => {
            app.connection_status = state;
            None
        }
        Message::FeedError(error) => {
            app.show_error(error);
            None
        }
        Message::HoldingsEntered(answer) => {
            app.prompt_open = false;
            answer.and_then(|text| apply_holdings_input(app, &text))
        }
        Message::PromptUnavailable(reason) => {
            warn!(reason, "Native dialog unavailable, switching to terminal input");
            app.prompt_open = false;
            app.native_prompt = false;
            app.show_error(format!("Dialog unavailable: {reason}"));
            open_holdings_entry(app)
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Parses entered holdings, applies them and asks for them to be saved.
fn apply_holdings_input(app: &mut App, text: &str) -> Option<Action> {
    match parse_holdings_input(text) {
        Some(quantity) => {
            app.tracker.set_holdings(quantity);
            info!(quantity, "Holdings updated");
            Some(Action::PersistHoldings(quantity))
        }
        None => {
            warn!(input = text, "Rejected holdings input");
            app.show_error(format!("Invalid holdings: {}", text.trim()));
            None
        }
    }
}

/// Runs a menu action.
fn activate(app: &mut App, action: MenuAction) -> Option<Action> {
    match action {
        MenuAction::Refresh => Some(Action::Refresh),
        MenuAction::SetHoldings => open_holdings_entry(app),
        MenuAction::Quit => {
            app.should_quit = true;
            None
        }
    }
}

/// Opens the native dialog, or the terminal dialog when there is none.
fn open_holdings_entry(app: &mut App) -> Option<Action> {
    let default = app.holdings_default();

    if app.native_prompt {
        if app.prompt_open {
            return None;
        }
        app.prompt_open = true;
        return Some(Action::PromptHoldings { default });
    }

    app.holdings_input = TextInput::with_content(default);
    app.mode = Mode::EditHoldings;
    None
}

/// Handles input events and updates application state.
fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_errors();
            None
        }
    }
}

/// Handles key press events.
fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    // Raw mode swallows SIGINT, so Ctrl-C arrives as a key.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }

    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::EditHoldings => handle_edit_mode(app, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.select_next();
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.select_previous();
            None
        }
        KeyCode::Enter => {
            let action = app.selected_action();
            activate(app, action)
        }
        KeyCode::Char(c) => MenuAction::ALL
            .iter()
            .find(|action| action.shortcut() == c)
            .and_then(|action| activate(app, *action)),
        _ => None,
    }
}

/// Handles keys while the terminal holdings dialog is open.
fn handle_edit_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => {
            let text = app.holdings_input.take();
            app.mode = Mode::Normal;
            apply_holdings_input(app, &text)
        }
        KeyCode::Esc => {
            app.holdings_input.take();
            app.mode = Mode::Normal;
            None
        }
        KeyCode::Char(c) => {
            app.holdings_input.insert(c);
            None
        }
        KeyCode::Backspace => {
            app.holdings_input.backspace();
            None
        }
        KeyCode::Delete => {
            app.holdings_input.delete();
            None
        }
        KeyCode::Left => {
            app.holdings_input.move_left();
            None
        }
        KeyCode::Right => {
            app.holdings_input.move_right();
            None
        }
        KeyCode::Home => {
            app.holdings_input.move_home();
            None
        }
        KeyCode::End => {
            app.holdings_input.move_end();
            None
        }
        _ => None,
    }
}
