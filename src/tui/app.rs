//! Application state for the TUI.

use std::time::{Duration, Instant};

use crate::config::PriceSourceKind;
use crate::format::format_amount;
use crate::state::TrackerState;
use crate::websocket::ConnectionState;

use super::input::text_input::TextInput;
use super::menu::{MenuAction, MenuItem};

/// How long an error stays in the status bar.
const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Tracked Values --
    /// Price, holdings and exchange rate.
    pub tracker: TrackerState,
    /// Base asset symbol, e.g. `BTC`.
    pub asset: String,
    /// Currency prices arrive in.
    pub price_currency: String,
    /// Which price source feeds this app.
    pub source: PriceSourceKind,
    /// Set after a failed poll, cleared by the next good reading.
    pub price_error: bool,
    /// When the last reading was accepted.
    pub last_tick: Option<Instant>,

    // -- UI State --
    /// Current input mode.
    pub mode: Mode,
    /// Terminal holdings entry field.
    pub holdings_input: TextInput,
    /// Index of the selected entry in [`MenuAction::ALL`].
    pub menu_index: usize,
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,
    /// Holdings are collected with a native dialog instead of the terminal.
    pub native_prompt: bool,
    /// A native dialog is currently open.
    pub prompt_open: bool,

    // -- Connection State --
    /// Feed connection status (stream source only).
    pub connection_status: ConnectionState,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App around the given tracker state.
    pub fn new(
        tracker: TrackerState,
        asset: impl Into<String>,
        price_currency: impl Into<String>,
        source: PriceSourceKind,
        native_prompt: bool,
    ) -> Self {
        Self {
            tracker,
            asset: asset.into(),
            price_currency: price_currency.into(),
            source,
            price_error: false,
            last_tick: None,

            mode: Mode::Normal,
            holdings_input: TextInput::new(),
            menu_index: 0,
            error_message: None,
            native_prompt,
            prompt_open: false,

            connection_status: ConnectionState::Disconnected,

            should_quit: false,
        }
    }

    /// Text shown where a menu bar would show its title.
    pub fn title(&self) -> String {
        if self.price_error {
            return format!("{} Error", self.asset);
        }

        match self.tracker.price() {
            Some(reading) => format!("₿ ${}", format_amount(reading.amount)),
            None => self.asset.clone(),
        }
    }

    /// Whether prices are converted into a separate display currency.
    pub fn converts(&self) -> bool {
        self.price_currency != self.tracker.display_currency()
    }

    /// Builds the menu: disabled info rows followed by the actions.
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let display = self.tracker.display_currency();
        let mut items = Vec::with_capacity(8);

        if self.converts() {
            items.push(MenuItem::info(format!(
                "{display}: {}",
                money(self.tracker.converted_price())
            )));
        }
        items.push(MenuItem::info(format!(
            "Holdings: {:.8} {}",
            self.tracker.holdings(),
            self.asset
        )));
        items.push(MenuItem::info(format!(
            "Worth: {} {}",
            money(self.tracker.worth()),
            self.price_currency
        )));
        if self.converts() {
            items.push(MenuItem::info(format!(
                "Worth: {} {display}",
                money(self.tracker.converted_worth())
            )));
        }

        items.push(MenuItem::separator());
        items.extend(MenuAction::ALL.iter().map(|action| MenuItem::action(*action)));
        items
    }

    /// The currently selected action.
    pub fn selected_action(&self) -> MenuAction {
        MenuAction::ALL[self.menu_index.min(MenuAction::ALL.len() - 1)]
    }

    /// Moves the selection down, wrapping around.
    pub fn select_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MenuAction::ALL.len();
    }

    /// Moves the selection up, wrapping around.
    pub fn select_previous(&mut self) {
        self.menu_index = self
            .menu_index
            .checked_sub(1)
            .unwrap_or(MenuAction::ALL.len() - 1);
    }

    /// Holdings formatted for prefilling an input field.
    pub fn holdings_default(&self) -> String {
        let fixed = format!("{:.8}", self.tracker.holdings());
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    }

    /// Sets an error message to display.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears error messages older than 5 seconds.
    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > ERROR_DISPLAY_DURATION
        {
            self.error_message = None;
        }
    }

    /// Label for the price source status.
    pub fn source_label(&self) -> &'static str {
        match self.source {
            PriceSourceKind::Stream => self.connection_status.label(),
            PriceSourceKind::Poll if self.price_error => "Poll failed",
            PriceSourceKind::Poll => "Polling",
        }
    }
}

/// Formats an optional amount as `$1,234.56`, or `--` when unknown.
fn money(amount: Option<f64>) -> String {
    match amount {
        Some(amount) => format!("${}", format_amount(amount)),
        None => "--".to_string(),
    }
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// The terminal holdings dialog is open.
    EditHoldings,
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PriceReading;

    fn stream_app(holdings: f64) -> App {
        App::new(
            TrackerState::new(holdings, "CAD"),
            "BTC",
            "USD",
            PriceSourceKind::Stream,
            false,
        )
    }

    fn labels(app: &App) -> Vec<String> {
        app.menu_items().into_iter().map(|item| item.label).collect()
    }

    #[test]
    fn title_before_and_after_first_price() {
        let mut app = stream_app(0.0);
        assert_eq!(app.title(), "BTC");

        app.tracker.apply_price(PriceReading::new(64_123.456, "USD"));
        assert_eq!(app.title(), "₿ $64,123.46");

        app.price_error = true;
        assert_eq!(app.title(), "BTC Error");
    }

    #[test]
    fn menu_shows_conversion_rows_for_stream() {
        let mut app = stream_app(0.5);
        app.tracker.apply_price(PriceReading::new(60_000.0, "USD"));

        let rows = labels(&app);
        assert_eq!(rows[0], "CAD: $0.00");
        assert_eq!(rows[1], "Holdings: 0.50000000 BTC");
        assert_eq!(rows[2], "Worth: $30,000.00 USD");
        assert_eq!(rows[3], "Worth: $0.00 CAD");

        app.tracker.set_fx_rate(1.5);
        let rows = labels(&app);
        assert_eq!(rows[0], "CAD: $90,000.00");
        assert_eq!(rows[3], "Worth: $45,000.00 CAD");
    }

    #[test]
    fn menu_hides_conversion_when_currencies_match() {
        let app = App::new(
            TrackerState::new(1.0, "CAD"),
            "BTC",
            "CAD",
            PriceSourceKind::Poll,
            false,
        );

        let rows = labels(&app);
        assert_eq!(rows[0], "Holdings: 1.00000000 BTC");
        assert_eq!(rows[1], "Worth: -- CAD");
        assert!(rows.iter().all(|l| !l.starts_with("CAD:")));
    }

    #[test]
    fn selection_wraps() {
        let mut app = stream_app(0.0);
        assert_eq!(app.selected_action(), MenuAction::Refresh);
        app.select_previous();
        assert_eq!(app.selected_action(), MenuAction::Quit);
        app.select_next();
        assert_eq!(app.selected_action(), MenuAction::Refresh);
    }

    #[test]
    fn holdings_default_trims_zeros() {
        assert_eq!(stream_app(0.0).holdings_default(), "0");
        assert_eq!(stream_app(1.25).holdings_default(), "1.25");
        assert_eq!(stream_app(10.0).holdings_default(), "10");
    }
}
