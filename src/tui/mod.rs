//! Terminal status bar for btcbar.
//!
//! Provides a Ratatui-based stand-in for an OS menu bar: a title line with
//! the live price, and a menu with holdings, worth and actions.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod menu;
pub mod runner;
pub mod terminal;
pub mod ui;

pub use app::App;
pub use event::{Action, Event, Message};
pub use runner::{ActionHandler, run};
pub use terminal::{Tui, install_panic_hook, restore_terminal, setup_terminal};
pub use ui::render;
