//! BTC price status bar.
//!
//! Keeps a live BTC price (from a streaming ticker feed or a polled spot
//! endpoint), the user's holdings, and an exchange rate for a second
//! display currency, and renders them as a compact terminal status bar.

pub mod config;
pub mod error;
pub mod format;
pub mod holdings;
pub mod models;
pub mod poller;
pub mod prompt;
pub mod rest;
pub mod state;
pub mod tls;
pub mod tui;
pub mod websocket;

pub use error::{BtcBarError, Result};
