//! Reusable UI pieces.

pub mod holdings_dialog;
pub mod menu_list;
pub mod status_bar;
