//! Input widgets.

pub mod text_input;
