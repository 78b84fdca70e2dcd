//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer turns accordion render passes into cells on the terminal.
//! No persistence happens here.

pub mod accordion_widget;
pub mod layout;
pub mod theme;
