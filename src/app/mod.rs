//! Application orchestration: state, event channel, and input handling.

pub mod event;
pub mod handler;
pub mod state;
