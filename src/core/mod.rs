//! Core model – folder nodes, expansion state, persistence, and the
//! accordion controller.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod accordion;
pub mod expansion;
pub mod node;
pub mod store;
