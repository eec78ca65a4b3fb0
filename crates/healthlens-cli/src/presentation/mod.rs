//! Presentation: console output for one-shot commands and the interactive
//! dashboard.
//!
//! - `formatters/`: small string helpers shared by both surfaces
//! - `console.rs`: view models and renderers for plain/JSON/CSV output
//! - `tui/`: ratatui dashboard and the terminal chart backend

pub mod console;
pub mod formatters;
pub mod tui;
