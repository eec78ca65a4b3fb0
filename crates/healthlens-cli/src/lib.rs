// NOTE: healthlens layout
//
// The analytics service does all parsing and statistics. This binary is a
// client: it uploads exports, prints insights, and drives the time-series
// dashboard. State lives in healthlens-engine; this crate supplies the I/O
// around it (HTTP via healthlens-client, terminal via ratatui).
//
// - handlers/:     one module per subcommand
// - services/:     async query driver bridging tokio and the UI thread
// - presentation/: console formatting and the TUI

mod args;
mod commands;
pub mod config;
mod handlers;
pub mod logging;
pub mod presentation;
pub mod services;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
