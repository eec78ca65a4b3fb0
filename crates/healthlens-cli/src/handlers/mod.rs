mod context;

pub mod config;
pub mod dashboard;
pub mod insights;
pub mod metrics;
pub mod timeseries;
pub mod upload;

pub use context::HandlerContext;
