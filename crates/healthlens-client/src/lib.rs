//! Access to the remote analytics service.
//!
//! The service owns parsing of the health export and every statistic; this
//! crate only moves requests and payloads across HTTP and turns failures into
//! [`FetchError`] values with a message fit for display.

pub mod client;
pub mod error;
mod payload;
pub mod source;

pub use client::{AnalyticsClient, ClientOptions, DEFAULT_BASE_URL, validate_export_file};
pub use error::{FetchError, Result};
pub use payload::Operation;
pub use source::TimeSeriesSource;
