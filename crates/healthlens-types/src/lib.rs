pub mod error;
pub mod insights;
pub mod metric;
pub mod query;
pub mod timeseries;

pub use error::{Result, ValidationError};
pub use insights::{InsightsData, MetricSummary, UploadResponse};
pub use metric::{AVAILABLE_METRICS, Metric, humanize};
pub use query::{QuerySelection, TimeSeriesQuery};
pub use timeseries::{Component, Decomposition, TimeSeriesPoint, TimeSeriesResult, parse_timestamp};
