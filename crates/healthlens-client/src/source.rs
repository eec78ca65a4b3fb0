use std::future::Future;

use healthlens_types::{TimeSeriesQuery, TimeSeriesResult};

use crate::{AnalyticsClient, Result};

/// Anything that can answer a time-series query.
///
/// The HTTP client is the production implementation; the dashboard driver
/// only depends on this trait.
pub trait TimeSeriesSource: Send + Sync {
    fn fetch_time_series(
        &self,
        query: &TimeSeriesQuery,
    ) -> impl Future<Output = Result<TimeSeriesResult>> + Send;
}

impl TimeSeriesSource for AnalyticsClient {
    fn fetch_time_series(
        &self,
        query: &TimeSeriesQuery,
    ) -> impl Future<Output = Result<TimeSeriesResult>> + Send {
        AnalyticsClient::fetch_time_series(self, query)
    }
}
