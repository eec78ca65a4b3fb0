use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of `POST /upload`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub records_loaded: u64,
    pub message: String,
}

impl UploadResponse {
    /// Banner text shown after a successful upload
    pub fn summary(&self) -> String {
        format!("{} - {} records loaded.", self.message, self.records_loaded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Response of `GET /metrics/insights`
///
/// Maps are ordered so listings are stable between runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InsightsData {
    #[serde(default)]
    pub summary: BTreeMap<String, MetricSummary>,
    #[serde(default)]
    pub correlations: BTreeMap<String, f64>,
}

impl InsightsData {
    /// Correlations strong enough to call out (|r| > 0.5)
    pub fn is_strong(value: f64) -> bool {
        value.abs() > 0.5
    }
}
