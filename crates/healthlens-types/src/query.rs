use serde::{Deserialize, Serialize};

use crate::{AVAILABLE_METRICS, Metric, Result};

/// The user's current time-series selection.
///
/// Every setter replaces exactly one field. Nothing here talks to the
/// network; a fetch only happens when the caller freezes a snapshot with
/// [`QuerySelection::validate`] and hands it to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySelection {
    metric: String,
    start_date: String,
    end_date: String,
    decompose: bool,
}

impl QuerySelection {
    pub fn new(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            start_date: String::new(),
            end_date: String::new(),
            decompose: false,
        }
    }

    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn decompose(&self) -> bool {
        self.decompose
    }

    pub fn set_metric(&mut self, metric: impl Into<String>) {
        self.metric = metric.into();
    }

    pub fn set_start_date(&mut self, date: impl Into<String>) {
        self.start_date = date.into();
    }

    pub fn set_end_date(&mut self, date: impl Into<String>) {
        self.end_date = date.into();
    }

    pub fn set_decompose(&mut self, decompose: bool) {
        self.decompose = decompose;
    }

    /// Freeze the selection into a request snapshot.
    ///
    /// Only the metric is checked. Dates are trimmed and dropped when
    /// blank, otherwise forwarded as typed; the service decides whether
    /// they make sense.
    pub fn validate(&self) -> Result<TimeSeriesQuery> {
        let metric: Metric = self.metric.parse()?;

        Ok(TimeSeriesQuery {
            metric,
            start_date: non_blank(&self.start_date),
            end_date: non_blank(&self.end_date),
            decompose: self.decompose,
        })
    }
}

impl Default for QuerySelection {
    fn default() -> Self {
        Self::new(AVAILABLE_METRICS[0].as_str())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Immutable snapshot of a validated selection, as sent to the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesQuery {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub decompose: bool,
}

impl TimeSeriesQuery {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            start_date: None,
            end_date: None,
            decompose: false,
        }
    }

    /// URL query pairs. Absent dates are omitted and `decompose` is only
    /// sent when true.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("metric", self.metric.as_str().to_string())];
        if let Some(start) = &self.start_date {
            pairs.push(("start_date", start.clone()));
        }
        if let Some(end) = &self.end_date {
            pairs.push(("end_date", end.clone()));
        }
        if self.decompose {
            pairs.push(("decompose", "true".to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn test_default_selection_uses_first_metric() {
        let selection = QuerySelection::default();
        assert_eq!(selection.metric(), "HeartRate");
        assert!(!selection.decompose());
    }

    #[test]
    fn test_setters_replace_single_field() {
        let mut selection = QuerySelection::default();
        selection.set_start_date("2024-01-01");
        selection.set_decompose(true);

        assert_eq!(selection.metric(), "HeartRate");
        assert_eq!(selection.start_date(), "2024-01-01");
        assert_eq!(selection.end_date(), "");
        assert!(selection.decompose());
    }

    #[test]
    fn test_validate_rejects_empty_metric() {
        let selection = QuerySelection::new("");
        assert_eq!(selection.validate(), Err(ValidationError::MissingMetric));
    }

    #[test]
    fn test_validate_passes_dates_through() {
        let mut selection = QuerySelection::new("StepCount");
        selection.set_start_date(" not-a-date ");
        selection.set_end_date("   ");

        let query = selection.validate().unwrap();
        assert_eq!(query.metric, Metric::StepCount);
        assert_eq!(query.start_date.as_deref(), Some("not-a-date"));
        assert_eq!(query.end_date, None);
    }

    #[test]
    fn test_query_pairs_omit_absent_fields() {
        let query = TimeSeriesQuery::new(Metric::HeartRate);
        assert_eq!(
            query.query_pairs(),
            vec![("metric", "HeartRate".to_string())]
        );
    }

    #[test]
    fn test_query_pairs_with_everything() {
        let query = TimeSeriesQuery {
            metric: Metric::HeartRate,
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-14".to_string()),
            decompose: true,
        };

        let pairs = query.query_pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[3], ("decompose", "true".to_string()));
    }
}
