use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One observation on the time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Trend/seasonal/residual arrays aligned index-by-index with the points.
///
/// Alignment is what the service promises, not something it proves: the
/// arrays may come back shorter or longer than the axis. Entries may be
/// `null` (moving-window trends are undefined at the edges).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    #[serde(default)]
    pub trend: Vec<Option<f64>>,
    #[serde(default)]
    pub seasonal: Vec<Option<f64>>,
    #[serde(default)]
    pub residual: Vec<Option<f64>>,
}

impl Decomposition {
    pub fn component(&self, component: Component) -> &[Option<f64>] {
        match component {
            Component::Trend => &self.trend,
            Component::Seasonal => &self.seasonal,
            Component::Residual => &self.residual,
        }
    }
}

/// Decomposition component selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Trend,
    Seasonal,
    Residual,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Trend, Component::Seasonal, Component::Residual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Trend => "trend",
            Component::Seasonal => "seasonal",
            Component::Residual => "residual",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Component::Trend => "Trend",
            Component::Seasonal => "Seasonal",
            Component::Residual => "Residual",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of `GET /metrics/timeseries`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesResult {
    pub metric: String,
    #[serde(rename = "timeseries", default)]
    pub points: Vec<TimeSeriesPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decomposition: Option<Decomposition>,
}

impl TimeSeriesResult {
    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.timestamp)
    }
}

/// Parse the timestamp shapes the analytics service emits.
///
/// RFC 3339 is preferred; naive date-times and bare dates are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-05T08:00:00-08:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp("2024-01-05T00:00:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_timestamp("2024-01-05").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_deserialize_without_decomposition() {
        let json = r#"{
            "metric": "HeartRate",
            "timeseries": [
                {"timestamp": "2024-01-01T00:00:00", "value": 61.5},
                {"timestamp": "2024-01-02T00:00:00", "value": 64.0}
            ],
            "decomposition": null
        }"#;

        let result: TimeSeriesResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.points[1].value, 64.0);
        assert!(result.decomposition.is_none());
    }

    #[test]
    fn test_deserialize_rejects_bad_timestamp() {
        let json = r#"{"metric": "HeartRate", "timeseries": [{"timestamp": "soon", "value": 1.0}]}"#;
        let err = serde_json::from_str::<TimeSeriesResult>(json).unwrap_err();
        assert!(err.to_string().contains("invalid timestamp"));
    }

    #[test]
    fn test_component_lookup() {
        let decomposition = Decomposition {
            trend: vec![Some(1.0), None],
            seasonal: vec![Some(0.5)],
            residual: vec![],
        };
        assert_eq!(decomposition.component(Component::Trend), &[Some(1.0), None]);
        assert_eq!(decomposition.component(Component::Seasonal).len(), 1);
        assert!(decomposition.component(Component::Residual).is_empty());
    }
}
