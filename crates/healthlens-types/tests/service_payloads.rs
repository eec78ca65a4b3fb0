use chrono::{TimeZone, Utc};
use healthlens_types::{
    Component, InsightsData, Metric, QuerySelection, TimeSeriesResult, UploadResponse,
    ValidationError,
};

#[test]
fn test_decomposed_series_with_space_separated_timestamps() {
    let json = r#"{
        "metric": "StepCount",
        "timeseries": [
            {"timestamp": "2024-03-01 00:00:00", "value": 8123.0},
            {"timestamp": "2024-03-02 00:00:00", "value": 10450.0},
            {"timestamp": "2024-03-03 00:00:00", "value": 3021.0}
        ],
        "decomposition": {
            "trend": [7000.0, 7100.0, 7200.0],
            "seasonal": [1000.0, 3000.0],
            "residual": [123.0, 350.0, -4179.0, 12.0]
        }
    }"#;

    let result: TimeSeriesResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.metric, "StepCount");
    assert_eq!(
        result.timestamps().collect::<Vec<_>>(),
        vec![
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 3, 0, 0, 0).unwrap(),
        ]
    );

    // arrays come through as sent; alignment is the reshaper's concern
    let decomposition = result.decomposition.unwrap();
    assert_eq!(decomposition.component(Component::Trend).len(), 3);
    assert_eq!(decomposition.component(Component::Seasonal).len(), 2);
    assert_eq!(decomposition.component(Component::Residual).len(), 4);
}

#[test]
fn test_null_decomposition_entries_are_kept_as_gaps() {
    let json = r#"{
        "metric": "HeartRate",
        "timeseries": [
            {"timestamp": "2024-01-01", "value": 60.0},
            {"timestamp": "2024-01-02", "value": 62.0},
            {"timestamp": "2024-01-03", "value": 61.0}
        ],
        "decomposition": {
            "trend": [null, 61.0, null],
            "seasonal": [-1.0, 1.0, 0.0],
            "residual": [null, 0.0, null]
        }
    }"#;

    let result: TimeSeriesResult = serde_json::from_str(json).unwrap();
    let decomposition = result.decomposition.unwrap();
    assert_eq!(
        decomposition.component(Component::Trend),
        &[None, Some(61.0), None]
    );
    assert_eq!(decomposition.component(Component::Seasonal).len(), 3);
}

#[test]
fn test_missing_timeseries_is_empty() {
    let result: TimeSeriesResult = serde_json::from_str(r#"{"metric": "HeartRate"}"#).unwrap();
    assert!(result.points.is_empty());
    assert!(result.decomposition.is_none());
}

#[test]
fn test_insights_payload() {
    let json = r#"{
        "summary": {
            "StepCount": {"mean": 7512.3, "min": 120.0, "max": 21034.0},
            "HeartRate": {"mean": 71.8, "min": 48.0, "max": 172.0}
        },
        "correlations": {
            "HeartRate_vs_StepCount": 0.12,
            "ActiveEnergyBurned_vs_StepCount": 0.87
        }
    }"#;

    let insights: InsightsData = serde_json::from_str(json).unwrap();
    let names: Vec<&str> = insights.summary.keys().map(String::as_str).collect();
    assert_eq!(names, ["HeartRate", "StepCount"]);

    let strong: Vec<&str> = insights
        .correlations
        .iter()
        .filter(|(_, r)| InsightsData::is_strong(**r))
        .map(|(pair, _)| pair.as_str())
        .collect();
    assert_eq!(strong, ["ActiveEnergyBurned_vs_StepCount"]);
}

#[test]
fn test_upload_payload() {
    let json = r#"{"status": "success", "records_loaded": 48211, "message": "File processed successfully"}"#;
    let response: UploadResponse = serde_json::from_str(json).unwrap();
    assert_eq!(
        response.summary(),
        "File processed successfully - 48211 records loaded."
    );
}

#[test]
fn test_selection_to_query_parameters() {
    let mut selection = QuerySelection::new("DistanceWalkingRunning");
    selection.set_start_date("2024-01-01");
    selection.set_end_date("   ");
    selection.set_decompose(true);

    let query = selection.validate().unwrap();
    assert_eq!(query.metric, Metric::DistanceWalkingRunning);
    insta::assert_debug_snapshot!(query.query_pairs(), @r#"
    [
        (
            "metric",
            "DistanceWalkingRunning",
        ),
        (
            "start_date",
            "2024-01-01",
        ),
        (
            "decompose",
            "true",
        ),
    ]
    "#);
}

#[test]
fn test_selection_rejects_blank_metric() {
    let selection = QuerySelection::new("  ");
    assert_eq!(selection.validate(), Err(ValidationError::MissingMetric));
    assert_eq!(
        selection.validate().unwrap_err().to_string(),
        "Please select a metric."
    );
}
