use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use healthlens_engine::{PanelLayout, format_axis_label};
use healthlens_types::{AVAILABLE_METRICS, InsightsData, humanize};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::formatters::{format_value, pad};
use crate::types::OutputFormat;

/// Tabular form of a composed layout: one column per panel, one row per
/// timestamp on the shared axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesRow {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<Option<f64>>,
}

impl SeriesTable {
    pub fn from_layout(layout: &PanelLayout) -> Option<Self> {
        let panels = layout.panels();
        let first = panels.first()?;

        let columns = panels
            .iter()
            .flat_map(|p| p.series.iter().map(|s| s.label.clone()))
            .collect();

        let rows = first
            .axis
            .iter()
            .enumerate()
            .map(|(i, ts)| SeriesRow {
                timestamp: *ts,
                values: panels
                    .iter()
                    .flat_map(|p| p.series.iter().map(move |s| s.values.get(i).copied().flatten()))
                    .collect(),
            })
            .collect();

        Some(Self {
            title: first.title.clone(),
            columns,
            rows,
        })
    }
}

pub fn write_table<W: Write>(out: &mut W, table: &SeriesTable, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, table)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            let mut header = vec!["timestamp".to_string()];
            header.extend(table.columns.iter().cloned());
            writer.write_record(&header)?;
            for row in &table.rows {
                let mut record = vec![row.timestamp.to_rfc3339()];
                record.extend(
                    row.values
                        .iter()
                        .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
                );
                writer.write_record(&record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Plain => {
            writeln!(out, "{} ({} points)", table.title, table.rows.len())?;
            let mut header = pad("Date", 8);
            for column in &table.columns {
                header.push_str(&pad(column, 14));
            }
            writeln!(out, "{}", header.trim_end())?;
            for row in &table.rows {
                let mut line = pad(&format_axis_label(row.timestamp), 8);
                for value in &row.values {
                    line.push_str(&pad(&format_value(*value), 14));
                }
                writeln!(out, "{}", line.trim_end())?;
            }
        }
    }
    Ok(())
}

pub fn write_insights<W: Write>(
    out: &mut W,
    insights: &InsightsData,
    format: OutputFormat,
    color: bool,
) -> Result<()> {
    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, insights)?;
        writeln!(out)?;
        return Ok(());
    }

    if format == OutputFormat::Csv {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(["kind", "name", "min", "mean", "max", "correlation"])?;
        for (metric, s) in &insights.summary {
            let (min, mean, max) = (s.min.to_string(), s.mean.to_string(), s.max.to_string());
            writer.write_record([
                "summary",
                metric.as_str(),
                min.as_str(),
                mean.as_str(),
                max.as_str(),
                "",
            ])?;
        }
        for (pair, r) in &insights.correlations {
            let r = r.to_string();
            writer.write_record(["correlation", pair.as_str(), "", "", "", r.as_str()])?;
        }
        writer.flush()?;
        return Ok(());
    }

    let heading = |text: &str| {
        if color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    };

    writeln!(out, "{}", heading("Metric Summaries"))?;
    if insights.summary.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (metric, s) in &insights.summary {
        writeln!(
            out,
            "  {}min {:>10.2}  mean {:>10.2}  max {:>10.2}",
            pad(&humanize(metric), 28),
            s.min,
            s.mean,
            s.max
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", heading("Insight Summary"))?;
    if insights.correlations.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (pair, r) in &insights.correlations {
        let value = format!("{:>6.2}", r);
        let value = if color && InsightsData::is_strong(*r) {
            value.cyan().bold().to_string()
        } else if InsightsData::is_strong(*r) {
            format!("{} *", value)
        } else {
            value
        };
        writeln!(out, "  {}{}", pad(&humanize(pair), 44), value)?;
    }

    Ok(())
}

pub fn write_metrics<W: Write>(out: &mut W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = AVAILABLE_METRICS
                .iter()
                .map(|m| serde_json::json!({ "id": m.as_str(), "label": m.label() }))
                .collect();
            serde_json::to_writer_pretty(&mut *out, &entries)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(["id", "label"])?;
            for m in AVAILABLE_METRICS {
                writer.write_record([m.as_str(), m.label().as_str()])?;
            }
            writer.flush()?;
        }
        OutputFormat::Plain => {
            for m in AVAILABLE_METRICS {
                writeln!(out, "{}{}", pad(m.as_str(), 26), m.label())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use healthlens_engine::{RequestState, compose};
    use healthlens_types::{Decomposition, MetricSummary, TimeSeriesPoint, TimeSeriesResult};
    use std::collections::BTreeMap;

    fn layout() -> PanelLayout {
        let result = TimeSeriesResult {
            metric: "HeartRate".to_string(),
            points: (0..3)
                .map(|i| TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i, 0, 0, 0).unwrap(),
                    value: 60.0 + i as f64,
                })
                .collect(),
            decomposition: Some(Decomposition {
                trend: vec![Some(60.5), Some(61.0)],
                seasonal: vec![Some(-0.5), Some(0.0)],
                residual: vec![Some(0.0), Some(0.0)],
            }),
        };
        compose(&RequestState::Success(result))
    }

    fn render(format: OutputFormat) -> String {
        let table = SeriesTable::from_layout(&layout()).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &table, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_from_placeholder_is_none() {
        assert!(SeriesTable::from_layout(&PanelLayout::Progress).is_none());
    }

    #[test]
    fn test_plain_table() {
        insta::assert_snapshot!(render(OutputFormat::Plain), @r"
        Heart Rate Time Series (3 points)
        Date    Heart Rate    Trend         Seasonal      Residual
        Jan 1   60.00         60.50         -0.50         0.00
        Jan 2   61.00         61.00         0.00          0.00
        Jan 3   62.00         -             -             -
        ");
    }

    #[test]
    fn test_csv_table_leaves_gaps_empty() {
        let csv = render(OutputFormat::Csv);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "timestamp,Heart Rate,Trend,Seasonal,Residual");
        assert_eq!(lines[3], "2024-01-03T00:00:00+00:00,62,,,");
    }

    #[test]
    fn test_json_table() {
        let json: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(json["columns"].as_array().unwrap().len(), 4);
        assert!(json["rows"][2]["values"][1].is_null());
    }

    #[test]
    fn test_insights_plain_marks_strong_correlations() {
        let mut summary = BTreeMap::new();
        summary.insert(
            "HeartRate".to_string(),
            MetricSummary {
                mean: 72.0,
                min: 50.0,
                max: 150.0,
            },
        );
        let mut correlations = BTreeMap::new();
        correlations.insert("HeartRate_vs_StepCount".to_string(), 0.62);
        correlations.insert("StepCount_vs_FlightsClimbed".to_string(), 0.2);

        let insights = InsightsData {
            summary,
            correlations,
        };
        let mut out = Vec::new();
        write_insights(&mut out, &insights, OutputFormat::Plain, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Heart Rate vs Step Count"));
        assert!(text.contains("0.62 *"));
        assert!(!text.contains("0.20 *"));
        assert!(text.contains("mean      72.00"));
    }
}
