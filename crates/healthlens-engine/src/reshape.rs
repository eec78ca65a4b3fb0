//! Series Reshaper
//!
//! Converts a [`TimeSeriesResult`] into renderable [`ChartSeries`]. The
//! timestamp axis comes from `points`; decomposition arrays are read against
//! it index by index. A short component array is not an error here: indices
//! past its end become absent values so the panel draws a truncated line.

use chrono::{DateTime, Utc};
use healthlens_types::{Component, TimeSeriesResult, humanize};
use serde::Serialize;

/// 24-bit display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const SKY: Rgb = Rgb(0x02, 0x84, 0xc7);
    pub const SLATE: Rgb = Rgb(0x47, 0x55, 0x69);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub fill: bool,
    /// 0 draws the line without point markers
    pub point_radius: u8,
    pub dashed: bool,
}

impl SeriesStyle {
    pub fn original() -> Self {
        Self {
            color: Rgb::SKY,
            fill: true,
            point_radius: 0,
            dashed: false,
        }
    }

    pub fn component() -> Self {
        Self {
            color: Rgb::SLATE,
            fill: false,
            point_radius: 0,
            dashed: false,
        }
    }
}

/// One renderable line; `None` marks an index with no value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
    pub style: SeriesStyle,
}

impl ChartSeries {
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.values.len() - self.present_count()
    }
}

pub fn to_original_series(result: &TimeSeriesResult) -> ChartSeries {
    ChartSeries {
        label: humanize(&result.metric),
        values: result.points.iter().map(|p| Some(p.value)).collect(),
        style: SeriesStyle::original(),
    }
}

/// `None` when the result carries no decomposition at all
pub fn to_decomposition_series(
    result: &TimeSeriesResult,
    component: Component,
) -> Option<ChartSeries> {
    let decomposition = result.decomposition.as_ref()?;
    let values = decomposition.component(component);

    Some(ChartSeries {
        label: component.title().to_string(),
        values: (0..result.points.len())
            .map(|i| values.get(i).copied().flatten())
            .collect(),
        style: SeriesStyle::component(),
    })
}

/// A decomposition component whose length disagrees with the time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub component: Component,
    pub expected: usize,
    pub actual: usize,
}

pub fn alignment_report(result: &TimeSeriesResult) -> Vec<ShapeMismatch> {
    let Some(decomposition) = &result.decomposition else {
        return Vec::new();
    };
    let expected = result.points.len();

    Component::ALL
        .iter()
        .filter_map(|&component| {
            let actual = decomposition.component(component).len();
            (actual != expected).then_some(ShapeMismatch {
                component,
                expected,
                actual,
            })
        })
        .collect()
}

/// Short axis date, e.g. `Jan 5`. Axis ticks and the cursor readout both
/// go through here.
pub fn format_axis_label(ts: DateTime<Utc>) -> String {
    ts.format("%b %-d").to_string()
}

pub fn format_readout(label: &str, ts: DateTime<Utc>, value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{}  {} : {:.2}", format_axis_label(ts), label, v),
        None => format!("{}  {} : -", format_axis_label(ts), label),
    }
}

/// Padded y-range over every present value
pub fn axis_bounds(series: &[ChartSeries]) -> [f64; 2] {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in series.iter().flat_map(|s| s.values.iter().flatten()) {
        min = min.min(*value);
        max = max.max(*value);
    }

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let range = max - min;
    if range <= f64::EPSILON {
        return [min - 0.5, max + 0.5];
    }

    let padding = range * 0.1;
    [min - padding, max + padding]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use healthlens_types::{Decomposition, TimeSeriesPoint};

    fn result(points: usize, decomposition_len: Option<usize>) -> TimeSeriesResult {
        TimeSeriesResult {
            metric: "HeartRate".to_string(),
            points: (0..points)
                .map(|i| TimeSeriesPoint {
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0).unwrap(),
                    value: 60.0 + i as f64,
                })
                .collect(),
            decomposition: decomposition_len.map(|len| Decomposition {
                trend: (0..len).map(|i| Some(i as f64)).collect(),
                seasonal: (0..len).map(|i| Some(-(i as f64))).collect(),
                residual: vec![Some(0.25); len],
            }),
        }
    }

    #[test]
    fn test_original_series_keeps_every_point() {
        let series = to_original_series(&result(14, None));
        assert_eq!(series.label, "Heart Rate");
        assert_eq!(series.values.len(), 14);
        assert_eq!(series.values[13], Some(73.0));
        assert!(series.style.fill);
    }

    #[test]
    fn test_decomposition_absent_yields_none() {
        assert!(to_decomposition_series(&result(14, None), Component::Trend).is_none());
    }

    #[test]
    fn test_short_component_pads_with_absent_markers() {
        let data = result(14, Some(10));
        let trend = to_decomposition_series(&data, Component::Trend).unwrap();

        assert_eq!(trend.values.len(), 14);
        assert_eq!(trend.present_count(), 10);
        assert_eq!(trend.absent_count(), 4);
        assert_eq!(trend.values[9], Some(9.0));
        assert_eq!(trend.values[10], None);
    }

    #[test]
    fn test_null_component_entries_become_gaps() {
        let mut data = result(5, Some(5));
        if let Some(d) = data.decomposition.as_mut() {
            d.trend[0] = None;
            d.trend[4] = None;
        }

        let trend = to_decomposition_series(&data, Component::Trend).unwrap();
        assert_eq!(trend.values, vec![None, Some(1.0), Some(2.0), Some(3.0), None]);
        assert_eq!(trend.absent_count(), 2);
        assert!(alignment_report(&data).is_empty());
    }

    #[test]
    fn test_long_component_is_cut_to_axis() {
        let mut data = result(5, Some(5));
        if let Some(d) = data.decomposition.as_mut() {
            d.seasonal.push(Some(99.0));
        }

        let seasonal = to_decomposition_series(&data, Component::Seasonal).unwrap();
        assert_eq!(seasonal.values.len(), 5);

        let report = alignment_report(&data);
        assert_eq!(
            report,
            vec![ShapeMismatch {
                component: Component::Seasonal,
                expected: 5,
                actual: 6
            }]
        );
    }

    #[test]
    fn test_alignment_report_clean() {
        assert!(alignment_report(&result(14, Some(14))).is_empty());
        assert!(alignment_report(&result(14, None)).is_empty());
        assert_eq!(alignment_report(&result(14, Some(10))).len(), 3);
    }

    #[test]
    fn test_axis_label_and_readout_share_format() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 5, 13, 30, 0).unwrap();
        assert_eq!(format_axis_label(ts), "Jan 5");
        assert_eq!(format_readout("Trend", ts, Some(1.0)), "Jan 5  Trend : 1.00");
        assert_eq!(format_readout("Trend", ts, None), "Jan 5  Trend : -");
    }

    #[test]
    fn test_axis_bounds() {
        let series = to_original_series(&result(11, None));
        let [lo, hi] = axis_bounds(&[series]);
        assert!((lo - 59.0).abs() < 1e-9);
        assert!((hi - 71.0).abs() < 1e-9);

        let flat = ChartSeries {
            label: "flat".to_string(),
            values: vec![Some(3.0), None, Some(3.0)],
            style: SeriesStyle::component(),
        };
        assert_eq!(axis_bounds(&[flat]), [2.5, 3.5]);
        assert_eq!(axis_bounds(&[]), [0.0, 1.0]);
    }
}
