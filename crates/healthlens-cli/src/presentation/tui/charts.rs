//! Terminal chart backend.
//!
//! A prepared chart is the plotted form of a panel: per-series point
//! buffers, bounds, and axis labels. Point buffers are pooled; releasing a
//! chart hands its buffers back for the next bind.

use chrono::{DateTime, Utc};
use healthlens_engine::{
    ChartBackend, PanelId, PanelSpec, SeriesStyle, axis_bounds, format_axis_label, format_readout,
};

#[derive(Debug)]
pub struct PreparedSeries {
    pub label: String,
    pub style: SeriesStyle,
    pub points: Vec<(f64, f64)>,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug)]
pub struct PreparedChart {
    pub panel: PanelId,
    pub title: String,
    pub series: Vec<PreparedSeries>,
    pub axis: Vec<DateTime<Utc>>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
}

impl PreparedChart {
    /// Cursor readout for index `i`, one entry per series
    pub fn readout(&self, i: usize) -> Vec<String> {
        let Some(ts) = self.axis.get(i) else {
            return Vec::new();
        };
        self.series
            .iter()
            .map(|s| format_readout(&s.label, *ts, s.values.get(i).copied().flatten()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct TerminalCharts {
    pool: Vec<Vec<(f64, f64)>>,
    live: usize,
    created: u64,
}

impl TerminalCharts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    fn buffer(&mut self) -> Vec<(f64, f64)> {
        let mut buf = self.pool.pop().unwrap_or_default();
        buf.clear();
        buf
    }
}

impl ChartBackend for TerminalCharts {
    type Chart = PreparedChart;
    type Error = String;

    fn create(&mut self, spec: &PanelSpec) -> PreparedChart {
        let mut series = Vec::with_capacity(spec.series.len());
        for s in &spec.series {
            let mut points = self.buffer();
            points.extend(
                s.values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| (i as f64, v))),
            );
            series.push(PreparedSeries {
                label: s.label.clone(),
                style: s.style,
                points,
                values: s.values.clone(),
            });
        }

        let y_bounds = axis_bounds(&spec.series);
        let last = spec.axis.len().saturating_sub(1);

        self.live += 1;
        self.created += 1;

        PreparedChart {
            panel: spec.id,
            title: spec.title.clone(),
            series,
            axis: spec.axis.clone(),
            x_bounds: [0.0, last.max(1) as f64],
            y_bounds,
            x_labels: x_labels(&spec.axis),
            y_labels: y_labels(y_bounds),
        }
    }

    fn release(&mut self, panel: PanelId, chart: PreparedChart) -> Result<(), String> {
        if self.live == 0 {
            return Err(format!("{:?} released with no live charts", panel));
        }
        self.live -= 1;
        self.pool
            .extend(chart.series.into_iter().map(|s| s.points));
        Ok(())
    }
}

fn x_labels(axis: &[DateTime<Utc>]) -> Vec<String> {
    match axis {
        [] => Vec::new(),
        [only] => vec![format_axis_label(*only)],
        [first, .., last] => {
            let mid = axis[axis.len() / 2];
            vec![
                format_axis_label(*first),
                format_axis_label(mid),
                format_axis_label(*last),
            ]
        }
    }
}

fn y_labels([lo, hi]: [f64; 2]) -> Vec<String> {
    let mid = (lo + hi) / 2.0;
    [lo, mid, hi].iter().map(|v| format!("{:.1}", v)).collect()
}
