#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use healthlens_engine::{ChartBackend, PanelId, PanelSpec};
use healthlens_types::{Decomposition, TimeSeriesPoint, TimeSeriesResult};

#[derive(Debug, Default)]
pub struct Ledger {
    pub live: BTreeSet<PanelId>,
    pub created: usize,
    pub released: usize,
    pub events: Vec<String>,
}

/// Backend that records every create/release and refuses to create a chart
/// for a panel whose previous chart was never released.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub ledger: Rc<RefCell<Ledger>>,
    pub failing_release: Option<PanelId>,
}

#[derive(Debug)]
pub struct FakeChart {
    pub panel: PanelId,
    pub values: usize,
}

impl ChartBackend for RecordingBackend {
    type Chart = FakeChart;
    type Error = String;

    fn create(&mut self, spec: &PanelSpec) -> FakeChart {
        let mut ledger = self.ledger.borrow_mut();
        assert!(
            ledger.live.insert(spec.id),
            "chart created for {:?} while the previous one is still live",
            spec.id
        );
        ledger.created += 1;
        ledger.events.push(format!("create {:?}", spec.id));
        FakeChart {
            panel: spec.id,
            values: spec.series.first().map(|s| s.values.len()).unwrap_or(0),
        }
    }

    fn release(&mut self, panel: PanelId, chart: FakeChart) -> Result<(), String> {
        assert_eq!(panel, chart.panel);
        let mut ledger = self.ledger.borrow_mut();
        ledger.live.remove(&panel);
        ledger.released += 1;
        ledger.events.push(format!("release {:?}", panel));
        if self.failing_release == Some(panel) {
            return Err(format!("context lost for {:?}", panel));
        }
        Ok(())
    }
}

pub fn heart_rate(points: usize, decomposition_len: Option<usize>) -> TimeSeriesResult {
    TimeSeriesResult {
        metric: "HeartRate".to_string(),
        points: (0..points)
            .map(|i| TimeSeriesPoint {
                timestamp: Utc
                    .with_ymd_and_hms(2024, 1, 1 + i as u32, 0, 0, 0)
                    .unwrap(),
                value: 60.0 + i as f64,
            })
            .collect(),
        decomposition: decomposition_len.map(|len| Decomposition {
            trend: (0..len).map(|i| Some(60.0 + i as f64 * 0.5)).collect(),
            seasonal: (0..len)
                .map(|i| Some(if i % 7 < 5 { 1.0 } else { -2.5 }))
                .collect(),
            residual: (0..len).map(|i| Some((i as f64 * 0.1).sin())).collect(),
        }),
    }
}
