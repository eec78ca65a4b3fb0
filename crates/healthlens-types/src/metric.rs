use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

/// Health metrics the analytics service knows how to chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HeartRate,
    StepCount,
    DistanceWalkingRunning,
    ActiveEnergyBurned,
    BasalEnergyBurned,
    FlightsClimbed,
    BloodOxygenSaturation,
    WalkingHeartRateAverage,
}

/// Selection order used by pickers; the first entry is the default.
pub const AVAILABLE_METRICS: [Metric; 8] = [
    Metric::HeartRate,
    Metric::StepCount,
    Metric::DistanceWalkingRunning,
    Metric::ActiveEnergyBurned,
    Metric::BasalEnergyBurned,
    Metric::FlightsClimbed,
    Metric::BloodOxygenSaturation,
    Metric::WalkingHeartRateAverage,
];

impl Metric {
    /// Wire identifier, e.g. `HeartRate`
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::HeartRate => "HeartRate",
            Metric::StepCount => "StepCount",
            Metric::DistanceWalkingRunning => "DistanceWalkingRunning",
            Metric::ActiveEnergyBurned => "ActiveEnergyBurned",
            Metric::BasalEnergyBurned => "BasalEnergyBurned",
            Metric::FlightsClimbed => "FlightsClimbed",
            Metric::BloodOxygenSaturation => "BloodOxygenSaturation",
            Metric::WalkingHeartRateAverage => "WalkingHeartRateAverage",
        }
    }

    /// Display name, e.g. `Heart Rate`
    pub fn label(&self) -> String {
        humanize(self.as_str())
    }

    /// Next metric in selection order, wrapping around
    pub fn next(&self) -> Metric {
        let idx = self.position();
        AVAILABLE_METRICS[(idx + 1) % AVAILABLE_METRICS.len()]
    }

    /// Previous metric in selection order, wrapping around
    pub fn prev(&self) -> Metric {
        let idx = self.position();
        AVAILABLE_METRICS[(idx + AVAILABLE_METRICS.len() - 1) % AVAILABLE_METRICS.len()]
    }

    fn position(&self) -> usize {
        AVAILABLE_METRICS
            .iter()
            .position(|m| m == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingMetric);
        }

        AVAILABLE_METRICS
            .iter()
            .copied()
            .find(|m| m.as_str() == trimmed)
            .ok_or_else(|| ValidationError::UnknownMetric(trimmed.to_string()))
    }
}

static CAPITAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").expect("valid regex"));

/// Turn a service identifier into readable text.
///
/// `HeartRate` becomes `Heart Rate`; `HeartRate_vs_StepCount` becomes
/// `Heart Rate vs Step Count`.
pub fn humanize(name: &str) -> String {
    let spaced = CAPITAL.replace_all(name, " $1");
    let spaced = spaced.replace('_', " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
