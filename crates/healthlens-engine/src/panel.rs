//! Panel Composer
//!
//! Decides what the time-series area shows for a given [`RequestState`].

use chrono::{DateTime, Utc};
use healthlens_types::{Component, TimeSeriesResult, humanize};

use crate::reshape::{ChartSeries, to_decomposition_series, to_original_series};
use crate::state::RequestState;

pub const PROMPT_TEXT: &str = "Select parameters and press Enter to analyze.";
pub const PROGRESS_TEXT: &str = "Fetching time series data...";

/// Stable handle for a chart panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PanelId {
    Original,
    Trend,
    Seasonal,
    Residual,
}

impl PanelId {
    pub const ALL: [PanelId; 4] = [
        PanelId::Original,
        PanelId::Trend,
        PanelId::Seasonal,
        PanelId::Residual,
    ];

    pub fn component(&self) -> Option<Component> {
        match self {
            PanelId::Original => None,
            PanelId::Trend => Some(Component::Trend),
            PanelId::Seasonal => Some(Component::Seasonal),
            PanelId::Residual => Some(Component::Residual),
        }
    }
}

/// Everything needed to bind one panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub id: PanelId,
    pub title: String,
    pub series: Vec<ChartSeries>,
    /// Shared x axis; index i labels `series[..].values[i]`
    pub axis: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelLayout {
    Prompt,
    Progress,
    Message(String),
    Panels(Vec<PanelSpec>),
}

impl PanelLayout {
    pub fn panels(&self) -> &[PanelSpec] {
        match self {
            PanelLayout::Panels(panels) => panels,
            _ => &[],
        }
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelSpec> {
        self.panels().iter().find(|p| p.id == id)
    }
}

pub fn compose(state: &RequestState) -> PanelLayout {
    match state {
        RequestState::Idle => PanelLayout::Prompt,
        RequestState::Loading => PanelLayout::Progress,
        RequestState::Error(msg) => PanelLayout::Message(msg.clone()),
        RequestState::Success(result) => PanelLayout::Panels(compose_panels(result)),
    }
}

fn compose_panels(result: &TimeSeriesResult) -> Vec<PanelSpec> {
    let axis: Vec<DateTime<Utc>> = result.timestamps().collect();

    let mut panels = vec![PanelSpec {
        id: PanelId::Original,
        title: format!("{} Time Series", humanize(&result.metric)),
        series: vec![to_original_series(result)],
        axis: axis.clone(),
    }];

    for id in [PanelId::Trend, PanelId::Seasonal, PanelId::Residual] {
        let Some(component) = id.component() else {
            continue;
        };
        if let Some(series) = to_decomposition_series(result, component) {
            panels.push(PanelSpec {
                id,
                title: component.title().to_string(),
                series: vec![series],
                axis: axis.clone(),
            });
        }
    }

    panels
}
