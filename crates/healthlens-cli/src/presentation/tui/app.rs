//! Dashboard application state.
//!
//! Owns the selection form, the data gate (upload → insights), and the
//! time-series dashboard. All mutation happens on the UI thread: key
//! presses, background completions, and clock ticks all go through `App`.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use healthlens_client::{FetchError, TimeSeriesSource};
use healthlens_engine::{Dashboard, PanelId, RequestState};
use healthlens_types::{InsightsData, Metric, QuerySelection, UploadResponse};

use super::charts::{PreparedChart, TerminalCharts};
use crate::services::QueryService;

pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Metric,
    StartDate,
    EndDate,
    Decompose,
    Charts,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Metric => Focus::StartDate,
            Focus::StartDate => Focus::EndDate,
            Focus::EndDate => Focus::Decompose,
            Focus::Decompose => Focus::Charts,
            Focus::Charts => Focus::Metric,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Metric => Focus::Charts,
            Focus::StartDate => Focus::Metric,
            Focus::EndDate => Focus::StartDate,
            Focus::Decompose => Focus::EndDate,
            Focus::Charts => Focus::Decompose,
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Focus::StartDate | Focus::EndDate)
    }
}

/// Whether the service has data to query
#[derive(Debug, Clone, PartialEq)]
pub enum DataPhase {
    Uploading,
    LoadingInsights,
    Ready(InsightsData),
    Failed(String),
}

/// Results of background calls other than time-series fetches
#[derive(Debug)]
pub enum AppEvent {
    Uploaded(Result<UploadResponse, FetchError>),
    Insights(Result<InsightsData, FetchError>),
}

/// Work the event loop must start in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    LoadInsights,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub expires_at: Instant,
}

pub struct App<S> {
    pub(super) selection: QuerySelection,
    pub(super) focus: Focus,
    pub(super) dashboard: Dashboard<TerminalCharts>,
    pub(super) phase: DataPhase,
    pub(super) toast: Option<Toast>,
    pub(super) notice: Option<String>,
    pub(super) cursor: usize,
    queries: QueryService<S>,
    should_quit: bool,
}

impl<S> App<S>
where
    S: TimeSeriesSource + 'static,
{
    pub fn new(selection: QuerySelection, queries: QueryService<S>, phase: DataPhase) -> Self {
        Self {
            selection,
            focus: Focus::Metric,
            dashboard: Dashboard::new(TerminalCharts::new()),
            phase,
            toast: None,
            notice: None,
            cursor: 0,
            queries,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selection(&self) -> &QuerySelection {
        &self.selection
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn phase(&self) -> &DataPhase {
        &self.phase
    }

    pub fn state(&self) -> &RequestState {
        self.dashboard.state()
    }

    pub fn dashboard(&self) -> &Dashboard<TerminalCharts> {
        &self.dashboard
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn chart(&self, panel: PanelId) -> Option<&PreparedChart> {
        self.dashboard.charts().chart(panel)
    }

    pub fn can_query(&self) -> bool {
        matches!(self.phase, DataPhase::Ready(_))
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('q') if !self.focus.is_text() => self.should_quit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Enter => self.submit(),
            code => self.edit_focused(code),
        }
    }

    fn edit_focused(&mut self, code: KeyCode) {
        match (self.focus, code) {
            (Focus::Metric, KeyCode::Right) => self.cycle_metric(Metric::next),
            (Focus::Metric, KeyCode::Left) => self.cycle_metric(Metric::prev),
            (Focus::StartDate, KeyCode::Char(c)) if is_date_char(c) => {
                let mut value = self.selection.start_date().to_string();
                value.push(c);
                self.selection.set_start_date(value);
            }
            (Focus::StartDate, KeyCode::Backspace) => {
                let mut value = self.selection.start_date().to_string();
                value.pop();
                self.selection.set_start_date(value);
            }
            (Focus::EndDate, KeyCode::Char(c)) if is_date_char(c) => {
                let mut value = self.selection.end_date().to_string();
                value.push(c);
                self.selection.set_end_date(value);
            }
            (Focus::EndDate, KeyCode::Backspace) => {
                let mut value = self.selection.end_date().to_string();
                value.pop();
                self.selection.set_end_date(value);
            }
            (Focus::Decompose, KeyCode::Char(' ')) => {
                let toggled = !self.selection.decompose();
                self.selection.set_decompose(toggled);
            }
            (Focus::Charts, KeyCode::Left) => self.cursor = self.cursor.saturating_sub(1),
            (Focus::Charts, KeyCode::Right) => {
                let len = self.chart(PanelId::Original).map_or(0, |c| c.len());
                self.cursor = (self.cursor + 1).min(len.saturating_sub(1));
            }
            (Focus::Charts, KeyCode::Home) => self.cursor = 0,
            _ => {}
        }
    }

    fn cycle_metric(&mut self, step: fn(&Metric) -> Metric) {
        let next = match self.selection.metric().parse::<Metric>() {
            Ok(current) => step(&current),
            Err(_) => Metric::HeartRate,
        };
        self.selection.set_metric(next.as_str());
    }

    /// Issue a fetch for the current selection. Ignored until insights have
    /// loaded, since the service has nothing to chart before that.
    pub fn submit(&mut self) {
        if !self.can_query() {
            self.notice = Some("Waiting for health data to load...".to_string());
            return;
        }

        self.notice = None;
        self.cursor = 0;
        match self.queries.submit(&mut self.dashboard, &self.selection) {
            Ok(generation) => tracing::info!(generation, metric = self.selection.metric(), "analyze"),
            Err(err) => tracing::info!(error = %err, "selection rejected"),
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Option<FollowUp> {
        match event {
            AppEvent::Uploaded(Ok(response)) => {
                self.show_toast(response.summary(), Instant::now());
                self.phase = DataPhase::LoadingInsights;
                Some(FollowUp::LoadInsights)
            }
            AppEvent::Uploaded(Err(err)) => {
                tracing::warn!(error = %err, "upload failed");
                self.phase = DataPhase::Failed(err.to_string());
                None
            }
            AppEvent::Insights(Ok(insights)) => {
                self.phase = DataPhase::Ready(insights);
                None
            }
            AppEvent::Insights(Err(err)) => {
                tracing::warn!(error = %err, "insights failed");
                self.phase = DataPhase::Failed(err.to_string());
                None
            }
        }
    }

    pub fn show_toast(&mut self, message: String, now: Instant) {
        self.toast = Some(Toast {
            message,
            expires_at: now + TOAST_TTL,
        });
    }

    /// Apply finished fetches and expire the toast
    pub fn tick(&mut self, now: Instant) {
        self.queries.drain(&mut self.dashboard);
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }

    pub fn shutdown(&mut self) {
        self.dashboard.teardown();
    }
}

fn is_date_char(c: char) -> bool {
    c.is_ascii_digit() || c == '-'
}
