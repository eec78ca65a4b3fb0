use std::fmt;

use healthlens_types::{QuerySelection, TimeSeriesResult, ValidationError};

use crate::lifecycle::{ChartBackend, ChartLifecycle};
use crate::panel::{PanelLayout, compose};
use crate::reshape::alignment_report;
use crate::state::{RequestMachine, RequestState, Resolution, Ticket};

/// Time-series view state for one control thread.
///
/// Owns the request machine and the chart bindings; every state change goes
/// through `submit`/`resolve`/`teardown`, which recompose the layout and
/// bring the bindings in line with it.
pub struct Dashboard<B: ChartBackend> {
    machine: RequestMachine,
    charts: ChartLifecycle<B>,
    layout: PanelLayout,
}

impl<B: ChartBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            machine: RequestMachine::new(),
            charts: ChartLifecycle::new(backend),
            layout: PanelLayout::Prompt,
        }
    }

    pub fn state(&self) -> &RequestState {
        self.machine.state()
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn charts(&self) -> &ChartLifecycle<B> {
        &self.charts
    }

    /// Begin a new query. Existing panels are released before the state
    /// moves to `Loading`, so stale charts never sit next to the progress
    /// indicator. A ticket is returned only when a fetch should be issued.
    pub fn submit(&mut self, selection: &QuerySelection) -> Result<Ticket, ValidationError> {
        let released = self.charts.release_all();
        if released > 0 {
            tracing::debug!(released, "released panels before new query");
        }

        let outcome = self.machine.begin(selection);
        self.recompose();
        outcome
    }

    pub fn resolve<E: fmt::Display>(
        &mut self,
        ticket: &Ticket,
        outcome: Result<TimeSeriesResult, E>,
    ) -> Resolution {
        let mismatches = match &outcome {
            Ok(result) => alignment_report(result),
            Err(_) => Vec::new(),
        };

        let resolution = self.machine.resolve(ticket, outcome);
        if resolution == Resolution::Applied {
            for mismatch in &mismatches {
                tracing::warn!(
                    component = %mismatch.component,
                    expected = mismatch.expected,
                    actual = mismatch.actual,
                    "decomposition length does not match time axis"
                );
            }
            tracing::info!(
                generation = ticket.generation,
                state = self.machine.state().name(),
                "query resolved"
            );
            self.recompose();
        }
        resolution
    }

    /// Release every binding, e.g. when the view is replaced. The request
    /// goes back to `Idle`, so a fetch still in flight resolves as
    /// superseded and cannot bind charts again.
    pub fn teardown(&mut self) {
        self.charts.release_all();
        self.machine.reset();
        self.recompose();
    }

    fn recompose(&mut self) {
        self.layout = compose(self.machine.state());
        self.charts.sync(&self.layout);
    }
}
