//! Async driver for the time-series dashboard.
//!
//! Fetches run on the tokio runtime. Their outcomes come back over a
//! channel and are applied on the caller's thread, which is the only place
//! the dashboard (request state and chart bindings) is ever mutated.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use healthlens_client::{FetchError, TimeSeriesSource};
use healthlens_engine::{ChartBackend, Dashboard, Resolution, Ticket};
use healthlens_types::{QuerySelection, TimeSeriesResult, ValidationError};
use tokio::runtime::Handle;

/// A finished fetch, tagged with the ticket that requested it
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Result<TimeSeriesResult, FetchError>,
}

pub struct QueryService<S> {
    source: Arc<S>,
    runtime: Handle,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl<S> QueryService<S>
where
    S: TimeSeriesSource + 'static,
{
    pub fn new(source: Arc<S>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            runtime,
            tx,
            rx,
        }
    }

    /// Submit the selection. The dashboard is already `Loading` (or `Error`
    /// for an invalid selection) when this returns; the fetch, if any, runs
    /// in the background.
    pub fn submit<B: ChartBackend>(
        &self,
        dashboard: &mut Dashboard<B>,
        selection: &QuerySelection,
    ) -> Result<u64, ValidationError> {
        let ticket = dashboard.submit(selection)?;
        let generation = ticket.generation;
        self.dispatch(ticket);
        Ok(generation)
    }

    fn dispatch(&self, ticket: Ticket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        let query = ticket.query.clone();
        let fetch = self
            .runtime
            .spawn(async move { source.fetch_time_series(&query).await });

        self.runtime.spawn(async move {
            // A fetch that panics still has to resolve its ticket, or the
            // dashboard would wait in Loading forever
            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(generation = ticket.generation, error = %err, "fetch task failed");
                    Err(FetchError::Transport(format!("fetch task failed: {}", err)))
                }
            };
            if let Err(err) = &outcome {
                tracing::debug!(generation = ticket.generation, error = %err, "fetch failed");
            }
            // receiver gone means the view was closed
            let _ = tx.send(Completion { ticket, outcome });
        });
    }

    /// Apply every completion that has arrived, without blocking
    pub fn drain<B: ChartBackend>(&self, dashboard: &mut Dashboard<B>) -> Vec<Resolution> {
        let mut resolutions = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            resolutions.push(apply(dashboard, completion));
        }
        resolutions
    }

    /// Block until one completion arrives (or `timeout` passes) and apply it
    pub fn wait_next<B: ChartBackend>(
        &self,
        dashboard: &mut Dashboard<B>,
        timeout: Duration,
    ) -> Option<Resolution> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(apply(dashboard, completion)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

fn apply<B: ChartBackend>(dashboard: &mut Dashboard<B>, completion: Completion) -> Resolution {
    dashboard.resolve(&completion.ticket, completion.outcome)
}
