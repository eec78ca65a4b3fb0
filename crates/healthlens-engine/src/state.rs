//! Request State Machine
//!
//! `Idle -> Loading -> Success | Error`, re-entered on every submission.
//! There is no cancellation: each submission bumps a generation counter and
//! a completion is applied only when it carries the current generation.

use std::fmt;

use healthlens_types::{QuerySelection, TimeSeriesQuery, TimeSeriesResult, ValidationError};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(TimeSeriesResult),
    Error(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Loading => "loading",
            RequestState::Success(_) => "success",
            RequestState::Error(_) => "error",
        }
    }
}

/// Receipt for an issued fetch; hand it back with the outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub query: TimeSeriesQuery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer submission exists, or this ticket was already resolved
    Superseded,
}

#[derive(Debug, Default)]
pub struct RequestMachine {
    state: RequestState,
    generation: u64,
}

impl RequestMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new query lifecycle.
    ///
    /// The previous payload is dropped first. On a validation failure the
    /// state becomes `Error` and no ticket is issued, so no fetch can run;
    /// the generation still advances so older in-flight fetches go stale.
    pub fn begin(&mut self, selection: &QuerySelection) -> Result<Ticket, ValidationError> {
        self.generation += 1;
        self.state = RequestState::Idle;

        match selection.validate() {
            Ok(query) => {
                self.state = RequestState::Loading;
                tracing::debug!(generation = self.generation, metric = %query.metric, "query issued");
                Ok(Ticket {
                    generation: self.generation,
                    query,
                })
            }
            Err(err) => {
                tracing::debug!(generation = self.generation, error = %err, "query rejected locally");
                self.state = RequestState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Back to `Idle`. Any ticket still in flight becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = RequestState::Idle;
    }

    pub fn resolve<E: fmt::Display>(
        &mut self,
        ticket: &Ticket,
        outcome: Result<TimeSeriesResult, E>,
    ) -> Resolution {
        if ticket.generation != self.generation || !self.state.is_loading() {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding superseded response"
            );
            return Resolution::Superseded;
        }

        self.state = match outcome {
            Ok(result) => RequestState::Success(result),
            Err(err) => RequestState::Error(err.to_string()),
        };
        Resolution::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthlens_types::Metric;

    fn empty_result(metric: &str) -> TimeSeriesResult {
        TimeSeriesResult {
            metric: metric.to_string(),
            points: Vec::new(),
            decomposition: None,
        }
    }

    #[test]
    fn test_begin_moves_to_loading() {
        let mut machine = RequestMachine::new();
        assert_eq!(machine.state(), &RequestState::Idle);

        let ticket = machine.begin(&QuerySelection::default()).unwrap();
        assert_eq!(ticket.generation, 1);
        assert_eq!(ticket.query.metric, Metric::HeartRate);
        assert!(machine.state().is_loading());
    }

    #[test]
    fn test_begin_from_success_and_error_clears_payload() {
        let mut machine = RequestMachine::new();
        let ticket = machine.begin(&QuerySelection::default()).unwrap();
        machine.resolve::<String>(&ticket, Ok(empty_result("HeartRate")));
        assert_eq!(machine.state().name(), "success");

        let ticket = machine.begin(&QuerySelection::default()).unwrap();
        assert!(machine.state().is_loading());

        machine.resolve(&ticket, Err("boom"));
        assert_eq!(machine.state(), &RequestState::Error("boom".to_string()));

        machine.begin(&QuerySelection::default()).unwrap();
        assert!(machine.state().is_loading());
    }

    #[test]
    fn test_validation_failure_sets_error_without_ticket() {
        let mut machine = RequestMachine::new();
        let err = machine.begin(&QuerySelection::new("")).unwrap_err();
        assert_eq!(err, ValidationError::MissingMetric);
        assert_eq!(
            machine.state(),
            &RequestState::Error("Please select a metric.".to_string())
        );
    }

    #[test]
    fn test_out_of_order_response_is_discarded() {
        let mut machine = RequestMachine::new();
        let first = machine.begin(&QuerySelection::new("HeartRate")).unwrap();
        let second = machine.begin(&QuerySelection::new("StepCount")).unwrap();

        assert_eq!(
            machine.resolve::<String>(&second, Ok(empty_result("StepCount"))),
            Resolution::Applied
        );
        assert_eq!(
            machine.resolve::<String>(&first, Ok(empty_result("HeartRate"))),
            Resolution::Superseded
        );

        match machine.state() {
            RequestState::Success(result) => assert_eq!(result.metric, "StepCount"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_validation_failure_supersedes_in_flight_fetch() {
        let mut machine = RequestMachine::new();
        let in_flight = machine.begin(&QuerySelection::default()).unwrap();
        let _ = machine.begin(&QuerySelection::new("Weight"));

        assert_eq!(
            machine.resolve::<String>(&in_flight, Ok(empty_result("HeartRate"))),
            Resolution::Superseded
        );
        assert_eq!(
            machine.state(),
            &RequestState::Error("Unknown metric: Weight".to_string())
        );
    }

    #[test]
    fn test_ticket_resolves_once() {
        let mut machine = RequestMachine::new();
        let ticket = machine.begin(&QuerySelection::default()).unwrap();
        assert_eq!(
            machine.resolve::<String>(&ticket, Ok(empty_result("HeartRate"))),
            Resolution::Applied
        );
        assert_eq!(
            machine.resolve(&ticket, Err("late duplicate")),
            Resolution::Superseded
        );
        assert_eq!(machine.state().name(), "success");
    }

    #[test]
    fn test_reset_makes_in_flight_ticket_stale() {
        let mut machine = RequestMachine::new();
        let ticket = machine.begin(&QuerySelection::default()).unwrap();

        machine.reset();
        assert_eq!(machine.state(), &RequestState::Idle);
        assert_eq!(machine.generation(), 2);

        let resolution = machine.resolve::<String>(&ticket, Ok(empty_result("HeartRate")));
        assert_eq!(resolution, Resolution::Superseded);
        assert_eq!(machine.state(), &RequestState::Idle);
    }
}
