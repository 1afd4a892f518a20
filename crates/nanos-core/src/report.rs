//! Per-spec results of a bootstrap run.

use std::time::Duration;

use chrono::{DateTime, Utc};

use nanos_protocols::{BootError, ServiceSpec};

use crate::lifecycle::ServiceState;

/// Outcome of booting one spec.
#[derive(Debug)]
pub struct ServiceOutcome {
    /// Spec name.
    pub name: String,
    /// Implementation identifier from the spec.
    pub implementation: String,
    /// Terminal state: `Registered` or `Failed`.
    pub state: ServiceState,
    /// Last state reached before failing.
    pub failed_at: Option<ServiceState>,
    /// The recorded failure.
    pub error: Option<BootError>,
    /// Time spent on this spec.
    pub elapsed: Duration,
}

impl ServiceOutcome {
    pub(crate) fn registered(spec: &ServiceSpec, elapsed: Duration) -> Self {
        Self {
            name: spec.name().to_string(),
            implementation: spec.implementation().to_string(),
            state: ServiceState::Registered,
            failed_at: None,
            error: None,
            elapsed,
        }
    }

    pub(crate) fn failed(
        spec: &ServiceSpec,
        at: ServiceState,
        error: BootError,
        elapsed: Duration,
    ) -> Self {
        Self {
            name: spec.name().to_string(),
            implementation: spec.implementation().to_string(),
            state: ServiceState::Failed,
            failed_at: Some(at),
            error: Some(error),
            elapsed,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.state == ServiceState::Registered
    }
}

/// Outcomes of one bootstrap run, in processing order.
#[derive(Debug)]
pub struct BootReport {
    /// Identifier of the run, also attached to its tracing span.
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    outcomes: Vec<ServiceOutcome>,
}

impl BootReport {
    pub(crate) fn new(run_id: String) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            started_at: now,
            finished_at: now,
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: ServiceOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// All outcomes in processing order.
    pub fn outcomes(&self) -> &[ServiceOutcome] {
        &self.outcomes
    }

    /// Names of registered services in registration order.
    pub fn registered(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_registered())
            .map(|o| o.name.as_str())
            .collect()
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ServiceOutcome> + '_ {
        self.outcomes.iter().filter(|o| !o.is_registered())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Latest outcome for `name`.
    pub fn outcome(&self, name: &str) -> Option<&ServiceOutcome> {
        self.outcomes.iter().rev().find(|o| o.name == name)
    }

    /// Returns true if every spec was registered.
    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// One-line summary for operators.
    pub fn summary(&self) -> String {
        format!(
            "{} service(s) processed: {} registered, {} failed",
            self.len(),
            self.len() - self.failure_count(),
            self.failure_count()
        )
    }
}
