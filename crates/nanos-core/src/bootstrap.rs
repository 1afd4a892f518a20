//! Bootstrapper: specs in, started and registered services out.
//!
//! Specs are processed one at a time in store order. Each one walks
//! `Pending → Constructed → ContextBound → Started → Registered`; a failure
//! at any step is recorded in the [`BootReport`] and the run moves on to the
//! next spec. A run never fails as a whole.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use nanos_protocols::{BootError, Context, Service, ServiceSpec, StopError};

use crate::factory::ServiceFactory;
use crate::lifecycle::{RunningServices, ServiceState};
use crate::report::{BootReport, ServiceOutcome};
use crate::store::SpecificationStore;

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;

/// A spec in flight, carrying its instance between transitions.
enum Phase {
    Pending,
    Constructed(Box<dyn Service>),
    ContextBound(Box<dyn Service>),
    Started(Box<dyn Service>),
    Registered,
}

impl Phase {
    fn state(&self) -> ServiceState {
        match self {
            Phase::Pending => ServiceState::Pending,
            Phase::Constructed(_) => ServiceState::Constructed,
            Phase::ContextBound(_) => ServiceState::ContextBound,
            Phase::Started(_) => ServiceState::Started,
            Phase::Registered => ServiceState::Registered,
        }
    }
}

/// Orchestrates construction, context binding, start and registration.
pub struct Bootstrapper {
    context: Context,
    factory: Arc<ServiceFactory>,
    start_timeout: Option<Duration>,
    cancel: CancellationToken,
    running: RunningServices,
}

impl Bootstrapper {
    /// Create a bootstrapper binding every service to `context`.
    pub fn new(context: Context, factory: Arc<ServiceFactory>) -> Self {
        Self {
            context,
            factory,
            start_timeout: None,
            cancel: CancellationToken::new(),
            running: RunningServices::new(),
        }
    }

    /// Bound each `start()` call. A zero duration disables the bound.
    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }

    /// Observe an externally owned cancellation token.
    ///
    /// The bootstrapper listens on a child of `token`, so cancelling `token`
    /// stops a run while [`shutdown`](Self::shutdown) leaves `token` untouched.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token.child_token();
        self
    }

    /// The shared root context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn factory(&self) -> &Arc<ServiceFactory> {
        &self.factory
    }

    /// Token observed between specs and while a `start()` is pending.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Services registered so far, in registration order.
    pub fn running(&self) -> &RunningServices {
        &self.running
    }

    /// Boot every spec the store yields, in store order.
    pub async fn run(&self, store: &dyn SpecificationStore) -> BootReport {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = info_span!("bootstrap", run_id = %run_id);
        self.run_inner(store, run_id).instrument(span).await
    }

    async fn run_inner(&self, store: &dyn SpecificationStore, run_id: String) -> BootReport {
        let specs = store.specs();
        let mut report = BootReport::new(run_id);
        info!("Bootstrapping {} service(s)", specs.len());

        for spec in &specs {
            let outcome = if self.cancel.is_cancelled() {
                ServiceOutcome::failed(spec, ServiceState::Pending, BootError::Cancelled, Duration::ZERO)
            } else {
                self.boot_service(spec).await
            };

            if let Some(err) = &outcome.error {
                error!(
                    service = %outcome.name,
                    implementation = %outcome.implementation,
                    failed_at = ?outcome.failed_at,
                    "Service failed to boot: {}",
                    err
                );
            }
            report.push(outcome);
        }

        report.finish();
        info!("{}", report.summary());
        report
    }

    /// Drive one spec to a terminal state.
    async fn boot_service(&self, spec: &ServiceSpec) -> ServiceOutcome {
        info!("Booting service: {}", spec.name());
        let started = Instant::now();
        let mut phase = Phase::Pending;

        while phase.state() != ServiceState::Registered {
            let from = phase.state();
            phase = match self.transition(spec, phase).await {
                Ok(next) => next,
                Err(e) => return ServiceOutcome::failed(spec, from, e, started.elapsed()),
            };
            debug!(service = %spec.name(), from = %from, to = %phase.state(), "Service state transition");
        }

        info!("Service registered: {}", spec.name());
        ServiceOutcome::registered(spec, started.elapsed())
    }

    /// Perform the single transition out of `phase`.
    async fn transition(&self, spec: &ServiceSpec, phase: Phase) -> Result<Phase, BootError> {
        match phase {
            Phase::Pending => {
                if spec.name().is_empty() {
                    return Err(BootError::InvalidSpec(format!(
                        "empty service name for implementation {}",
                        spec.implementation()
                    )));
                }
                let instance = self.factory.create(spec)?;
                Ok(Phase::Constructed(instance))
            }
            Phase::Constructed(mut instance) => {
                instance.set_context(self.context.clone());
                Ok(Phase::ContextBound(instance))
            }
            Phase::ContextBound(mut instance) => {
                self.start_service(spec, instance.as_mut()).await?;
                Ok(Phase::Started(instance))
            }
            Phase::Started(instance) => {
                self.register(spec, Arc::from(instance));
                Ok(Phase::Registered)
            }
            Phase::Registered => Ok(Phase::Registered),
        }
    }

    async fn start_service(&self, spec: &ServiceSpec, instance: &mut dyn Service) -> Result<(), BootError> {
        let start = async {
            match self.start_timeout {
                Some(limit) => match tokio::time::timeout(limit, instance.start()).await {
                    Ok(result) => result.map_err(BootError::from),
                    Err(_) => Err(BootError::StartTimeout {
                        service: spec.name().to_string(),
                        timeout: limit,
                    }),
                },
                None => instance.start().await.map_err(BootError::from),
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(BootError::Cancelled),
            result = start => result,
        }
    }

    fn register(&self, spec: &ServiceSpec, service: Arc<dyn Service>) {
        if self.context.contains_local(spec.name()) {
            warn!("Overwriting existing context entry: {}", spec.name());
        }
        self.context.put_service(spec.name(), service.clone());
        self.running.push(spec.name(), service);
    }

    /// Cancel any in-progress run and stop registered services in reverse order.
    pub async fn shutdown(&self, stop_timeout: Duration) -> Result<(), StopError> {
        self.cancel.cancel();
        self.running.stop_all(stop_timeout).await
    }
}
