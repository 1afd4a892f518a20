//! Service lifecycle states and the set of running services.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::timeout;
use tracing::{info, warn};

use nanos_protocols::{Service, StopError};

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

/// State of one spec while it is being booted.
///
/// `Pending → Constructed → ContextBound → Started → Registered`, or `Failed`
/// from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceState {
    /// Not yet processed.
    Pending,
    /// Instance created by the factory.
    Constructed,
    /// Shared context injected.
    ContextBound,
    /// `start()` returned successfully.
    Started,
    /// Discoverable in the context under its name.
    Registered,
    /// Did not reach `Registered`.
    Failed,
}

impl ServiceState {
    /// Returns true for `Registered` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceState::Registered | ServiceState::Failed)
    }

    /// The state a successful transition leads to.
    pub fn next(self) -> Option<ServiceState> {
        match self {
            ServiceState::Pending => Some(ServiceState::Constructed),
            ServiceState::Constructed => Some(ServiceState::ContextBound),
            ServiceState::ContextBound => Some(ServiceState::Started),
            ServiceState::Started => Some(ServiceState::Registered),
            ServiceState::Registered | ServiceState::Failed => None,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceState::Pending => "pending",
            ServiceState::Constructed => "constructed",
            ServiceState::ContextBound => "context-bound",
            ServiceState::Started => "started",
            ServiceState::Registered => "registered",
            ServiceState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Registered services in registration order.
#[derive(Default)]
pub struct RunningServices {
    services: RwLock<Vec<(String, Arc<dyn Service>)>>,
}

impl RunningServices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a registered service.
    pub fn push(&self, name: impl Into<String>, service: Arc<dyn Service>) {
        self.services.write().push((name.into(), service));
    }

    /// Names in registration order. Duplicates appear once per registration.
    pub fn names(&self) -> Vec<String> {
        self.services.read().iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    /// Stop every service in reverse registration order.
    ///
    /// Each `stop()` is bounded by `stop_timeout`. Failures are logged and
    /// counted; all services are attempted regardless. The set is empty afterwards.
    pub async fn stop_all(&self, stop_timeout: Duration) -> Result<(), StopError> {
        let services: Vec<_> = std::mem::take(&mut *self.services.write());
        if services.is_empty() {
            return Ok(());
        }

        info!("Stopping {} service(s)...", services.len());
        let mut failed = 0usize;

        for (name, service) in services.iter().rev() {
            match timeout(stop_timeout, service.stop()).await {
                Ok(Ok(())) => info!("Service stopped: {}", name),
                Ok(Err(e)) => {
                    warn!("Service {} stop error: {}", name, e);
                    failed += 1;
                }
                Err(_) => {
                    warn!("Service {} stop timeout after {:?}", name, stop_timeout);
                    failed += 1;
                }
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(StopError(format!("{} services failed during shutdown", failed)))
        }
    }
}
