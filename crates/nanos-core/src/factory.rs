//! Service factory: implementation identifier to constructor.
//!
//! Implementations are registered up front under string identifiers, so
//! resolving a spec is a map lookup followed by a constructor call. There is
//! no runtime type discovery.

use dashmap::DashMap;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use nanos_protocols::{FactoryError, ResolutionError, Service, ServiceSpec};

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;

/// Constructor registered for an implementation identifier.
///
/// Returning `Err(reason)` marks the implementation as uninstantiable for that spec.
pub type ServiceConstructor =
    Arc<dyn Fn(&ServiceSpec) -> Result<Box<dyn Service>, String> + Send + Sync>;

/// Registry of service constructors keyed by implementation identifier.
pub struct ServiceFactory {
    constructors: DashMap<String, ServiceConstructor>,
}

impl ServiceFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            constructors: DashMap::new(),
        }
    }

    /// Register a constructor.
    ///
    /// Returns an error if the identifier is already taken.
    pub fn register<F>(&self, implementation: impl Into<String>, ctor: F) -> Result<(), FactoryError>
    where
        F: Fn(&ServiceSpec) -> Result<Box<dyn Service>, String> + Send + Sync + 'static,
    {
        let implementation = implementation.into();

        if self.constructors.contains_key(&implementation) {
            return Err(FactoryError::AlreadyRegistered(implementation));
        }

        self.constructors.insert(implementation, Arc::new(ctor));
        Ok(())
    }

    /// Register a service type constructed through `Default`.
    pub fn register_default<S>(&self, implementation: impl Into<String>) -> Result<(), FactoryError>
    where
        S: Service + Default,
    {
        self.register(implementation, |_| Ok(Box::new(S::default()) as Box<dyn Service>))
    }

    /// Check if an identifier resolves.
    pub fn contains(&self, implementation: &str) -> bool {
        self.constructors.contains_key(implementation)
    }

    /// All registered identifiers, sorted.
    pub fn implementations(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.constructors.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Resolve the spec's implementation and construct a new instance.
    ///
    /// The instance is neither bound to a context nor started.
    pub fn create(&self, spec: &ServiceSpec) -> Result<Box<dyn Service>, ResolutionError> {
        // Clone the Arc out so the shard lock is released before construction.
        let ctor = self
            .constructors
            .get(spec.implementation())
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ResolutionError::NotFound(spec.implementation().to_string()))?;

        let uninstantiable = |reason: String| ResolutionError::Uninstantiable {
            implementation: spec.implementation().to_string(),
            reason,
        };

        match panic::catch_unwind(AssertUnwindSafe(|| ctor(spec))) {
            Ok(Ok(service)) => Ok(service),
            Ok(Err(reason)) => Err(uninstantiable(reason)),
            Err(payload) => Err(uninstantiable(panic_message(payload.as_ref()))),
        }
    }
}

impl Default for ServiceFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("constructor panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("constructor panicked: {}", s)
    } else {
        "constructor panicked".to_string()
    }
}
