//! Hierarchical context shared by booted services.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::service::Service;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// A value held in a [`Context`].
#[derive(Clone)]
pub enum ContextEntry {
    /// Configuration value.
    Value(serde_json::Value),
    /// Live handle to a started service.
    Service(Arc<dyn Service>),
}

impl ContextEntry {
    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            ContextEntry::Value(v) => Some(v),
            ContextEntry::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&Arc<dyn Service>> {
        match self {
            ContextEntry::Service(s) => Some(s),
            ContextEntry::Value(_) => None,
        }
    }

    pub fn is_service(&self) -> bool {
        matches!(self, ContextEntry::Service(_))
    }
}

impl fmt::Debug for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextEntry::Value(v) => f.debug_tuple("Value").field(v).finish(),
            ContextEntry::Service(_) => f.write_str("Service(..)"),
        }
    }
}

impl From<serde_json::Value> for ContextEntry {
    fn from(value: serde_json::Value) -> Self {
        ContextEntry::Value(value)
    }
}

impl From<Arc<dyn Service>> for ContextEntry {
    fn from(service: Arc<dyn Service>) -> Self {
        ContextEntry::Service(service)
    }
}

/// Name/value store with scoped fallback lookup.
///
/// Lookups check the local map first and then walk the parent chain. Writes
/// always land in the local map of the context they are made through, so a
/// child never mutates an ancestor.
///
/// Cloning a `Context` yields another handle onto the same local map; use
/// [`Context::child`] for a new scope or [`Context::snapshot`] for a detached copy.
#[derive(Clone, Default)]
pub struct Context {
    parent: Option<Arc<Context>>,
    entries: Arc<RwLock<HashMap<String, ContextEntry>>>,
}

impl Context {
    /// Create an empty root context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a child scope that falls back to this context on lookup.
    pub fn child(&self) -> Self {
        Self {
            parent: Some(Arc::new(self.clone())),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Copy the local map into a detached context with the same parent.
    ///
    /// Subsequent writes to either context are not visible to the other.
    pub fn snapshot(&self) -> Self {
        let entries = self.entries.read().clone();
        Self {
            parent: self.parent.clone(),
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Returns the parent scope, if any.
    pub fn parent(&self) -> Option<&Context> {
        self.parent.as_deref()
    }

    /// Look up `name` locally, then along the parent chain.
    pub fn get(&self, name: &str) -> Option<ContextEntry> {
        let local = self.entries.read().get(name).cloned();
        match local {
            Some(entry) => Some(entry),
            None => self.parent.as_ref().and_then(|p| p.get(name)),
        }
    }

    /// Insert or silently overwrite the local entry for `name`.
    pub fn put(&self, name: impl Into<String>, entry: impl Into<ContextEntry>) {
        self.entries.write().insert(name.into(), entry.into());
    }

    /// Serialize `value` and store it as a configuration entry.
    pub fn put_value<T: serde::Serialize>(
        &self,
        name: impl Into<String>,
        value: T,
    ) -> Result<(), serde_json::Error> {
        let v = serde_json::to_value(value)?;
        self.put(name, ContextEntry::Value(v));
        Ok(())
    }

    /// Get a configuration entry deserialized as `T`.
    ///
    /// Returns `None` if the name is absent, holds a service, or does not
    /// deserialize as `T`.
    pub fn get_value<T: serde::de::DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|e| e.as_value().cloned())
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Register a live service handle under `name`.
    pub fn put_service(&self, name: impl Into<String>, service: Arc<dyn Service>) {
        self.put(name, ContextEntry::Service(service));
    }

    /// Get the service registered under `name`.
    pub fn get_service(&self, name: &str) -> Option<Arc<dyn Service>> {
        self.get(name).and_then(|e| e.as_service().cloned())
    }

    /// Run `f` against the service registered under `name` if it is a `T`.
    pub fn with_service<T: 'static, R>(&self, name: &str, f: impl FnOnce(&T) -> R) -> Option<R> {
        let service = self.get_service(name)?;
        service.as_any().downcast_ref::<T>().map(f)
    }

    /// Returns true if `name` resolves anywhere along the chain.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
            || self.parent.as_ref().is_some_and(|p| p.contains(name))
    }

    /// Returns true if `name` is present in this context's own map.
    pub fn contains_local(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Names held in the local map, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Names of local entries that hold services, sorted.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(_, e)| e.is_service())
            .map(|(k, _)| k.clone())
            .collect();
        names.sort();
        names
    }

    /// Number of local entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("entries", &self.local_names())
            .field("parent", &self.parent)
            .finish()
    }
}
