//! Specification store contract and an in-memory implementation.

use parking_lot::RwLock;

use nanos_protocols::ServiceSpec;

/// Source of service specs.
///
/// The order returned by [`SpecificationStore::specs`] is authoritative: the
/// bootstrapper processes and registers services in exactly that order.
pub trait SpecificationStore: Send + Sync {
    /// Produce all specs in the store's canonical order.
    fn specs(&self) -> Vec<ServiceSpec>;
}

impl SpecificationStore for Vec<ServiceSpec> {
    fn specs(&self) -> Vec<ServiceSpec> {
        self.clone()
    }
}

impl SpecificationStore for [ServiceSpec] {
    fn specs(&self) -> Vec<ServiceSpec> {
        self.to_vec()
    }
}

/// Insertion-ordered store. Duplicate names are kept as separate entries.
#[derive(Default)]
pub struct MemorySpecStore {
    specs: RwLock<Vec<ServiceSpec>>,
}

impl MemorySpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spec.
    pub fn put(&self, spec: ServiceSpec) {
        self.specs.write().push(spec);
    }

    pub fn len(&self) -> usize {
        self.specs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.read().is_empty()
    }
}

impl SpecificationStore for MemorySpecStore {
    fn specs(&self) -> Vec<ServiceSpec> {
        self.specs.read().clone()
    }
}

impl FromIterator<ServiceSpec> for MemorySpecStore {
    fn from_iter<I: IntoIterator<Item = ServiceSpec>>(iter: I) -> Self {
        Self {
            specs: RwLock::new(iter.into_iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_new() {
        let store = MemorySpecStore::new();
        assert!(store.is_empty());
        assert!(store.specs().is_empty());
    }

    #[test]
    fn test_memory_store_preserves_insertion_order() {
        let store = MemorySpecStore::new();
        store.put(ServiceSpec::new("c", "impl.C"));
        store.put(ServiceSpec::new("a", "impl.A"));
        store.put(ServiceSpec::new("b", "impl.B"));

        let names: Vec<_> = store.specs().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_memory_store_keeps_duplicates() {
        let store: MemorySpecStore = vec![
            ServiceSpec::new("dup", "impl.First"),
            ServiceSpec::new("dup", "impl.Second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(store.len(), 2);
        assert_eq!(store.specs()[1].implementation(), "impl.Second");
    }

    #[test]
    fn test_vec_is_a_store() {
        let specs = vec![ServiceSpec::new("a", "impl.A")];
        assert_eq!(SpecificationStore::specs(&specs).len(), 1);
    }
}
