//! Registry of callables whose implementations live in optional extensions.
//!
//! # Responsibility
//! - Map each deferred callable to the packages that must be loaded first.
//! - Serve lookups from diagnostic hooks on any thread.
//!
//! # Invariants
//! - Every entry maps to a non-empty `DependencySet`.
//! - Entries are never removed; re-registration overwrites (last write wins).
//! - Construct one registry per consuming library before the first
//!   `register`; share it as `Arc<DependencyRegistry>`.

use crate::model::identity::{CallableId, DependencySet};
use log::{debug, info};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Process-lifetime mapping `CallableId -> DependencySet`.
#[derive(Debug, Default)]
pub struct DependencyRegistry {
    entries: RwLock<HashMap<CallableId, DependencySet>>,
}

impl DependencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the dependency set for `callable`.
    pub fn register(&self, callable: CallableId, deps: DependencySet) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "event=dependency_register module=registry callable={} deps={}",
            callable, deps
        );
        let previous = entries.insert(callable.clone(), deps.clone());
        // Conflicting re-registration stays permissive; only leave a trace.
        if let Some(previous) = previous.filter(|previous| *previous != deps) {
            info!(
                "event=dependency_overwrite module=registry callable={} previous={} current={}",
                callable, previous, deps
            );
        }
    }

    /// Returns the dependency set for `callable`, or `None` when it is not a
    /// deferred-dependency callable.
    pub fn lookup(&self, callable: &CallableId) -> Option<DependencySet> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(callable)
            .cloned()
    }

    pub fn contains(&self, callable: &CallableId) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(callable)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries sorted by callable id.
    pub fn entries(&self) -> Vec<(CallableId, DependencySet)> {
        let mut snapshot: Vec<_> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, deps)| (id.clone(), deps.clone()))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::DependencyRegistry;
    use crate::model::identity::{CallableId, DependencySet, ModuleId};
    use std::sync::Arc;
    use std::thread;

    fn id(name: &str) -> CallableId {
        CallableId::new(ModuleId::new("MyPkg").expect("valid module"), name).expect("valid id")
    }

    fn deps(names: &[&str]) -> DependencySet {
        DependencySet::new(names.iter().copied()).expect("valid deps")
    }

    #[test]
    fn lookup_returns_registered_set() {
        let registry = DependencyRegistry::new();
        registry.register(id("fancy_function"), deps(&["FancyDep", "OtherDep"]));

        assert_eq!(
            registry.lookup(&id("fancy_function")),
            Some(deps(&["FancyDep", "OtherDep"]))
        );
        assert!(registry.contains(&id("fancy_function")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_of_unknown_callable_is_absent() {
        let registry = DependencyRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.lookup(&id("plain_function")), None);
    }

    #[test]
    fn second_register_overwrites() {
        let registry = DependencyRegistry::new();
        registry.register(id("fancy_function"), deps(&["FancyDep"]));
        registry.register(id("fancy_function"), deps(&["OtherDep", "FancyDep"]));

        assert_eq!(
            registry.lookup(&id("fancy_function")),
            Some(deps(&["OtherDep", "FancyDep"]))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn entries_are_sorted_snapshot() {
        let registry = DependencyRegistry::new();
        registry.register(id("zeta"), deps(&["Z"]));
        registry.register(id("alpha"), deps(&["A"]));

        let names: Vec<_> = registry
            .entries()
            .into_iter()
            .map(|(id, _)| id.name().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn concurrent_readers_see_registered_entries() {
        let registry = Arc::new(DependencyRegistry::new());
        registry.register(id("fancy_function"), deps(&["FancyDep"]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.lookup(&id("fancy_function")))
            })
            .collect();
        for handle in handles {
            let found = handle.join().expect("reader thread should not panic");
            assert_eq!(found, Some(deps(&["FancyDep"])));
        }
    }
}
