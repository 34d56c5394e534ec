// Rust guideline compliant 2026-08-30

//! Capacity-bounded, insertion-order-preserving adapter for the `Registry`
//! port.
//!
//! A single fair mutex serializes every insert: the size check and the add
//! always happen under the same guard, so there is no check-then-act window
//! between "read size" and "append". Once the registry holds
//! [`BoundedRegistry::CAPACITY`] persons it is permanently full -- there is
//! no removal operation.

use std::collections::HashSet;

use domain::{Person, Registry, RegistryError};
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Inner state
// ---------------------------------------------------------------------------

/// Ordered storage plus a companion set for duplicate detection.
///
/// `order` and `seen` always hold the same values; `order` preserves the
/// sequence in which inserts acquired the lock.
#[derive(Debug, Default)]
struct RegistryInner {
    order: Vec<Person>,
    seen: HashSet<Person>,
}

// ---------------------------------------------------------------------------
// BoundedRegistry
// ---------------------------------------------------------------------------

/// `Registry` adapter backed by an in-memory ordered set with a hard
/// capacity.
///
/// The guarding mutex is `tokio::sync::Mutex`, which queues waiters FIFO:
/// contending inserts are granted the lock in the order they began waiting,
/// so the stored order reflects lock-acquisition order. The guard is
/// released on every exit path, including the rejection path.
#[derive(Debug, Default)]
pub struct BoundedRegistry {
    inner: Mutex<RegistryInner>,
}

impl BoundedRegistry {
    /// Hard upper bound on the number of stored persons.
    pub const CAPACITY: usize = 10;

    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The configured hard limit.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        Self::CAPACITY
    }

    /// Number of stored persons, read under the lock.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.order.len()
    }

    /// `true` when no person has been stored yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.order.is_empty()
    }

    /// Clone of the stored persons in insertion order, read under the lock.
    pub async fn snapshot(&self) -> Vec<Person> {
        self.inner.lock().await.order.clone()
    }
}

impl Registry for BoundedRegistry {
    /// Insert `person`, serialized through the fair mutex.
    ///
    /// The capacity check runs before the duplicate check: inserting a value
    /// that is already present into a *full* registry is still rejected.
    /// Below capacity, re-inserting a present value returns `Ok(())` without
    /// growing the store -- exact duplicates collapse to one entry, so `len`
    /// does not increment by 1 per successful call when duplicate values are
    /// used.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`] when the registry already
    /// holds [`Self::CAPACITY`] persons. No state is mutated on this path.
    async fn insert(&self, person: Person) -> Result<(), RegistryError> {
        let mut inner = self.inner.lock().await;
        if inner.order.len() >= Self::CAPACITY {
            log::debug!(
                "registry.insert.rejected: name={} capacity={}",
                person.name,
                Self::CAPACITY
            );
            return Err(RegistryError::CapacityExceeded { capacity: Self::CAPACITY });
        }
        if inner.seen.insert(person.clone()) {
            inner.order.push(person);
        } else {
            log::debug!("registry.insert.collapsed: name={}", person.name);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::BoundedRegistry;
    use domain::{Person, Registry as _, RegistryError};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::task::JoinSet;

    async fn fill_to_capacity(registry: &BoundedRegistry) {
        for i in 0..BoundedRegistry::CAPACITY {
            registry.insert(Person::new(format!("Person n: {i}"))).await.unwrap();
        }
    }

    /// Spawn one insert task per name and collect every result.
    async fn insert_concurrently(
        registry: &Arc<BoundedRegistry>,
        count: usize,
    ) -> Vec<Result<(), RegistryError>> {
        let mut tasks = JoinSet::new();
        for i in 0..count {
            let registry = Arc::clone(registry);
            tasks.spawn(async move {
                registry.insert(Person::new(format!("Person n: {i}"))).await
            });
        }

        let mut results = Vec::with_capacity(count);
        while let Some(joined) = tasks.join_next().await {
            results.push(joined.unwrap());
        }
        results
    }

    // BR-T01: a single insert into an empty registry yields len == 1.
    #[tokio::test]
    async fn single_insert() {
        let registry = BoundedRegistry::new();
        registry.insert(Person::new("John")).await.unwrap();
        assert_eq!(registry.len().await, 1);
        assert!(!registry.is_empty().await);
    }

    // BR-T02: sequential inserts preserve insertion order.
    #[tokio::test]
    async fn order_preserved() {
        let registry = BoundedRegistry::new();
        registry.insert(Person::new("Daniel")).await.unwrap();
        registry.insert(Person::new("Josep")).await.unwrap();
        registry.insert(Person::new("John")).await.unwrap();

        let names: Vec<String> =
            registry.snapshot().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Daniel", "Josep", "John"]);
    }

    // BR-T03: 10 distinct inserts succeed; the 11th is rejected with the
    // configured capacity and leaves the size unchanged.
    #[tokio::test]
    async fn exact_boundary_rejection() {
        let registry = BoundedRegistry::new();
        fill_to_capacity(&registry).await;
        assert_eq!(registry.len().await, 10);

        let result = registry.insert(Person::new("Ellison")).await;
        assert_eq!(result, Err(RegistryError::CapacityExceeded { capacity: 10 }));
        assert_eq!(registry.len().await, 10);
    }

    // BR-T04: once full, every further insert fails deterministically.
    #[tokio::test]
    async fn full_is_absorbing() {
        let registry = BoundedRegistry::new();
        fill_to_capacity(&registry).await;

        for i in 0..5 {
            let result = registry.insert(Person::new(format!("Late n: {i}"))).await;
            assert_eq!(
                result,
                Err(RegistryError::CapacityExceeded { capacity: 10 }),
                "insert {i} after saturation must be rejected"
            );
        }
        assert_eq!(registry.len().await, 10);
    }

    // BR-T05: re-inserting a present value reports success but does not grow
    // the store. Callers must not assume len increments by 1 per Ok.
    #[tokio::test]
    async fn duplicate_collapses_to_one_entry() {
        let registry = BoundedRegistry::new();
        registry.insert(Person::new("John")).await.unwrap();
        registry.insert(Person::new("John")).await.unwrap();

        assert_eq!(registry.len().await, 1);
        let names: Vec<String> =
            registry.snapshot().await.into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["John"]);
    }

    // BR-T06: the capacity check precedes the duplicate check, so a
    // duplicate aimed at a full registry is rejected rather than collapsed.
    #[tokio::test]
    async fn duplicate_into_full_registry_rejected() {
        let registry = BoundedRegistry::new();
        fill_to_capacity(&registry).await;

        let result = registry.insert(Person::new("Person n: 0")).await;
        assert_eq!(result, Err(RegistryError::CapacityExceeded { capacity: 10 }));
        assert_eq!(registry.len().await, 10);
    }

    // BR-T07: 15 concurrent distinct inserts saturate the registry at
    // exactly 10, with exactly 10 successes and 5 rejections.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saturation() {
        let registry = Arc::new(BoundedRegistry::new());
        let results = insert_concurrently(&registry, 15).await;

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(RegistryError::CapacityExceeded { capacity: 10 })))
            .count();
        assert_eq!(ok, 10, "exactly capacity inserts must succeed");
        assert_eq!(rejected, 5, "the rest must be rejected");
        assert_eq!(registry.len().await, 10);
    }

    // BR-T08: repeated saturation runs never overfill or corrupt the
    // collection (no lost updates, no duplicate entries).
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn repeated_saturation_never_overfills() {
        for round in 0..15 {
            let registry = Arc::new(BoundedRegistry::new());
            let results = insert_concurrently(&registry, 15).await;

            let ok = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(ok, 10, "round {round}: exactly 10 inserts must succeed");
            assert_eq!(registry.len().await, 10, "round {round}: size must be 10");

            let stored = registry.snapshot().await;
            let distinct: std::collections::HashSet<&str> =
                stored.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(distinct.len(), stored.len(), "round {round}: no duplicate entries");
        }
    }

    // BR-T09: 20 concurrent inserts complete well within one second; no
    // waiter is ever stuck on the lock.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn saturation_completes_within_one_second() {
        let registry = Arc::new(BoundedRegistry::new());
        let results = tokio::time::timeout(
            Duration::from_secs(1),
            insert_concurrently(&registry, 20),
        )
        .await
        .expect("20 concurrent inserts must finish within one second");

        let ok = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok, 10);
        assert_eq!(registry.len().await, 10);
    }

    // BR-T10: snapshot returns a clone; mutating nothing, observable at any
    // point, and len always stays within capacity.
    #[tokio::test]
    async fn snapshot_and_len_consistent() {
        let registry = BoundedRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.capacity(), 10);

        for i in 0..12 {
            let _ = registry.insert(Person::new(format!("Person n: {i}"))).await;
            let len = registry.len().await;
            assert!(len <= registry.capacity(), "len {len} must never exceed capacity");
            assert_eq!(registry.snapshot().await.len(), len);
        }
    }
}
