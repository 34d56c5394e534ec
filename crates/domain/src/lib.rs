// Rust guideline compliant 2026-08-30

//! Shared domain types for the person registry.
//!
//! Defines `Person`, `RegistryError`, and the hexagonal port trait
//! `Registry`. All workspace crates depend on this crate; no other
//! workspace crate is imported here.

/// An immutable person record.
///
/// Identity is the full value: two `Person`s with the same `name` are the
/// same person for storage purposes. `Eq` and `Hash` are derived on the
/// whole struct, which is what gives the registry its duplicate-collapsing
/// behavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Person {
    /// Identifying name.
    pub name: String,
}

impl Person {
    /// Create a person from anything string-like.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Errors that a registry implementation may return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The registry already holds `capacity` persons; the insert was
    /// rejected without mutating state.
    #[error("registry full (capacity: {capacity})")]
    CapacityExceeded {
        /// The configured hard limit.
        capacity: usize,
    },
}

/// Hexagonal port: the write side of a person registry.
///
/// Implementations live outside this crate (e.g. `registry`). Callers that
/// only need to insert depend exclusively on this trait -- never on a
/// concrete adapter.
#[expect(
    async_fn_in_trait,
    reason = "no dyn dispatch needed; internal workspace only"
)]
pub trait Registry {
    /// Insert one person into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CapacityExceeded`] when the registry is
    /// full at the moment the insert is serialized.
    async fn insert(&self, person: Person) -> Result<(), RegistryError>;
}
