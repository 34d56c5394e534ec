// Rust guideline compliant 2026-08-30

//! Submitter component -- generates person batches and dispatches concurrent
//! `insert` calls against a [`BoundedRegistry`].
//!
//! Entry points: [`Submitter::generate_batch`], [`Submitter::submit_all`].
//! Configuration via [`SubmitterConfig::builder`].
//!
//! The submitter is an external collaborator of the registry: it owns the
//! task pool, the bounded wait, and the forced cancellation of stragglers.
//! The registry itself never times out a lock acquisition.

use domain::{Person, Registry as _, RegistryError};
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use registry::BoundedRegistry;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

// ---------------------------------------------------------------------------
// SubmitterError
// ---------------------------------------------------------------------------

/// Errors that can occur while configuring the submitter.
#[derive(Debug, thiserror::Error)]
pub enum SubmitterError {
    /// The supplied configuration is invalid.
    #[error("invalid submitter configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// SubmitterConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for a [`Submitter`].
///
/// Construct via [`SubmitterConfig::builder`].
#[derive(Debug)]
pub struct SubmitterConfig {
    /// Number of concurrent insert tasks per batch (minimum 1).
    pub tasks: usize,
    /// Upper bound on the wait for outstanding tasks; stragglers are
    /// cancelled once it expires.
    pub wait_timeout: Duration,
    /// Optional RNG seed for reproducible batches. `None` seeds from the OS.
    pub seed: Option<u64>,
}

/// Builder for [`SubmitterConfig`].
///
/// Obtain via [`SubmitterConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct SubmitterConfigBuilder {
    tasks: usize,
    wait_timeout: Duration,
    seed: Option<u64>,
}

impl SubmitterConfig {
    /// Create a builder. `tasks` is the only required parameter.
    ///
    /// Default values: `wait_timeout = 1 s`, `seed = None`.
    #[must_use]
    pub fn builder(tasks: usize) -> SubmitterConfigBuilder {
        SubmitterConfigBuilder {
            tasks,
            wait_timeout: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl SubmitterConfigBuilder {
    /// Override the bounded wait for outstanding tasks.
    #[must_use]
    pub fn wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Fix the RNG seed for deterministic batches (useful in tests).
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitterError::InvalidConfig`] when `tasks` is zero.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<SubmitterConfig, SubmitterError> {
        if self.tasks == 0 {
            return Err(SubmitterError::InvalidConfig {
                reason: "tasks must be >= 1".to_owned(),
            });
        }
        Ok(SubmitterConfig {
            tasks: self.tasks,
            wait_timeout: self.wait_timeout,
            seed: self.seed,
        })
    }
}

// ---------------------------------------------------------------------------
// SubmitReport
// ---------------------------------------------------------------------------

/// Tally of one [`Submitter::submit_all`] run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Tasks whose insert returned `Ok` (including collapsed duplicates).
    pub inserted: usize,
    /// Tasks rejected with `CapacityExceeded`.
    pub rejected: usize,
    /// Tasks cancelled at the wait deadline or failed to join.
    pub cancelled: usize,
}

impl SubmitReport {
    /// Total number of tasks accounted for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.rejected + self.cancelled
    }
}

// ---------------------------------------------------------------------------
// Submitter
// ---------------------------------------------------------------------------

/// Name pool used for synthetic person generation.
///
/// 10 entries -- index always derived from `random_range(0..10)`, never panics.
const NAMES: &[&str] = &[
    "Daniel", "Josep", "John", "Ellison", "Maria", "Ana", "Pierre", "Sofia", "Liam", "Emma",
];

/// Generates person batches and dispatches them as concurrent insert tasks.
///
/// Holds no registry reference -- the registry is injected per call.
#[derive(Debug)]
pub struct Submitter {
    config: SubmitterConfig,
    /// Interior mutability required because all public methods take `&self`.
    rng: RefCell<StdRng>,
}

impl Submitter {
    /// Create a new submitter from `config`.
    ///
    /// Seeds the RNG from `config.seed` if set, otherwise from the OS.
    #[must_use]
    pub fn new(config: SubmitterConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng: RefCell::new(rng) }
    }

    /// Generate one batch of `config.tasks` persons with names drawn from
    /// the built-in pool.
    ///
    /// Duplicate names are possible; the registry collapses them to one
    /// entry while still reporting each insert as successful.
    #[must_use]
    pub fn generate_batch(&self) -> Vec<Person> {
        let mut rng = self.rng.borrow_mut();
        (0..self.config.tasks)
            .map(|_| {
                // Index is always in bounds: derived from len().
                let idx = rng.random_range(0..NAMES.len());
                Person::new(NAMES[idx])
            })
            .collect()
    }

    /// Spawn one insert task per person and wait for all of them, bounded
    /// by `config.wait_timeout`.
    ///
    /// Every task calls [`domain::Registry::insert`] on its own clone of the
    /// shared registry handle. Completions are tallied into a
    /// [`SubmitReport`]; when the deadline expires, the remaining tasks are
    /// force-cancelled and counted as `cancelled`. A zero `wait_timeout`
    /// cancels the whole batch before any task is spawned.
    pub async fn submit_all(
        &self,
        registry: &Arc<BoundedRegistry>,
        persons: Vec<Person>,
    ) -> SubmitReport {
        let mut report = SubmitReport::default();

        if self.config.wait_timeout.is_zero() {
            // The deadline is already behind us; spawning would hand the
            // scheduler tasks that are due for cancellation the moment they
            // start. Cancel the batch up front instead.
            report.cancelled = persons.len();
            log::warn!(
                "submitter.wait.timeout: cancelled={} after {:?}",
                report.cancelled,
                self.config.wait_timeout
            );
        } else {
            let deadline = Instant::now() + self.config.wait_timeout;
            let mut tasks = JoinSet::new();
            for person in persons {
                let registry = Arc::clone(registry);
                tasks.spawn(async move { registry.insert(person).await });
            }

            loop {
                match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                    Ok(None) => break,
                    Ok(Some(Ok(Ok(())))) => report.inserted += 1,
                    Ok(Some(Ok(Err(RegistryError::CapacityExceeded { capacity })))) => {
                        log::debug!("submitter.task.rejected: capacity={capacity}");
                        report.rejected += 1;
                    }
                    Ok(Some(Err(join_err))) => {
                        log::warn!("submitter.task.failed: {join_err}");
                        report.cancelled += 1;
                    }
                    Err(_elapsed) => {
                        // Deadline reached: force-cancel the stragglers
                        // instead of waiting indefinitely.
                        let stragglers = tasks.len();
                        tasks.abort_all();
                        report.cancelled += stragglers;
                        log::warn!(
                            "submitter.wait.timeout: cancelled={stragglers} after {:?}",
                            self.config.wait_timeout
                        );
                        break;
                    }
                }
            }
        }

        log::info!(
            "submitter.batch.done: inserted={} rejected={} cancelled={}",
            report.inserted,
            report.rejected,
            report.cancelled
        );
        report
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
