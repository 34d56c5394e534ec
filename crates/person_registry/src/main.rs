// Rust guideline compliant 2026-08-30

//! Person-registry entry point.
//!
//! Wires a [`BoundedRegistry`] to a [`Submitter`] and runs one concurrent
//! saturation round: 20 insert tasks race against a capacity of 10.
//!
//! # Usage
//!
//! ```text
//! RUST_LOG=info cargo run
//!
//! # Also show per-insert debug output (rejections, collapsed duplicates)
//! RUST_LOG=debug cargo run
//! ```

use anyhow::Context as _;
use registry::BoundedRegistry;
use std::sync::Arc;
use std::time::Duration;
use submitter::{Submitter, SubmitterConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the log facade before any async work.
    env_logger::init();

    // 20 tasks against capacity 10: roughly half the inserts get rejected.
    let config = SubmitterConfig::builder(20)
        .wait_timeout(Duration::from_secs(1))
        .build()
        .context("failed to build submitter config")?;

    // Each run owns its own registry instance; nothing is global.
    let registry = Arc::new(BoundedRegistry::new());
    let submitter = Submitter::new(config);

    let persons = submitter.generate_batch();
    let report = submitter.submit_all(&registry, persons).await;
    log::info!(
        "main.report: inserted={} rejected={} cancelled={}",
        report.inserted,
        report.rejected,
        report.cancelled
    );

    let stored = registry.snapshot().await;
    log::info!("main.stored: count={} capacity={}", stored.len(), registry.capacity());
    for (position, person) in stored.iter().enumerate() {
        log::info!("main.stored.entry: position={position} name={}", person.name);
    }

    Ok(())
}
