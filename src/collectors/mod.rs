//! Metrics Collectors
//!
//! Collectors run a coordinator cycle and turn the resulting snapshot into
//! Prometheus metrics.
//!
//! # Architecture
//!
//! Collectors follow a consistent pattern:
//! - Accept a `CollectionContext` containing shared state
//! - Ask the coordinator for a fresh snapshot
//! - Update Prometheus metrics using helper methods
//! - Return `CollectionResult` (Ok(Success) on success, Ok(Failed) on failure)
//!
//! # Error Handling
//!
//! A failed cycle is non-fatal: it is logged as a warning and the metrics from
//! the last good snapshot stay exported.

use crate::coordinator::Coordinator;
use crate::metrics::MetricsCollector;
use tracing::{info, warn};

/// Shared context passed to all collectors
#[derive(Clone, Copy)]
pub struct CollectionContext<'a> {
    /// Coordinator owning the portal session and snapshot
    pub coordinator: &'a Coordinator,
    /// Metrics collector for updating Prometheus metrics
    pub metrics: &'a MetricsCollector,
}

/// Status of a metrics collection operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Metrics were successfully collected and updated
    Success,
    /// Collection failed but is non-fatal (already logged as warning)
    Failed,
}

/// Result type for collector functions
///
/// - `Ok(CollectionStatus::Success)` = Collection succeeded
/// - `Ok(CollectionStatus::Failed)` = Collection failed but non-fatal (logged as warning)
/// - `Err(_)` = Fatal error (should propagate)
pub type CollectionResult = Result<CollectionStatus, anyhow::Error>;

/// Helper to reduce boilerplate in collectors
///
/// Wraps a query with consistent error handling:
/// - On success: processes data, logs success, returns `CollectionStatus::Success`
/// - On error: logs warning, returns `CollectionStatus::Failed` (non-fatal)
///
/// # Examples
///
/// ```no_run
/// # use fuelportal_exporter::collectors::*;
/// async fn example(ctx: &CollectionContext<'_>) -> CollectionResult {
///     collect_with_handler(
///         "tanks",
///         ctx.coordinator.refresh(),
///         |snapshot| {
///             for tank in &snapshot.tanks {
///                 // Update metrics...
///             }
///         },
///     ).await
/// }
/// ```
pub async fn collect_with_handler<T, F, P, E>(
    name: &str,
    query_future: F,
    process: P,
) -> CollectionResult
where
    F: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: FnOnce(T),
{
    match query_future.await {
        Ok(data) => {
            process(data);
            info!("Updated {} metrics", name);
            Ok(CollectionStatus::Success)
        }
        Err(e) => {
            warn!("Failed to query {}: {}", name, e);
            Ok(CollectionStatus::Failed)
        }
    }
}

pub mod tank;

pub use tank::{collect_tank_metrics, publish_snapshot};
