//! Tank Metrics Collector
//!
//! # Metrics Produced
//! - `fuelportal_tank_level_percent` - Fill level (0-100)
//! - `fuelportal_tank_gallons` - Approximate gallons in the tank
//! - `fuelportal_tank_capacity_gallons` - Capacity derived from gallons and level
//! - `fuelportal_tank_daily_usage_gallons` - Gallons per day since the usage baseline
//! - `fuelportal_tank_reading_date_seconds` - Reading date as a Unix timestamp
//! - `fuelportal_tank_last_delivery_seconds` - Last delivery as a Unix timestamp
//! - `fuelportal_tank_info` - Raw date strings as labels
//!   - Labels: tank, reading_date, last_delivery
//!
//! All tank metrics carry a `tank` label with the tank's display name.

use super::{collect_with_handler, CollectionContext, CollectionResult};
use crate::metrics::MetricsCollector;
use crate::portal::dates::parse_iso;
use crate::portal::Snapshot;
use tracing::debug;

fn date_to_unix(date: Option<&str>) -> Option<f64> {
    let date = parse_iso(date?)?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp() as f64)
}

/// Replace all tank metrics with the contents of `snapshot`
pub fn publish_snapshot(metrics: &MetricsCollector, snapshot: &Snapshot) {
    metrics.reset_tanks();

    for tank in &snapshot.tanks {
        let name = tank.name.as_str();

        if let Some(percent) = tank.percent {
            metrics.set_gauge(&metrics.tank_level_percent, name, percent);
        }
        if let Some(gallons) = tank.gallons {
            metrics.set_gauge(&metrics.tank_gallons, name, gallons);
        }
        if let Some(capacity) = tank.capacity {
            metrics.set_gauge(&metrics.tank_capacity_gallons, name, capacity);
        }
        if let Some(usage) = snapshot.daily_usage(name) {
            metrics.set_gauge(&metrics.tank_daily_usage_gallons, name, usage);
        }
        if let Some(ts) = date_to_unix(tank.reading_date.as_deref()) {
            metrics.set_gauge(&metrics.tank_reading_date_seconds, name, ts);
        }
        if let Some(ts) = date_to_unix(tank.last_delivery.as_deref()) {
            metrics.set_gauge(&metrics.tank_last_delivery_seconds, name, ts);
        }

        metrics
            .tank_info
            .with_label_values(&[
                name,
                tank.reading_date.as_deref().unwrap_or_default(),
                tank.last_delivery.as_deref().unwrap_or_default(),
            ])
            .set(1.0);

        debug!("Updated metrics for tank: {}", name);
    }

    metrics.tanks.set(snapshot.tanks.len() as i64);
    metrics.parse_warnings.set(snapshot.parse_warnings as i64);
    metrics
        .last_success_timestamp_seconds
        .set(snapshot.fetched_at.timestamp() as f64);
}

/// Run a coordinator cycle and publish its snapshot
///
/// # Returns
///
/// * `Ok(CollectionStatus::Success)` - Cycle succeeded, metrics replaced
/// * `Ok(CollectionStatus::Failed)` - Cycle failed, previous metrics left in place
pub async fn collect_tank_metrics(ctx: &CollectionContext<'_>) -> CollectionResult {
    collect_with_handler("tank", ctx.coordinator.refresh(), |snapshot| {
        publish_snapshot(ctx.metrics, &snapshot)
    })
    .await
}
