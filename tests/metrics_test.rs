use chrono::{TimeZone, Utc};
use fuelportal_exporter::collectors::publish_snapshot;
use fuelportal_exporter::metrics::MetricsCollector;
use fuelportal_exporter::portal::{Snapshot, TankRecord};
use std::collections::BTreeMap;

fn snapshot(tanks: Vec<TankRecord>, usage: &[(&str, f64)]) -> Snapshot {
    Snapshot {
        tanks,
        daily_usage: usage
            .iter()
            .map(|(name, rate)| (name.to_string(), *rate))
            .collect::<BTreeMap<_, _>>(),
        parse_warnings: 1,
        fetched_at: Utc.with_ymd_and_hms(2024, 1, 12, 6, 0, 0).unwrap(),
    }
}

#[test]
fn test_metrics_registration() {
    // Verify that all metrics can be created and registered without panicking
    let metrics = MetricsCollector::new().expect("Failed to create metrics collector");

    let rendered = metrics.render();
    assert!(rendered.is_ok(), "Failed to render metrics");

    // GaugeVec metrics only appear once they have values set,
    // scalar metrics always appear
    let output = rendered.unwrap();
    assert!(output.contains("fuelportal_up"), "Missing up metric");
    assert!(output.contains("fuelportal_tanks"), "Missing tanks metric");
    assert!(
        output.contains("fuelportal_last_success_timestamp_seconds"),
        "Missing last success metric"
    );
    assert!(!output.contains("fuelportal_fuelportal_"), "Double prefix");
}

#[test]
fn test_publish_snapshot_sets_tank_gauges() {
    let metrics = MetricsCollector::new().unwrap();
    let tank = TankRecord::new(
        "Main",
        Some(60.0),
        Some(165.0),
        Some("2024-01-12".to_string()),
        Some("Pending".to_string()),
    );

    publish_snapshot(&metrics, &snapshot(vec![tank], &[("Main", 2.5)]));

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains("fuelportal_tank_level_percent{tank=\"Main\"} 60"));
    assert!(rendered.contains("fuelportal_tank_gallons{tank=\"Main\"} 165"));
    assert!(rendered.contains("fuelportal_tank_capacity_gallons{tank=\"Main\"} 275"));
    assert!(rendered.contains("fuelportal_tank_daily_usage_gallons{tank=\"Main\"} 2.5"));
    // 2024-01-12T00:00:00Z
    assert!(rendered.contains("fuelportal_tank_reading_date_seconds{tank=\"Main\"} 1705017600"));
    // Raw delivery text has no timestamp but is kept on the info metric
    assert!(!rendered.contains("fuelportal_tank_last_delivery_seconds"));
    assert!(rendered.contains(
        "fuelportal_tank_info{last_delivery=\"Pending\",reading_date=\"2024-01-12\",tank=\"Main\"} 1"
    ));
    assert!(rendered.contains("fuelportal_tanks 1"));
    assert!(rendered.contains("fuelportal_parse_warnings 1"));
    assert!(rendered.contains("fuelportal_last_success_timestamp_seconds 1705039200"));
}

#[test]
fn test_absent_fields_are_not_exported() {
    let metrics = MetricsCollector::new().unwrap();
    let tank = TankRecord::new("Bare", None, None, None, None);

    publish_snapshot(&metrics, &snapshot(vec![tank], &[]));

    let rendered = metrics.render().unwrap();
    assert!(!rendered.contains("fuelportal_tank_gallons"));
    assert!(!rendered.contains("fuelportal_tank_level_percent"));
    assert!(rendered.contains("tank=\"Bare\""));
}

#[test]
fn test_vanished_tank_is_dropped() {
    // Given: Metrics published for two tanks
    let metrics = MetricsCollector::new().unwrap();
    let main = TankRecord::new("Main", Some(50.0), Some(100.0), None, None);
    let old = TankRecord::new("Old", Some(10.0), Some(20.0), None, None);
    publish_snapshot(&metrics, &snapshot(vec![main.clone(), old], &[]));
    assert!(metrics.render().unwrap().contains("tank=\"Old\""));

    // When: The next snapshot no longer has one of them
    publish_snapshot(&metrics, &snapshot(vec![main], &[]));

    // Then: Its series disappear
    let rendered = metrics.render().unwrap();
    assert!(rendered.contains("tank=\"Main\""));
    assert!(!rendered.contains("tank=\"Old\""));
}

#[test]
fn test_set_gauge_helper() {
    let metrics = MetricsCollector::new().unwrap();

    metrics.set_gauge(&metrics.tank_gallons, "Test Tank", 42.0);

    let rendered = metrics.render().unwrap();
    assert!(rendered.contains("fuelportal_tank_gallons{tank=\"Test Tank\"} 42"));
}
