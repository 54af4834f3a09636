//! Prometheus Metrics Definitions
//!
//! This module defines all Prometheus metrics exposed by the fuel portal exporter.
//!
//! # Metric Categories
//!
//! ## Tank Metrics (labelled by `tank`)
//! - Fill level, gallons, derived capacity and daily usage
//! - Reading and last delivery dates as Unix timestamps
//! - `tank_info` carrying the raw date strings as labels
//!
//! ## Exporter Health
//! - `up`, last success timestamp, scrape duration
//! - Number of tanks and parse warnings in the last snapshot
//!
//! All metrics use the `fuelportal_` namespace prefix.

use prometheus::{Encoder, Gauge, GaugeVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

const NAMESPACE: &str = "fuelportal";

/// Metrics collector for the fuel portal
#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,

    // Tank metrics
    pub tank_level_percent: Arc<GaugeVec>,
    pub tank_gallons: Arc<GaugeVec>,
    pub tank_capacity_gallons: Arc<GaugeVec>,
    pub tank_daily_usage_gallons: Arc<GaugeVec>,
    pub tank_reading_date_seconds: Arc<GaugeVec>,
    pub tank_last_delivery_seconds: Arc<GaugeVec>,
    pub tank_info: Arc<GaugeVec>,

    // Exporter metrics
    pub tanks: Arc<IntGauge>,
    pub parse_warnings: Arc<IntGauge>,
    pub last_success_timestamp_seconds: Arc<Gauge>,
    pub scrape_duration_seconds: Arc<Gauge>,
    pub up: Arc<Gauge>,
}

fn tank_gauge(name: &str, help: &str) -> prometheus::Result<GaugeVec> {
    GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), &["tank"])
}

impl MetricsCollector {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let tank_level_percent =
            tank_gauge("tank_level_percent", "Tank fill level in percent (0-100)")?;
        let tank_gallons = tank_gauge(
            "tank_gallons",
            "Approximate gallons of fuel in the tank",
        )?;
        let tank_capacity_gallons = tank_gauge(
            "tank_capacity_gallons",
            "Tank capacity derived from gallons and fill level",
        )?;
        let tank_daily_usage_gallons = tank_gauge(
            "tank_daily_usage_gallons",
            "Average gallons used per day since the usage baseline",
        )?;
        let tank_reading_date_seconds = tank_gauge(
            "tank_reading_date_seconds",
            "Date of the last tank reading as a Unix timestamp",
        )?;
        let tank_last_delivery_seconds = tank_gauge(
            "tank_last_delivery_seconds",
            "Date of the last fuel delivery as a Unix timestamp",
        )?;

        let tank_info = GaugeVec::new(
            Opts::new(
                "tank_info",
                "Tank dates as reported by the portal (value is always 1)",
            )
            .namespace(NAMESPACE),
            &["tank", "reading_date", "last_delivery"],
        )?;

        let tanks = IntGauge::with_opts(
            Opts::new("tanks", "Number of tanks in the last snapshot").namespace(NAMESPACE),
        )?;
        let parse_warnings = IntGauge::with_opts(
            Opts::new(
                "parse_warnings",
                "Tank blocks or fields that could not be parsed in the last snapshot",
            )
            .namespace(NAMESPACE),
        )?;
        let last_success_timestamp_seconds = Gauge::with_opts(
            Opts::new(
                "last_success_timestamp_seconds",
                "Unix timestamp of the last successful scrape",
            )
            .namespace(NAMESPACE),
        )?;
        let scrape_duration_seconds = Gauge::with_opts(
            Opts::new(
                "scrape_duration_seconds",
                "Duration of the last scrape cycle",
            )
            .namespace(NAMESPACE),
        )?;
        let up = Gauge::with_opts(
            Opts::new("up", "Whether the last scrape of the portal succeeded (1=yes)")
                .namespace(NAMESPACE),
        )?;

        registry.register(Box::new(tank_level_percent.clone()))?;
        registry.register(Box::new(tank_gallons.clone()))?;
        registry.register(Box::new(tank_capacity_gallons.clone()))?;
        registry.register(Box::new(tank_daily_usage_gallons.clone()))?;
        registry.register(Box::new(tank_reading_date_seconds.clone()))?;
        registry.register(Box::new(tank_last_delivery_seconds.clone()))?;
        registry.register(Box::new(tank_info.clone()))?;
        registry.register(Box::new(tanks.clone()))?;
        registry.register(Box::new(parse_warnings.clone()))?;
        registry.register(Box::new(last_success_timestamp_seconds.clone()))?;
        registry.register(Box::new(scrape_duration_seconds.clone()))?;
        registry.register(Box::new(up.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            tank_level_percent: Arc::new(tank_level_percent),
            tank_gallons: Arc::new(tank_gallons),
            tank_capacity_gallons: Arc::new(tank_capacity_gallons),
            tank_daily_usage_gallons: Arc::new(tank_daily_usage_gallons),
            tank_reading_date_seconds: Arc::new(tank_reading_date_seconds),
            tank_last_delivery_seconds: Arc::new(tank_last_delivery_seconds),
            tank_info: Arc::new(tank_info),
            tanks: Arc::new(tanks),
            parse_warnings: Arc::new(parse_warnings),
            last_success_timestamp_seconds: Arc::new(last_success_timestamp_seconds),
            scrape_duration_seconds: Arc::new(scrape_duration_seconds),
            up: Arc::new(up),
        })
    }

    /// Helper to set a per-tank gauge value
    pub fn set_gauge(&self, gauge: &GaugeVec, tank: &str, value: f64) {
        gauge.with_label_values(&[tank]).set(value);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Drop all per-tank series so tanks that vanished upstream stop being exported
    pub fn reset_tanks(&self) {
        self.tank_level_percent.reset();
        self.tank_gallons.reset();
        self.tank_capacity_gallons.reset();
        self.tank_daily_usage_gallons.reset();
        self.tank_reading_date_seconds.reset();
        self.tank_last_delivery_seconds.reset();
        self.tank_info.reset();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics collector")
    }
}
