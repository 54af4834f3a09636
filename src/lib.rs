//! MyFuelPortal Exporter
//!
//! Scrapes fuel tank levels from a MyFuelPortal provider site and republishes
//! them as Prometheus metrics and per-tank sensors.
//!
//! # Overview
//!
//! The portal has no API. On every cycle the exporter logs in through the
//! site's CSRF-protected form, downloads the tank page, parses each tank block
//! and derives a daily usage rate from successive readings. Cycles run on a
//! fixed interval (12 hours by default) and on request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐    HTTPS + cookies   ┌────────────────────┐
//! │ MyFuelPortal│ ◄─────────────────►  │      Exporter      │
//! │  (HTML)     │   login, /Tank       │  ┌──────────────┐  │      HTTP      ┌────────────┐
//! └─────────────┘                      │  │ Coordinator  │  │ ◄────────────► │ Prometheus │
//!                                      │  └──────────────┘  │   /metrics     └────────────┘
//!                                      │  ┌──────────────┐  │
//!                                      │  │Metrics/Sensor│  │   /api/*
//!                                      │  └──────────────┘  │
//!                                      └────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`portal`] - HTTP client, tank page parser, date handling and data types
//! - [`usage`] - Daily usage estimation from successive readings
//! - [`coordinator`] - Scrape cycles and the published snapshot
//! - [`sensor`] - Per-tank sensor entities
//! - [`setup`] - Credential validation
//! - [`collectors`] / [`metrics`] - Prometheus metric definitions and updates
//! - [`server`] - HTTP server and polling loop
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use fuelportal_exporter::{config::Config, server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config/Default.toml")?;
//!     server::start(config).await?;
//!     Ok(())
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod metrics;
pub mod portal;
pub mod sensor;
pub mod server;
pub mod setup;
pub mod usage;
