//! HTTP Server and Scrape Loop
//!
//! This module implements the exporter HTTP server and the portal polling loop.
//!
//! # Architecture
//!
//! - **HTTP Server**: Axum-based server exposing metrics, health and a small JSON API
//! - **Scrape Loop**: Background task that runs a coordinator cycle on a fixed
//!   interval or when a refresh is requested, then updates metrics
//! - **State Management**: Shared state (config, metrics, coordinator, sensors) using Arc
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page
//! - `GET /metrics` - Prometheus metrics in text format
//! - `GET /health` - 200 if the last scrape succeeded, 503 otherwise
//! - `GET /api/tanks` - Latest snapshot as JSON
//! - `GET /api/sensors` - Every tank sensor with its current state
//! - `POST /api/refresh` - Request an extra scrape cycle
//!
//! # Error Handling
//!
//! A failed cycle is logged and sets `fuelportal_up` to 0. The last good
//! snapshot and its metrics stay available until the next successful cycle.

use crate::collectors::{self, CollectionContext, CollectionStatus};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::metrics::MetricsCollector;
use crate::sensor::{SensorValue, TankSensor};
use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::{interval_at, Duration, Instant};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub metrics: MetricsCollector,
    pub coordinator: Arc<Coordinator>,
    pub sensors: Arc<Vec<TankSensor>>,
}

pub async fn start(config: Config) -> anyhow::Result<()> {
    config.validate()?;
    let metrics = MetricsCollector::new()?;
    let coordinator = Arc::new(Coordinator::from_config(&config));

    let started = Instant::now();
    let sensors = coordinator
        .setup()
        .await
        .context("Initial scrape of the portal failed")?;
    if let Some(snapshot) = coordinator.latest().await {
        collectors::publish_snapshot(&metrics, &snapshot);
    }
    metrics
        .scrape_duration_seconds
        .set(started.elapsed().as_secs_f64());
    metrics.up.set(1.0);

    let state = AppState {
        config: config.clone(),
        metrics,
        coordinator,
        sensors: Arc::new(sensors),
    };

    // Start background scraping
    let collection_state = state.clone();
    tokio::spawn(async move {
        collect_metrics_loop(collection_state).await;
    });

    let app = router(state);

    // Start the server
    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Metrics server listening on {}", addr);
    info!("Metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router serving metrics and the JSON API
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/api/tanks", get(tanks_handler))
        .route("/api/sensors", get(sensors_handler))
        .route("/api/refresh", post(refresh_handler))
        .with_state(state)
}

async fn collect_metrics_loop(state: AppState) {
    let period = Duration::from_secs(state.config.metrics.scrape_interval_seconds);
    // Setup already ran the first cycle
    let mut ticker = interval_at(Instant::now() + period, period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = state.coordinator.refresh_requested() => {
                info!("Running requested refresh");
            }
        }

        if let Err(e) = collect_metrics(&state).await {
            error!("Failed to collect metrics: {}", e);
            state.metrics.up.set(0.0);
        } else {
            state.metrics.up.set(1.0);
        }
    }
}

/// Run one scrape cycle and update the metrics from it
pub async fn collect_metrics(state: &AppState) -> anyhow::Result<()> {
    info!("Collecting tank metrics from the portal");

    let ctx = CollectionContext {
        coordinator: &state.coordinator,
        metrics: &state.metrics,
    };

    let started = Instant::now();
    let status = collectors::collect_tank_metrics(&ctx).await?;
    state
        .metrics
        .scrape_duration_seconds
        .set(started.elapsed().as_secs_f64());

    if status == CollectionStatus::Failed {
        anyhow::bail!("Failed to scrape tanks from the portal - check credentials and connectivity");
    }

    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Fuel Portal Exporter</title></head>
<body>
<h1>Fuel Portal Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
<p><a href="/api/tanks">Tanks</a></p>
<p><a href="/api/sensors">Sensors</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let up_value = state.metrics.up.get();

    if up_value > 0.0 {
        (StatusCode::OK, "OK")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Fuel portal unreachable")
    }
}

async fn tanks_handler(State(state): State<AppState>) -> Response {
    match state.coordinator.latest().await {
        Some(snapshot) => Json(&*snapshot).into_response(),
        None => (StatusCode::NOT_FOUND, "No snapshot yet").into_response(),
    }
}

#[derive(Debug, Serialize)]
struct SensorView {
    unique_id: String,
    name: String,
    tank: String,
    kind: &'static str,
    state: Option<SensorValue>,
    device_class: Option<&'static str>,
    state_class: Option<&'static str>,
}

async fn sensors_handler(State(state): State<AppState>) -> Json<Vec<SensorView>> {
    let snapshot = state.coordinator.latest().await;
    let views = state
        .sensors
        .iter()
        .map(|sensor| SensorView {
            unique_id: sensor.unique_id(),
            name: sensor.name(),
            tank: sensor.tank().to_string(),
            kind: sensor.kind().key(),
            state: snapshot.as_deref().and_then(|s| sensor.state(s)),
            device_class: sensor.kind().device_class(),
            state_class: sensor.kind().state_class(),
        })
        .collect();
    Json(views)
}

async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.coordinator.request_refresh();
    (StatusCode::ACCEPTED, "Refresh requested")
}
