//! Poll Coordinator
//!
//! Owns everything that belongs to one configured portal account: the client,
//! the credentials, the latest published [`Snapshot`] and the usage baselines.
//!
//! # Cycles
//!
//! A cycle is `authenticate → fetch → parse → estimate usage → publish`. Only
//! one cycle runs at a time. A caller of [`Coordinator::refresh`] that arrives
//! while a cycle is in flight waits for it and gets its outcome back instead of
//! starting a second one.
//!
//! # Failure
//!
//! Auth and fetch errors abort the cycle. The previously published snapshot
//! stays in place, so readers keep a consistent if stale view.

use crate::config::Config;
use crate::error::{ExporterError, Result};
use crate::portal::{parse_tanks_with_warnings, Credentials, ParseOutcome, PortalClient, Snapshot};
use crate::sensor::{sensors_for_tanks, TankSensor};
use crate::usage::{BaselinePolicy, UsageEstimator};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, info, warn};

type CycleOutcome = std::result::Result<Arc<Snapshot>, String>;

/// Marks a cycle as running until dropped, including when the cycle is cancelled
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Coordinator {
    client: PortalClient,
    credentials: Credentials,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    usage: Mutex<UsageEstimator>,
    last_cycle: Mutex<Option<CycleOutcome>>,
    completed_cycles: AtomicU64,
    cycle_running: AtomicBool,
    refresh_requested: Notify,
}

impl Coordinator {
    pub fn new(client: PortalClient, credentials: Credentials, policy: BaselinePolicy) -> Self {
        Self {
            client,
            credentials,
            snapshot: RwLock::new(None),
            usage: Mutex::new(UsageEstimator::new(policy)),
            last_cycle: Mutex::new(None),
            completed_cycles: AtomicU64::new(0),
            cycle_running: AtomicBool::new(false),
            refresh_requested: Notify::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            PortalClient::from_config(&config.portal),
            config.portal.credentials(),
            config.metrics.usage_baseline,
        )
    }

    /// Run the first cycle and create the sensors for the tanks it found.
    ///
    /// The sensor set is fixed from here on; tanks that appear later are only
    /// visible through the snapshot and metrics.
    pub async fn setup(&self) -> Result<Vec<TankSensor>> {
        let snapshot = self.refresh().await?;
        let sensors = sensors_for_tanks(&snapshot.tank_names());
        info!(
            "Set up {} sensors for {} tanks",
            sensors.len(),
            snapshot.tanks.len()
        );
        Ok(sensors)
    }

    /// Latest published snapshot, if any cycle has succeeded yet
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Number of cycles that ran to completion, successful or not
    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles.load(Ordering::Acquire)
    }

    /// Message of the last cycle if it failed
    pub async fn last_error(&self) -> Option<String> {
        match self.last_cycle.lock().await.as_ref() {
            Some(Err(e)) => Some(e.clone()),
            _ => None,
        }
    }

    /// Ask the scheduler for an extra cycle. Requests made before it wakes
    /// up collapse into a single cycle, and requests made while a cycle is
    /// running are folded into that cycle.
    pub fn request_refresh(&self) {
        if self.cycle_running.load(Ordering::Acquire) {
            debug!("Refresh requested while a cycle is running, folded into it");
            return;
        }
        self.refresh_requested.notify_one();
    }

    /// Whether a scrape cycle is in flight right now
    pub fn is_refreshing(&self) -> bool {
        self.cycle_running.load(Ordering::Acquire)
    }

    /// Resolves when [`Coordinator::request_refresh`] has been called
    pub async fn refresh_requested(&self) {
        self.refresh_requested.notified().await;
    }

    /// Run a scrape cycle, or join the one already in flight.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let seen = self.completed_cycles.load(Ordering::Acquire);
        let mut last_cycle = self.last_cycle.lock().await;

        if self.completed_cycles.load(Ordering::Acquire) != seen {
            // A cycle finished while we waited for the lock
            if let Some(outcome) = last_cycle.as_ref() {
                return outcome.clone().map_err(ExporterError::Cycle);
            }
        }

        let result = {
            let _running = RunningGuard::set(&self.cycle_running);
            self.run_cycle().await
        };
        *last_cycle = Some(match &result {
            Ok(snapshot) => Ok(snapshot.clone()),
            Err(e) => Err(e.to_string()),
        });
        self.completed_cycles.fetch_add(1, Ordering::AcqRel);

        if let Err(e) = &result {
            warn!("Scrape cycle failed, keeping previous snapshot: {}", e);
        }
        result
    }

    async fn run_cycle(&self) -> Result<Arc<Snapshot>> {
        info!("Scraping tanks from {}", self.client.base_url());

        let session = self.client.authenticate(&self.credentials).await?;
        let html = self.client.fetch_data(&session).await?;
        drop(session);

        let ParseOutcome { tanks, warnings } = parse_tanks_with_warnings(&html);

        let daily_usage: BTreeMap<String, f64> = {
            let mut usage = self.usage.lock().await;
            tanks
                .iter()
                .filter_map(|tank| {
                    usage
                        .estimate(&tank.name, tank.gallons, tank.reading_date.as_deref())
                        .map(|rate| (tank.name.clone(), rate))
                })
                .collect()
        };

        let snapshot = Arc::new(Snapshot {
            tanks,
            daily_usage,
            parse_warnings: warnings.len(),
            fetched_at: Utc::now(),
        });
        *self.snapshot.write().await = Some(snapshot.clone());

        info!(
            "Published snapshot with {} tanks ({} parse warnings)",
            snapshot.tanks.len(),
            snapshot.parse_warnings
        );
        Ok(snapshot)
    }
}
