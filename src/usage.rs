//! Daily Usage Estimation
//!
//! The portal only reports the current level, so consumption is derived from
//! two readings of the same tank taken on different days:
//!
//! ```text
//! usage = (baseline_gallons - current_gallons) / days_between
//! ```
//!
//! Positive values mean fuel was burned. Tanks are keyed by display name.
//!
//! # Baseline Policy
//!
//! [`BaselinePolicy::Frozen`] keeps the first reading as the baseline for the
//! life of the estimator, so each rate is averaged over everything since that
//! first reading. [`BaselinePolicy::Advancing`] moves the baseline to each
//! reading that produced a rate, giving the usage since the previous reading.

use crate::portal::dates::parse_iso;
use crate::portal::types::round_to;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselinePolicy {
    #[default]
    Frozen,
    Advancing,
}

/// A stored reading used as the reference point for a tank
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub gallons: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct UsageEstimator {
    policy: BaselinePolicy,
    baselines: HashMap<String, Reading>,
}

impl UsageEstimator {
    pub fn new(policy: BaselinePolicy) -> Self {
        Self {
            policy,
            baselines: HashMap::new(),
        }
    }

    pub fn policy(&self) -> BaselinePolicy {
        self.policy
    }

    pub fn baseline(&self, tank: &str) -> Option<Reading> {
        self.baselines.get(tank).copied()
    }

    /// Gallons per day for `tank`, or `None` when no rate can be computed yet.
    ///
    /// `date` is the ISO reading date from the snapshot; raw unparsed dates
    /// are treated as missing.
    pub fn estimate(&mut self, tank: &str, gallons: Option<f64>, date: Option<&str>) -> Option<f64> {
        let gallons = gallons?;
        let date = date.and_then(parse_iso)?;

        let Some(baseline) = self.baselines.get(tank).copied() else {
            debug!("Recording first usage baseline for tank {}", tank);
            self.baselines
                .insert(tank.to_string(), Reading { gallons, date });
            return None;
        };

        let days = (date - baseline.date).num_days();
        if days <= 0 {
            return None;
        }

        let usage = round_to((baseline.gallons - gallons) / days as f64, 2);
        if self.policy == BaselinePolicy::Advancing {
            self.baselines
                .insert(tank.to_string(), Reading { gallons, date });
        }
        Some(usage)
    }
}
