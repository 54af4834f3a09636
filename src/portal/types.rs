//! Portal Data Types
//!
//! Typed views of what the MyFuelPortal site hands back after scraping.
//!
//! - [`Credentials`] - account login, password kept behind [`SecretString`]
//! - [`TankRecord`] - one tank as parsed from a `div.tank-row` block
//! - [`Snapshot`] - the immutable result of one successful scrape cycle

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portal account credentials
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// A single tank as shown on the portal's tank page.
///
/// Every field except `name` is optional: the portal omits or garbles
/// individual values and a tank is still reported with what could be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankRecord {
    pub name: String,
    pub percent: Option<f64>,
    pub gallons: Option<f64>,
    pub capacity: Option<f64>,
    /// ISO date when the portal's `MM/DD/YYYY` format parsed, raw text otherwise
    pub reading_date: Option<String>,
    pub last_delivery: Option<String>,
}

impl TankRecord {
    /// Build a record, deriving `capacity` from gallons and percent.
    pub fn new(
        name: impl Into<String>,
        percent: Option<f64>,
        gallons: Option<f64>,
        reading_date: Option<String>,
        last_delivery: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            percent,
            gallons,
            capacity: derive_capacity(gallons, percent),
            reading_date,
            last_delivery,
        }
    }
}

/// `gallons / (percent / 100)` rounded to one decimal; needs both non-zero.
pub fn derive_capacity(gallons: Option<f64>, percent: Option<f64>) -> Option<f64> {
    match (gallons, percent) {
        (Some(g), Some(p)) if g != 0.0 && p != 0.0 => Some(round_to(g / (p / 100.0), 1)),
        _ => None,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Result of one successful scrape cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tanks: Vec<TankRecord>,
    /// Gallons per day by tank name, only for tanks with a computable rate
    pub daily_usage: BTreeMap<String, f64>,
    pub parse_warnings: usize,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn tank(&self, name: &str) -> Option<&TankRecord> {
        self.tanks.iter().find(|t| t.name == name)
    }

    pub fn daily_usage(&self, name: &str) -> Option<f64> {
        self.daily_usage.get(name).copied()
    }

    pub fn tank_names(&self) -> Vec<String> {
        self.tanks.iter().map(|t| t.name.clone()).collect()
    }
}
