//! Tank Sensors
//!
//! Each tank found at setup gets a fixed set of sensors. A sensor holds no
//! value of its own; it looks its tank up by name in whatever snapshot it is
//! given and reads one field.

use crate::portal::Snapshot;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Gallons,
    Percent,
    Capacity,
    LastDelivery,
    ReadingDate,
    DailyUsage,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Gallons,
        SensorKind::Percent,
        SensorKind::Capacity,
        SensorKind::LastDelivery,
        SensorKind::ReadingDate,
        SensorKind::DailyUsage,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SensorKind::Gallons => "gallons",
            SensorKind::Percent => "percent",
            SensorKind::Capacity => "capacity",
            SensorKind::LastDelivery => "last_delivery",
            SensorKind::ReadingDate => "reading_date",
            SensorKind::DailyUsage => "usage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SensorKind::Gallons => "Gallons",
            SensorKind::Percent => "Percent",
            SensorKind::Capacity => "Capacity",
            SensorKind::LastDelivery => "Last Delivery",
            SensorKind::ReadingDate => "Reading Date",
            SensorKind::DailyUsage => "Daily Usage",
        }
    }

    pub fn device_class(&self) -> Option<&'static str> {
        match self {
            SensorKind::Gallons | SensorKind::Capacity | SensorKind::DailyUsage => Some("gas"),
            _ => None,
        }
    }

    pub fn state_class(&self) -> Option<&'static str> {
        match self {
            SensorKind::Gallons | SensorKind::Capacity => Some("total_increasing"),
            SensorKind::DailyUsage => Some("measurement"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TankSensor {
    tank: String,
    kind: SensorKind,
}

impl TankSensor {
    pub fn new(tank: impl Into<String>, kind: SensorKind) -> Self {
        Self {
            tank: tank.into(),
            kind,
        }
    }

    pub fn tank(&self) -> &str {
        &self.tank
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.tank, self.kind.label())
    }

    pub fn unique_id(&self) -> String {
        format!("myfuelportal_{}_{}", slugify(&self.tank), self.kind.key())
    }

    /// Current value, `None` when the tank or the field is absent
    pub fn state(&self, snapshot: &Snapshot) -> Option<SensorValue> {
        if self.kind == SensorKind::DailyUsage {
            return snapshot.daily_usage(&self.tank).map(SensorValue::Number);
        }

        let tank = snapshot.tank(&self.tank)?;
        match self.kind {
            SensorKind::Gallons => tank.gallons.map(SensorValue::Number),
            SensorKind::Percent => tank.percent.map(SensorValue::Number),
            SensorKind::Capacity => tank.capacity.map(SensorValue::Number),
            SensorKind::LastDelivery => tank.last_delivery.clone().map(SensorValue::Text),
            SensorKind::ReadingDate => tank.reading_date.clone().map(SensorValue::Text),
            SensorKind::DailyUsage => None,
        }
    }
}

/// One sensor of every kind for each tank name
pub fn sensors_for_tanks(names: &[String]) -> Vec<TankSensor> {
    names
        .iter()
        .flat_map(|name| {
            SensorKind::ALL
                .iter()
                .map(move |kind| TankSensor::new(name.clone(), *kind))
        })
        .collect()
}

/// Lowercase, spaces to underscores, everything outside `[a-z0-9_]` dropped
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}
