use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::ExporterError;
use crate::portal::types::Credentials;
use crate::usage::BaselinePolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    /// Provider subdomain, e.g. `acmefuel` for `acmefuel.myfuelportal.com`
    #[serde(default)]
    pub provider: String,
    /// Full base URL; overrides the one derived from `provider`
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: SecretString,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_scrape_interval")]
    pub scrape_interval_seconds: u64,
    #[serde(default)]
    pub usage_baseline: BaselinePolicy,
}

// Credentials may come from the command line only; `validate` catches gaps.
impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            provider: String::new(),
            base_url: None,
            username: String::new(),
            password: default_password(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            scrape_interval_seconds: default_scrape_interval(),
            usage_baseline: BaselinePolicy::default(),
        }
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9187
}

fn default_password() -> SecretString {
    SecretString::from("")
}

fn default_timeout() -> u64 {
    10
}

/// Longest accepted poll interval (30 days)
pub const MAX_SCRAPE_INTERVAL_SECONDS: u64 = 30 * 24 * 60 * 60;

// The portal only refreshes readings a few times a day.
fn default_scrape_interval() -> u64 {
    12 * 60 * 60
}

impl PortalConfig {
    /// Base URL of the provider's portal, without a trailing slash
    pub fn base_url(&self) -> String {
        match self.base_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://{}.myfuelportal.com", self.provider.trim()),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("FUELPORTAL_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Reject configurations that can never produce a successful login.
    pub fn validate(&self) -> std::result::Result<(), ExporterError> {
        let has_base_url = self
            .portal
            .base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if self.portal.provider.trim().is_empty() && !has_base_url {
            return Err(ExporterError::Config(
                "portal.provider or portal.base_url is required".to_string(),
            ));
        }
        if self.portal.username.trim().is_empty() {
            return Err(ExporterError::Config(
                "portal.username is required".to_string(),
            ));
        }
        if self.portal.password.expose_secret().is_empty() {
            return Err(ExporterError::Config(
                "portal.password is required".to_string(),
            ));
        }
        if self.portal.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "portal.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.metrics.scrape_interval_seconds == 0 {
            return Err(ExporterError::Config(
                "metrics.scrape_interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.metrics.scrape_interval_seconds > MAX_SCRAPE_INTERVAL_SECONDS {
            return Err(ExporterError::Config(format!(
                "metrics.scrape_interval_seconds must be at most {}",
                MAX_SCRAPE_INTERVAL_SECONDS
            )));
        }
        Ok(())
    }
}
