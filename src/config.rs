//! Configuration loading with layered overrides.
//!
//! Config is loaded in order (each layer overrides the previous):
//! 1. Default values
//! 2. Config file (TOML)
//! 3. Environment variables
//! 4. Explicit overrides from the caller
//!
//! Grants for the full-access role are never read from config files: that
//! role always holds the whole permission catalogue.

use std::collections::BTreeMap;
use std::path::Path;

use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::permission::{FULL_ACCESS_ROLE, Role};

/// Policy configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub display: Presentation,
}

/// Per-role permission grants, keyed by role name.
///
/// Roles left out keep their built-in grants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub grants: BTreeMap<String, Vec<String>>,
}

/// Visibility settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    /// Roles that see every task regardless of client ownership.
    #[serde(default = "default_task_view_all")]
    pub task_view_all: Vec<String>,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            task_view_all: default_task_view_all(),
        }
    }
}

fn default_task_view_all() -> Vec<String> {
    [Role::Admin, Role::SubAdmin, Role::TeamLead]
        .iter()
        .map(|r| r.as_str().to_string())
        .collect()
}

/// Presentation settings used by the formatting helpers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// IANA time zone name used for calendar-day comparisons.
    /// Empty means the system time zone.
    #[serde(default)]
    pub timezone: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            timezone: String::new(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Presentation {
    /// Format an amount with the configured currency symbol.
    pub fn currency(&self, amount: f64) -> String {
        crate::format::currency(amount, &self.currency_symbol)
    }

    /// Resolve the configured time zone.
    pub fn time_zone(&self) -> crate::Result<TimeZone> {
        if self.timezone.is_empty() {
            return Ok(TimeZone::system());
        }
        if self.timezone.eq_ignore_ascii_case("utc") {
            return Ok(TimeZone::UTC);
        }
        TimeZone::get(&self.timezone)
            .map_err(|e| Error::Config(format!("Unknown time zone '{}': {e}", self.timezone)))
    }
}

/// Builder for loading configuration with customizable options.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix (e.g., "MYAPP" -> MYAPP_CURRENCY, MYAPP_TIMEZONE)
    pub env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            env_prefix: "LEADWAY".to_string(),
        }
    }
}

impl ConfigLoader {
    /// Create a new config loader with the given environment prefix.
    pub fn new(env_prefix: impl Into<String>) -> Self {
        Self {
            env_prefix: env_prefix.into(),
        }
    }

    /// Load configuration from file, environment, and explicit overrides.
    ///
    /// # Arguments
    /// * `config_path` - Optional path to TOML config file
    /// * `currency_symbol` - Override for the currency symbol
    /// * `timezone` - Override for the time zone name
    pub fn load(
        &self,
        config_path: Option<&Path>,
        currency_symbol: Option<&str>,
        timezone: Option<&str>,
    ) -> crate::Result<Config> {
        let mut config: Config = if let Some(path) = config_path {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config: {e}")))?
        } else {
            Config::default()
        };

        // Full-access grants are computed, never configured
        let full_access_keys: Vec<String> = config
            .permissions
            .grants
            .keys()
            .filter(|name| Role::parse(name) == Some(FULL_ACCESS_ROLE))
            .cloned()
            .collect();
        for key in full_access_keys {
            tracing::warn!("Ignoring [permissions.grants] entry '{key}' from config file");
            config.permissions.grants.remove(&key);
        }

        let prefix = &self.env_prefix;

        if let Ok(symbol) = std::env::var(format!("{prefix}_CURRENCY")) {
            config.display.currency_symbol = symbol;
        }
        if let Ok(tz) = std::env::var(format!("{prefix}_TIMEZONE")) {
            config.display.timezone = tz;
        }

        if let Some(symbol) = currency_symbol {
            config.display.currency_symbol = symbol.to_string();
        }
        if let Some(tz) = timezone {
            config.display.timezone = tz.to_string();
        }

        // Validate
        config.display.time_zone()?;
        for name in &config.visibility.task_view_all {
            if Role::parse(name).is_none() {
                return Err(Error::Config(format!(
                    "Unknown role in visibility.task_view_all: {name}"
                )));
            }
        }

        Ok(config)
    }
}
