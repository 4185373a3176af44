//! # Back-Office Configuration
//!
//! Session defaults, service simulation and business settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line (highest priority)                                    │
//! │     --role waiter --latency-ms 0                                       │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     NAS_ROLE=waiter  NAS_LATENCY_MS=0  NAS_SEED=false                  │
//! │     NAS_INVOICE_PREFIX=HTL  NAS_GRACE_MINUTES=20                       │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config path, or                                                  │
//! │     ~/.config/connect/backoffice.toml (Linux)                          │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [session]
//! role = "admin"
//! user_name = "admin"
//!
//! [service]
//! simulated_latency_ms = 50
//! seed_fixtures = true
//!
//! [settings]
//! check_in_hour = "14:00"
//! check_out_hour = "11:00"
//! dining_slot_hours = 2
//! default_grace_minutes = 15
//! enable_tariff_grids = false
//! invoice_prefix = "NAS"
//! currency = "MGA"
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use nas_core::rules::navigation::Role;
use nas_core::validation::{validate_grace_minutes, validate_invoice_prefix};
use nas_core::{TimeSlot, DEFAULT_GRACE_MINUTES};
use nas_store::StoreConfig;

// =============================================================================
// Errors
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Who is at the keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Role selected at startup. Only filters the screens shown.
    pub role: Role,

    /// Recorded on stock movements.
    pub user_name: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            role: Role::Admin,
            user_name: "admin".to_string(),
        }
    }
}

/// Behaviour of the simulated back end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Delay awaited by every uncached call.
    pub simulated_latency_ms: u64,

    /// Start from the demo data set instead of an empty store.
    pub seed_fixtures: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            simulated_latency_ms: 50,
            seed_fixtures: true,
        }
    }
}

/// Business settings of the establishment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessSettings {
    /// Time a stay starts on its arrival day.
    pub check_in_hour: TimeSlot,

    /// Time a stay ends on its departure day.
    pub check_out_hour: TimeSlot,

    /// Length of a dining slot, in hours.
    pub dining_slot_hours: u32,

    pub default_grace_minutes: u32,

    pub enable_tariff_grids: bool,

    /// Prefix of invoice numbers (`NAS-2025-0001`).
    pub invoice_prefix: String,

    /// ISO 4217 code of the single currency.
    pub currency: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        let hour = |h| {
            TimeSlot::from_time(NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN))
        };
        BusinessSettings {
            check_in_hour: hour(14),
            check_out_hour: hour(11),
            dining_slot_hours: 2,
            default_grace_minutes: DEFAULT_GRACE_MINUTES,
            enable_tariff_grids: false,
            invoice_prefix: "NAS".to_string(),
            currency: nas_core::money::CURRENCY_CODE.to_string(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete back-office configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub service: ServiceSettings,

    #[serde(default)]
    pub settings: BusinessSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (backoffice.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading back-office config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load back-office config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Back-office config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_invoice_prefix(&self.settings.invoice_prefix)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        validate_grace_minutes(self.settings.default_grace_minutes)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !(1..=6).contains(&self.settings.dining_slot_hours) {
            return Err(ConfigError::Invalid(
                "dining_slot_hours must be between 1 and 6".into(),
            ));
        }

        if self.settings.check_out_hour.time() >= self.settings.check_in_hour.time() {
            return Err(ConfigError::Invalid(
                "check_out_hour must be earlier than check_in_hour".into(),
            ));
        }

        if self.session.user_name.trim().is_empty() {
            return Err(ConfigError::Invalid("user_name is required".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(role) = std::env::var("NAS_ROLE") {
            match role.parse::<Role>() {
                Ok(parsed) => {
                    debug!(role = %parsed, "Overriding role from environment");
                    self.session.role = parsed;
                }
                Err(_) => warn!(role = %role, "Unknown role in environment"),
            }
        }

        if let Ok(latency) = std::env::var("NAS_LATENCY_MS") {
            if let Ok(ms) = latency.parse::<u64>() {
                self.service.simulated_latency_ms = ms;
            }
        }

        if let Ok(seed) = std::env::var("NAS_SEED") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.service.seed_fixtures = true,
                "0" | "false" | "no" => self.service.seed_fixtures = false,
                _ => warn!(seed = %seed, "Unknown NAS_SEED value in environment"),
            }
        }

        if let Ok(prefix) = std::env::var("NAS_INVOICE_PREFIX") {
            debug!(prefix = %prefix, "Overriding invoice prefix from environment");
            self.settings.invoice_prefix = prefix;
        }

        if let Ok(grace) = std::env::var("NAS_GRACE_MINUTES") {
            if let Ok(minutes) = grace.parse::<u32>() {
                self.settings.default_grace_minutes = minutes;
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("mg", "nas", "connect")
            .map(|dirs| dirs.config_dir().join("backoffice.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.service.simulated_latency_ms)
    }

    /// Store settings derived from the business settings.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .invoice_prefix(self.settings.invoice_prefix.clone())
            .default_grace_minutes(self.settings.default_grace_minutes)
    }
}
