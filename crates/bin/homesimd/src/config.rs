//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `homesim.toml` in the working directory (or the path in
//! `HOMESIM_CONFIG`). Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::time::Duration;

use homesim_adapter_virtual::DeviceDefaults;
use homesim_domain::device::DeviceKind;
use homesim_domain::voice::InterpreterConfig;
use serde::Deserialize;

/// Daily schedules match on the wall-clock minute, so every minute needs a tick.
const MAX_TICK_INTERVAL_MS: u64 = 60_000;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub simulation: SimulationConfig,
    /// Factory settings for new devices.
    pub devices: DevicesConfig,
    /// Voice assistant interpreter tuning.
    pub voice: InterpreterConfig,
    /// Devices created at start-up.
    pub home: HomeConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Milliseconds between two simulation ticks.
    pub tick_interval_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    pub lock_pin: String,
    pub garage_pin: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub devices: Vec<DeviceEntry>,
}

/// One `[[home.devices]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceEntry {
    pub kind: String,
    pub name: String,
}

impl Config {
    /// Load configuration from `homesim.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMESIM_CONFIG").unwrap_or_else(|_| "homesim.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HOMESIM_TICK_MS")
            && let Ok(ms) = val.parse()
        {
            self.simulation.tick_interval_ms = ms;
        }
        if let Ok(val) = std::env::var("HOMESIM_LOCK_PIN") {
            self.devices.lock_pin = val;
        }
        if let Ok(val) = std::env::var("HOMESIM_GARAGE_PIN") {
            self.devices.garage_pin = val;
        }
        if let Ok(val) = std::env::var("HOMESIM_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_TICK_INTERVAL_MS).contains(&self.simulation.tick_interval_ms) {
            return Err(ConfigError::Validation(format!(
                "tick_interval_ms must be within 1..={MAX_TICK_INTERVAL_MS}, got {}",
                self.simulation.tick_interval_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.voice.confidence_threshold) {
            return Err(ConfigError::Validation(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.voice.confidence_threshold
            )));
        }
        if self.voice.context_size == 0 {
            return Err(ConfigError::Validation(
                "context_size must be non-zero".to_string(),
            ));
        }
        for (field, pin) in [
            ("lock_pin", &self.devices.lock_pin),
            ("garage_pin", &self.devices.garage_pin),
        ] {
            if pin.is_empty() || !pin.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be a non-empty string of digits"
                )));
            }
        }
        for entry in &self.home.devices {
            entry.kind()?;
            if entry.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "device of kind {:?} has an empty name",
                    entry.kind
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.simulation.tick_interval_ms)
    }

    /// Settings handed to the device factory.
    #[must_use]
    pub fn device_defaults(&self) -> DeviceDefaults {
        DeviceDefaults {
            lock_pin: self.devices.lock_pin.clone(),
            garage_pin: self.devices.garage_pin.clone(),
            voice: self.voice,
        }
    }
}

impl DeviceEntry {
    /// The parsed device kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown type string.
    pub fn kind(&self) -> Result<DeviceKind, ConfigError> {
        self.kind
            .parse()
            .map_err(|err| ConfigError::Validation(format!("{err}")))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "homesimd=info,homesim=info".to_string(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
        }
    }
}

impl Default for DevicesConfig {
    fn default() -> Self {
        let defaults = DeviceDefaults::default();
        Self {
            lock_pin: defaults.lock_pin,
            garage_pin: defaults.garage_pin,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.simulation.tick_interval_ms, 2000);
        assert_eq!(config.devices.lock_pin, "1234");
        assert_eq!(config.devices.garage_pin, "0000");
        assert!((config.voice.confidence_threshold - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.voice.context_size, 5);
        assert!(config.home.devices.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(2));
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [logging]
            filter = 'debug'

            [simulation]
            tick_interval_ms = 500

            [devices]
            lock_pin = '9876'
            garage_pin = '1111'

            [voice]
            confidence_threshold = 0.4
            context_size = 3

            [[home.devices]]
            kind = 'light'
            name = 'kitchen'

            [[home.devices]]
            kind = 'garage_door'
            name = 'garage'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.devices.lock_pin, "9876");
        assert_eq!(config.voice.context_size, 3);
        assert_eq!(config.home.devices.len(), 2);
        assert_eq!(config.home.devices[1].kind().unwrap(), DeviceKind::GarageDoor);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_parse_partial_voice_section_with_defaults() {
        let toml = "
            [voice]
            context_size = 8
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.voice.context_size, 8);
        assert!((config.voice.confidence_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.simulation.tick_interval_ms, 2000);
    }

    #[test]
    fn should_reject_zero_tick_interval() {
        let mut config = Config::default();
        config.simulation.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_tick_interval_longer_than_a_minute() {
        let mut config = Config::default();
        config.simulation.tick_interval_ms = 60_001;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.simulation.tick_interval_ms = 60_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_reject_threshold_outside_unit_interval() {
        let mut config = Config::default();
        config.voice.confidence_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_context_size() {
        let mut config = Config::default();
        config.voice.context_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_non_numeric_pin() {
        let mut config = Config::default();
        config.devices.garage_pin = "abcd".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_unknown_start_up_device_kind() {
        let mut config = Config::default();
        config.home.devices.push(DeviceEntry {
            kind: "toaster".to_string(),
            name: "kitchen".to_string(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_carry_pins_into_device_defaults() {
        let mut config = Config::default();
        config.devices.lock_pin = "5555".to_string();
        let defaults = config.device_defaults();
        assert_eq!(defaults.lock_pin, "5555");
        assert_eq!(defaults.garage_pin, "0000");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
