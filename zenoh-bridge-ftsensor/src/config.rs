//! Configuration for the force/torque sensor bridge.

use ftlink_common::config::{LoggingConfig, ZenohConfig};
use ftlink_common::serialization::Format;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtBridgeConfig {
    /// Zenoh connection settings
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Sensor link settings
    pub sensor: SensorConfig,

    /// Key expression prefix (default: "ftlink/ftsensor")
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Payload serialization format
    #[serde(default)]
    pub serialization: Format,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_key_prefix() -> String {
    "ftlink/ftsensor".to_string()
}

/// Serial link and sampling settings for the sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Sensor name (used in key expressions)
    #[serde(default = "default_name")]
    pub name: String,

    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3")
    pub port: String,

    /// Baud rate (default: 921600)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Data bits (default: 8)
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,

    /// Parity: "none", "even", or "odd" (default: "none")
    #[serde(default = "default_parity")]
    pub parity: String,

    /// Stop bits: 1 or 2 (default: 1)
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,

    /// Read timeout in milliseconds (default: 1000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Sampling/publish rate in Hz (default: 10)
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: u32,

    /// Publish queue depth; oldest samples are dropped on overflow
    /// (default: 10)
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

fn default_name() -> String {
    "ftsensor".to_string()
}

fn default_baud_rate() -> u32 {
    921_600
}

fn default_data_bits() -> u8 {
    8
}

fn default_parity() -> String {
    "none".to_string()
}

fn default_stop_bits() -> u8 {
    1
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_sample_rate_hz() -> u32 {
    10
}

fn default_queue_depth() -> usize {
    10
}

impl FtBridgeConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: FtBridgeConfig = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensor = &self.sensor;

        if sensor.port.is_empty() {
            return Err(ConfigError::Validation(
                "Sensor port cannot be empty".to_string(),
            ));
        }

        if sensor.name.is_empty() || sensor.name.contains('/') {
            return Err(ConfigError::Validation(format!(
                "Invalid sensor name '{}' (must be non-empty, without '/')",
                sensor.name
            )));
        }

        match sensor.parity.to_lowercase().as_str() {
            "none" | "even" | "odd" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Invalid parity '{}' (use none, even, or odd)",
                    other
                )));
            }
        }

        if !(5..=8).contains(&sensor.data_bits) {
            return Err(ConfigError::Validation(format!(
                "Invalid data_bits {} (use 5-8)",
                sensor.data_bits
            )));
        }

        if sensor.stop_bits != 1 && sensor.stop_bits != 2 {
            return Err(ConfigError::Validation(format!(
                "Invalid stop_bits {} (use 1 or 2)",
                sensor.stop_bits
            )));
        }

        if sensor.sample_rate_hz == 0 {
            return Err(ConfigError::Validation(
                "sample_rate_hz must be at least 1".to_string(),
            ));
        }

        if sensor.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "timeout_ms must be at least 1".to_string(),
            ));
        }

        if sensor.queue_depth == 0 {
            return Err(ConfigError::Validation(
                "queue_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
