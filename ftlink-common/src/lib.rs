//! ftlink Common Library
//!
//! Shared types and utilities for ftlink sensor bridges:
//!
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`serialization`] - JSON/CBOR payload encoding and decoding
//! - [`session`] - Zenoh session management
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod serialization;
pub mod session;

// Re-export commonly used types at the crate root
pub use config::{LogFormat, LoggingConfig, ZenohConfig, load_config, parse_config};
pub use error::{Error, Result};
pub use serialization::{Format, decode, encode};
pub use session::connect;

/// Initialize tracing with the given configuration.
///
/// The `RUST_LOG` environment variable takes precedence over the
/// configured level. Output is either human-readable text (default)
/// or structured JSON for log aggregation.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
