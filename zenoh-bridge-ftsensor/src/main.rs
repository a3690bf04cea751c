//! Zenoh bridge for a serial force/torque sensor.
//!
//! Polls the sensor over a serial link at a fixed rate and publishes
//! the six force/torque channels to Zenoh.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use zenoh_bridge_ftsensor::config::FtBridgeConfig;
use zenoh_bridge_ftsensor::link::SensorLink;
use zenoh_bridge_ftsensor::poller::SensorPoller;
use zenoh_bridge_ftsensor::protocol::Wrench;
use zenoh_bridge_ftsensor::publisher::WrenchPublisher;
use zenoh_bridge_ftsensor::queue::SampleQueue;

/// Zenoh bridge for a serial force/torque sensor.
#[derive(Parser, Debug)]
#[command(name = "zenoh-bridge-ftsensor")]
#[command(about = "Polls a force/torque sensor over serial and publishes to Zenoh")]
#[command(version)]
struct Args {
    /// Path to configuration file (JSON5 format)
    #[arg(short, long, default_value = "ftsensor.json5")]
    config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = FtBridgeConfig::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    // Initialize logging
    let log_config = ftlink_common::LoggingConfig {
        level: args
            .log_level
            .clone()
            .unwrap_or_else(|| config.logging.level.clone()),
        format: config.logging.format,
    };
    ftlink_common::init_tracing(&log_config)
        .map_err(|e| anyhow::anyhow!("Failed to init tracing: {}", e))?;

    info!("Starting zenoh-bridge-ftsensor");
    info!("Loaded configuration from {:?}", args.config);

    // Connect to Zenoh
    let session = ftlink_common::connect(&config.zenoh)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to Zenoh: {}", e))?;

    // Open the serial link; failure here is fatal.
    let link = SensorLink::open(&config.sensor)
        .with_context(|| format!("Failed to open sensor link on {}", config.sensor.port))?;

    info!(
        port = %config.sensor.port,
        baud = config.sensor.baud_rate,
        rate_hz = config.sensor.sample_rate_hz,
        "Sensor link open"
    );

    // Wire the poller to the publisher through the bounded queue.
    let queue: SampleQueue<Wrench> = SampleQueue::bounded(config.sensor.queue_depth);

    let poller = SensorPoller::new(
        link,
        queue.clone(),
        config.sensor.name.clone(),
        config.sensor.sample_rate_hz,
    );

    let publisher = WrenchPublisher::new(
        session.clone(),
        &config.key_prefix,
        &config.sensor.name,
        config.serialization,
        queue.clone(),
    );

    info!(key = %publisher.key(), "Publishing wrench samples");

    let mut tasks = Vec::new();
    tasks.push(tokio::spawn(poller.run()));
    tasks.push(tokio::spawn(publisher.run()));

    // Publish bridge status
    let status_key = format!("{}/@/status", config.key_prefix);
    let status = serde_json::json!({
        "bridge": "ftsensor",
        "version": env!("CARGO_PKG_VERSION"),
        "sensor": config.sensor.name,
        "port": config.sensor.port,
        "rate_hz": config.sensor.sample_rate_hz,
        "status": "running"
    });

    if let Err(e) = session.put(&status_key, status.to_string()).await {
        error!("Failed to publish bridge status: {}", e);
    }

    info!("Force/torque bridge running");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    // Stop the pipeline; aborting the poller drops the serial link,
    // closing the device exactly once.
    queue.close();
    for task in tasks {
        task.abort();
    }

    // Publish offline status
    let status = serde_json::json!({
        "bridge": "ftsensor",
        "status": "offline"
    });
    let _ = session.put(&status_key, status.to_string()).await;

    session
        .close()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to close Zenoh session: {}", e))?;
    info!("Force/torque bridge stopped");

    Ok(())
}
