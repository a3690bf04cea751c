//! Zenoh publishing task.

use ftlink_common::serialization::{Format, encode};
use tracing::{debug, warn};
use zenoh::Session;

use crate::protocol::Wrench;
use crate::queue::SampleQueue;

/// Drains the sample queue and publishes each wrench to Zenoh.
///
/// The payload is the encoded six-element array
/// `[Fx, Fy, Fz, Mx, My, Mz]`; the record number never leaves the
/// process.
pub struct WrenchPublisher {
    session: Session,
    key: String,
    format: Format,
    queue: SampleQueue<Wrench>,
}

impl WrenchPublisher {
    /// Create a publisher for one sensor.
    pub fn new(
        session: Session,
        key_prefix: &str,
        sensor_name: &str,
        format: Format,
        queue: SampleQueue<Wrench>,
    ) -> Self {
        Self {
            session,
            key: build_key_expr(key_prefix, sensor_name),
            format,
            queue,
        }
    }

    /// The key expression this publisher writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Run until the queue is closed (or the task is aborted).
    ///
    /// Publish failures are logged and do not stop the drain loop.
    pub async fn run(self) {
        debug!(key = %self.key, "Publisher started");

        while let Some(wrench) = self.queue.pop().await {
            let payload = match encode(&wrench, self.format) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "Failed to encode sample");
                    continue;
                }
            };

            if let Err(e) = self.session.put(&self.key, payload).await {
                warn!(key = %self.key, error = %e, "Failed to publish sample");
            } else {
                debug!(key = %self.key, wrench = ?wrench.channels(), "Published");
            }
        }

        debug!(key = %self.key, "Sample queue closed, publisher exiting");
    }
}

/// Build the key expression for a sensor's wrench topic.
pub fn build_key_expr(prefix: &str, sensor: &str) -> String {
    format!("{}/{}/wrench", prefix, sensor)
}
