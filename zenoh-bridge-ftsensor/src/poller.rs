//! Fixed-rate polling loop for the sensor.

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::link::{LinkError, SensorLink};
use crate::protocol::{ProtocolError, Record, Wrench};
use crate::queue::SampleQueue;

/// Error type for a single poll cycle.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Polls the sensor at a fixed rate and feeds the publish queue.
///
/// Owns the serial link for its whole lifetime; dropping the poller
/// (e.g., on task abort at shutdown) closes the device exactly once.
pub struct SensorPoller<T> {
    link: SensorLink<T>,
    queue: SampleQueue<Wrench>,
    name: String,
    period: Duration,
}

impl<T: AsyncRead + AsyncWrite + Unpin> SensorPoller<T> {
    /// Create a poller sampling at `sample_rate_hz`.
    pub fn new(
        link: SensorLink<T>,
        queue: SampleQueue<Wrench>,
        name: impl Into<String>,
        sample_rate_hz: u32,
    ) -> Self {
        Self {
            link,
            queue,
            name: name.into(),
            period: Duration::from_secs_f64(1.0 / sample_rate_hz.max(1) as f64),
        }
    }

    /// Run the polling loop until the task is aborted.
    ///
    /// The interval measures from tick to tick, so time spent in the
    /// request/read/decode steps does not accumulate as cadence drift.
    /// A failed cycle (timeout, short reply, truncated frame) is
    /// logged and its tick skipped; the loop keeps running.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            sensor = %self.name,
            period_ms = self.period.as_millis() as u64,
            "Starting sensor poller"
        );

        loop {
            interval.tick().await;

            match self.poll_once().await {
                Ok(record) => {
                    debug!(
                        sensor = %self.name,
                        record_number = record.record_number,
                        wrench = ?record.wrench.channels(),
                        "Sample read"
                    );
                    if self.queue.push(record.wrench) {
                        warn!(sensor = %self.name, "Publish queue full, dropped oldest sample");
                    }
                }
                Err(e) => {
                    warn!(sensor = %self.name, error = %e, "Poll cycle failed, skipping tick");
                }
            }
        }
    }

    /// One request → read → decode cycle.
    async fn poll_once(&mut self) -> Result<Record, PollError> {
        let frame = self.link.request_record().await?;
        let record = Record::decode(&frame)?;
        Ok(record)
    }
}
