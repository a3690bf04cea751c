//! Serial link ownership and request/reply framing.

use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_serial::SerialStream;

use crate::config::SensorConfig;
use crate::protocol::{FRAME_LEN, REQUEST};

/// Error type for sensor link operations.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Failed to open serial device: {0}")]
    Open(String),

    #[error("Short or missing reply: {received} of {FRAME_LEN} bytes within the timeout window")]
    Timeout { received: usize },

    #[error("Link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Exclusively-owned connection to the sensor.
///
/// Opened once at startup and closed when dropped. The transport is
/// generic so tests can drive the link over an in-memory stream;
/// production uses a [`SerialStream`].
pub struct SensorLink<T> {
    transport: T,
    timeout: Duration,
}

impl SensorLink<SerialStream> {
    /// Open the serial device described by the configuration.
    pub fn open(config: &SensorConfig) -> Result<Self, LinkError> {
        let parity = match config.parity.to_lowercase().as_str() {
            "even" => tokio_serial::Parity::Even,
            "odd" => tokio_serial::Parity::Odd,
            _ => tokio_serial::Parity::None,
        };

        let stop_bits = match config.stop_bits {
            2 => tokio_serial::StopBits::Two,
            _ => tokio_serial::StopBits::One,
        };

        let data_bits = match config.data_bits {
            5 => tokio_serial::DataBits::Five,
            6 => tokio_serial::DataBits::Six,
            7 => tokio_serial::DataBits::Seven,
            _ => tokio_serial::DataBits::Eight,
        };

        let builder = tokio_serial::new(&config.port, config.baud_rate)
            .parity(parity)
            .stop_bits(stop_bits)
            .data_bits(data_bits);

        let stream = SerialStream::open(&builder)
            .map_err(|e| LinkError::Open(format!("{}: {}", config.port, e)))?;

        Ok(Self::with_transport(
            stream,
            Duration::from_millis(config.timeout_ms),
        ))
    }
}

impl<T: AsyncRead + AsyncWrite + Unpin> SensorLink<T> {
    /// Build a link over an already-open transport.
    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Request one sample frame from the sensor.
    ///
    /// Writes exactly one request byte, then reads exactly
    /// [`FRAME_LEN`] bytes. A reply that does not complete within the
    /// timeout fails with [`LinkError::Timeout`]; a partial buffer is
    /// never returned.
    pub async fn request_record(&mut self) -> Result<[u8; FRAME_LEN], LinkError> {
        self.transport.write_all(&[REQUEST]).await?;
        self.transport.flush().await?;

        let mut frame = [0u8; FRAME_LEN];
        let mut received = 0usize;

        let result = tokio::time::timeout(
            self.timeout,
            fill_frame(&mut self.transport, &mut frame, &mut received),
        )
        .await;

        match result {
            Ok(Ok(())) if received == FRAME_LEN => Ok(frame),
            Ok(Ok(())) => Err(LinkError::Timeout { received }),
            Ok(Err(e)) => Err(LinkError::Io(e)),
            Err(_) => Err(LinkError::Timeout { received }),
        }
    }
}

/// Read into `frame` until it is full or the peer reports EOF.
async fn fill_frame<T: AsyncRead + Unpin>(
    transport: &mut T,
    frame: &mut [u8; FRAME_LEN],
    received: &mut usize,
) -> std::io::Result<()> {
    while *received < FRAME_LEN {
        let n = transport.read(&mut frame[*received..]).await?;
        if n == 0 {
            break;
        }
        *received += n;
    }
    Ok(())
}
