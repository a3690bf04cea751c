//! Zenoh bridge for a serial force/torque sensor.
//!
//! The bridge polls the sensor over a serial link with a one-byte
//! request / fixed-size binary reply protocol, decodes each frame into
//! six signed force/torque channels, and publishes them to Zenoh at a
//! fixed rate.
//!
//! # Key Expressions
//!
//! ```text
//! ftlink/ftsensor/<sensor>/wrench
//! ```
//!
//! Where `<sensor>` is the sensor name from configuration. The payload
//! is the six channels as an ordered array `[Fx, Fy, Fz, Mx, My, Mz]`.
//! Bridge status is published under `ftlink/ftsensor/@/status`.

pub mod config;
pub mod link;
pub mod poller;
pub mod protocol;
pub mod publisher;
pub mod queue;
