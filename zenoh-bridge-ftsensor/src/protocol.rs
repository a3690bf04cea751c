//! Wire protocol for the force/torque sensor.
//!
//! The sensor speaks a one-byte request / fixed-size reply protocol:
//! the host writes `'R'` and the sensor answers with a 27-byte frame:
//!
//! ```text
//! u8 record_number | i32 Fx | i32 Fy | i32 Fz | i32 Mx | i32 My | i32 Mz | CR LF
//! ```
//!
//! All integers are little-endian. There is no checksum; the trailing
//! terminator is not validated.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Request byte sent to the sensor for each sample.
pub const REQUEST: u8 = b'R';

/// Length of the decoded portion of a frame (record number + 6 channels).
pub const PAYLOAD_LEN: usize = 25;

/// Total frame length including the 2-byte terminator.
pub const FRAME_LEN: usize = 27;

/// Frame terminator. Written by [`Record::encode`], ignored on decode.
pub const TERMINATOR: [u8; 2] = *b"\r\n";

/// Protocol decode errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Truncated frame: got {len} bytes, need at least {PAYLOAD_LEN}")]
    Truncated { len: usize },
}

/// Six force/torque channels of one sample.
///
/// Serializes as the flat ordered array `[Fx, Fy, Fz, Mx, My, Mz]`,
/// which is the exact payload published on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wrench {
    pub fx: i32,
    pub fy: i32,
    pub fz: i32,
    pub mx: i32,
    pub my: i32,
    pub mz: i32,
}

impl Wrench {
    /// The channels in publication order.
    pub fn channels(&self) -> [i32; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }
}

impl From<[i32; 6]> for Wrench {
    fn from(c: [i32; 6]) -> Self {
        Self {
            fx: c[0],
            fy: c[1],
            fz: c[2],
            mx: c[3],
            my: c[4],
            mz: c[5],
        }
    }
}

impl Serialize for Wrench {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.channels().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Wrench {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let channels = <Vec<i32>>::deserialize(deserializer)?;
        let channels: [i32; 6] = channels
            .try_into()
            .map_err(|v: Vec<i32>| D::Error::invalid_length(v.len(), &"exactly 6 channels"))?;
        Ok(Wrench::from(channels))
    }
}

/// One decoded sample from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Sequence byte assigned by the sensor. Logged only; never part
    /// of the published payload and never checked for gaps.
    pub record_number: u8,

    /// The six force/torque channels.
    pub wrench: Wrench,
}

impl Record {
    /// Decode a frame.
    ///
    /// Only the first [`PAYLOAD_LEN`] bytes are interpreted; trailing
    /// terminator bytes (if present) are ignored. A shorter buffer is
    /// rejected, never zero-padded.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < PAYLOAD_LEN {
            return Err(ProtocolError::Truncated { len: data.len() });
        }

        Ok(Self {
            record_number: data[0],
            wrench: Wrench {
                fx: read_i32_le(data, 1),
                fy: read_i32_le(data, 5),
                fz: read_i32_le(data, 9),
                mx: read_i32_le(data, 13),
                my: read_i32_le(data, 17),
                mz: read_i32_le(data, 21),
            },
        })
    }

    /// Encode this record as a full frame, terminator included.
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        let mut frame = [0u8; FRAME_LEN];
        frame[0] = self.record_number;
        for (i, channel) in self.wrench.channels().iter().enumerate() {
            let offset = 1 + i * 4;
            frame[offset..offset + 4].copy_from_slice(&channel.to_le_bytes());
        }
        frame[PAYLOAD_LEN..].copy_from_slice(&TERMINATOR);
        frame
    }
}

// Caller must have checked that offset + 4 <= data.len().
fn read_i32_le(data: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known_frame() -> [u8; FRAME_LEN] {
        Record {
            record_number: 5,
            wrench: Wrench {
                fx: 100,
                fy: -50,
                fz: 0,
                mx: 1,
                my: -1,
                mz: 32767,
            },
        }
        .encode()
    }

    #[test]
    fn test_decode_known_frame() {
        let record = Record::decode(&known_frame()).unwrap();

        assert_eq!(record.record_number, 5);
        assert_eq!(record.wrench.fx, 100);
        assert_eq!(record.wrench.fy, -50);
        assert_eq!(record.wrench.fz, 0);
        assert_eq!(record.wrench.mx, 1);
        assert_eq!(record.wrench.my, -1);
        assert_eq!(record.wrench.mz, 32767);
    }

    #[test]
    fn test_decode_known_byte_layout() {
        // Hand-built little-endian payload, independent of encode().
        let mut data = vec![5u8];
        for v in [100i32, -50, 0, 1, -1, 32767] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(b"\r\n");

        let record = Record::decode(&data).unwrap();
        assert_eq!(record.record_number, 5);
        assert_eq!(record.wrench.channels(), [100, -50, 0, 1, -1, 32767]);
    }

    #[test]
    fn test_roundtrip_extremes() {
        let original = Record {
            record_number: 255,
            wrench: Wrench {
                fx: i32::MAX,
                fy: i32::MIN,
                fz: -1,
                mx: 1,
                my: 0,
                mz: -123456789,
            },
        };

        let decoded = Record::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_short_buffer_rejected() {
        for len in [0, 1, 24] {
            let err = Record::decode(&vec![0u8; len]).unwrap_err();
            match err {
                ProtocolError::Truncated { len: got } => assert_eq!(got, len),
            }
        }
    }

    #[test]
    fn test_payload_without_terminator_accepted() {
        // Exactly 25 bytes decodes fine; the terminator is optional
        // as far as decoding is concerned.
        let frame = known_frame();
        let record = Record::decode(&frame[..PAYLOAD_LEN]).unwrap();
        assert_eq!(record.record_number, 5);
    }

    #[test]
    fn test_terminator_not_validated() {
        let mut frame = known_frame();
        frame[25] = 0xAA;
        frame[26] = 0xBB;

        let record = Record::decode(&frame).unwrap();
        assert_eq!(record.wrench.fx, 100);
    }

    #[test]
    fn test_wrench_serializes_as_ordered_array() {
        let wrench = Wrench {
            fx: 100,
            fy: -50,
            fz: 0,
            mx: 1,
            my: -1,
            mz: 32767,
        };

        let json = serde_json::to_string(&wrench).unwrap();
        assert_eq!(json, "[100,-50,0,1,-1,32767]");

        let back: Wrench = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wrench);
    }

    #[test]
    fn test_wrench_rejects_wrong_arity() {
        assert!(serde_json::from_str::<Wrench>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<Wrench>("[1,2,3,4,5,6,7]").is_err());
    }
}
