use serde::{Serialize, de::DeserializeOwned};

use crate::error::{Error, Result};

/// Serialization format for published payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// JSON format (human-readable, good for debugging).
    #[default]
    Json,

    /// CBOR format (compact binary, better for high-rate telemetry).
    Cbor,
}

impl Format {
    /// Get the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Cbor => "application/cbor",
        }
    }
}

/// Encode a value to bytes using the specified format.
pub fn encode<T: Serialize>(value: &T, format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => serde_json::to_vec(value).map_err(Error::from),
        Format::Cbor => {
            let mut buf = Vec::new();
            ciborium::into_writer(value, &mut buf)?;
            Ok(buf)
        }
    }
}

/// Decode bytes to a value using the specified format.
pub fn decode<T: DeserializeOwned>(data: &[u8], format: Format) -> Result<T> {
    match format {
        Format::Json => serde_json::from_slice(data).map_err(Error::from),
        Format::Cbor => ciborium::from_reader(data).map_err(|e| Error::Cbor(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let channels: [i32; 6] = [100, -50, 0, 1, -1, 32767];

        let encoded = encode(&channels, Format::Json).unwrap();
        let decoded: [i32; 6] = decode(&encoded, Format::Json).unwrap();

        assert_eq!(channels, decoded);
    }

    #[test]
    fn test_cbor_roundtrip() {
        let channels: [i32; 6] = [i32::MIN, i32::MAX, 0, -1, 1, 42];

        let encoded = encode(&channels, Format::Cbor).unwrap();
        let decoded: [i32; 6] = decode(&encoded, Format::Cbor).unwrap();

        assert_eq!(channels, decoded);
    }

    #[test]
    fn test_json_is_plain_array() {
        let channels: [i32; 6] = [100, -50, 0, 1, -1, 32767];
        let encoded = encode(&channels, Format::Json).unwrap();
        assert_eq!(encoded, b"[100,-50,0,1,-1,32767]");
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(Format::Json.mime_type(), "application/json");
        assert_eq!(Format::Cbor.mime_type(), "application/cbor");
    }
}
