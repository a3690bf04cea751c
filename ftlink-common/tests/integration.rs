//! Integration tests for the ftlink-common library.

use ftlink_common::{Format, LogFormat, decode, encode, parse_config};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct FakeBridgeConfig {
    zenoh: ftlink_common::ZenohConfig,
    #[serde(default)]
    logging: ftlink_common::LoggingConfig,
    #[serde(default)]
    serialization: Format,
}

#[test]
fn test_full_config_parse() {
    let json5 = r#"
    {
        zenoh: {
            mode: "client",
            connect: ["tcp/192.168.1.5:7447"],
        },
        logging: {
            level: "debug",
            format: "json",
        },
        serialization: "cbor",
    }
    "#;

    let config: FakeBridgeConfig = parse_config(json5).expect("parse failed");

    assert_eq!(config.zenoh.mode, "client");
    assert_eq!(config.zenoh.connect, vec!["tcp/192.168.1.5:7447"]);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.serialization, Format::Cbor);
}

#[test]
fn test_minimal_config_defaults() {
    let config: FakeBridgeConfig = parse_config("{ zenoh: {} }").expect("parse failed");

    assert_eq!(config.zenoh.mode, "peer");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.serialization, Format::Json);
}

#[test]
fn test_payload_encoding_workflow() {
    // A wrench payload as published by the sensor bridge: six ordered
    // signed channels.
    let channels: [i32; 6] = [12, -7, 1024, 0, -1, 500];

    let json = encode(&channels, Format::Json).expect("JSON encode failed");
    let from_json: [i32; 6] = decode(&json, Format::Json).expect("JSON decode failed");
    assert_eq!(from_json, channels);

    let cbor = encode(&channels, Format::Cbor).expect("CBOR encode failed");
    let from_cbor: [i32; 6] = decode(&cbor, Format::Cbor).expect("CBOR decode failed");
    assert_eq!(from_cbor, channels);

    assert!(
        cbor.len() < json.len(),
        "CBOR should be smaller than JSON for the same payload"
    );
}
