use callscreen::telephony::{TelephonyEvent, TelephonyOutbound};

#[test]
fn test_start_event_parsing() {
    let event =
        TelephonyEvent::parse(r#"{"event":"start","start":{"streamSid":"MZ123"}}"#).unwrap();

    match event {
        TelephonyEvent::Start { start } => {
            assert_eq!(start.stream_sid, "MZ123");
            assert!(start.call_sid.is_none());
        }
        other => panic!("Expected start, got {:?}", other),
    }
}

#[test]
fn test_media_event_parsing_and_decode() {
    let event =
        TelephonyEvent::parse(r#"{"event":"media","media":{"payload":"QUJD","timestamp":"160"}}"#)
            .unwrap();

    match event {
        TelephonyEvent::Media { media } => {
            assert_eq!(media.decode_audio().unwrap(), b"ABC");
            assert_eq!(media.timestamp_ms(), Some(160));
        }
        other => panic!("Expected media, got {:?}", other),
    }
}

#[test]
fn test_stop_event_parsing() {
    let event = TelephonyEvent::parse(r#"{"event":"stop"}"#).unwrap();
    assert!(matches!(event, TelephonyEvent::Stop));
}

#[test]
fn test_unrecognized_event_tag_rejected() {
    assert!(TelephonyEvent::parse(r#"{"event":"mark","mark":{"name":"x"}}"#).is_err());
}

#[test]
fn test_missing_fields_rejected() {
    // A start event with no start block is malformed, not a default.
    assert!(TelephonyEvent::parse(r#"{"event":"start"}"#).is_err());
    assert!(TelephonyEvent::parse(r#"{"event":"media"}"#).is_err());
    assert!(TelephonyEvent::parse("not json at all").is_err());
}

#[test]
fn test_undecodable_payload_is_an_error() {
    let event =
        TelephonyEvent::parse(r#"{"event":"media","media":{"payload":"!!not-base64!!"}}"#).unwrap();

    match event {
        TelephonyEvent::Media { media } => assert!(media.decode_audio().is_err()),
        other => panic!("Expected media, got {:?}", other),
    }
}

#[test]
fn test_malformed_timestamp_ignored() {
    let event =
        TelephonyEvent::parse(r#"{"event":"media","media":{"payload":"QUJD","timestamp":"soon"}}"#)
            .unwrap();

    match event {
        TelephonyEvent::Media { media } => assert_eq!(media.timestamp_ms(), None),
        other => panic!("Expected media, got {:?}", other),
    }
}

#[test]
fn test_outbound_media_envelope_shape() {
    let outbound = TelephonyOutbound::media_from_text("MZ123", "hello caller");
    let json = outbound.to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["event"], "media");
    assert_eq!(value["streamSid"], "MZ123");

    // Payload is base64 of the agent text.
    assert_eq!(value["media"]["payload"], "aGVsbG8gY2FsbGVy");
}
