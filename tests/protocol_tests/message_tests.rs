//! Tests for the message envelope
//!
//! These tests verify:
//! - Header size always matches header + payload length
//! - Receivable decode attaches payloads only for payload types
//! - Header, type and payload failures each abort the decode

use lanlight::protocol::{
    DeviceLabel, Header, Label, MessageType, Payload, Power, PowerLevel, ReceivableMessage,
    SendableMessage, Wire, HEADER_SIZE,
};
use lanlight::LanError;

fn set_label(label: &str) -> Payload {
    Payload::SetLabel(DeviceLabel {
        label: Label::from(label),
    })
}

// =============================================================================
// Sendable Encoding
// =============================================================================

#[test]
fn test_bare_message_size() {
    let bytes = SendableMessage::bare(MessageType::GetService).encode().unwrap();

    assert_eq!(bytes.len(), HEADER_SIZE);
    assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]) as usize, HEADER_SIZE);
}

#[test]
fn test_payload_message_size() {
    let bytes = SendableMessage::with_payload(set_label("kitchen"))
        .encode()
        .unwrap();

    assert_eq!(bytes.len(), HEADER_SIZE + 32);
    assert_eq!(u16::from_le_bytes([bytes[0], bytes[1]]) as usize, HEADER_SIZE + 32);
}

#[test]
fn test_stale_size_field_is_overwritten() {
    let mut message = SendableMessage::with_payload(Payload::SetPower(Power {
        level: PowerLevel::ENABLED,
    }));
    message.header.frame.size = 9999;

    let bytes = message.encode().unwrap();
    let header = Header::decode(&bytes).unwrap();

    assert_eq!(header.frame.size as usize, HEADER_SIZE + 2);
    assert_eq!(header.payload_len(), Some(2));
}

#[test]
fn test_size_invariant_with_and_without_payload() {
    let messages = vec![
        SendableMessage::bare(MessageType::Acknowledgement),
        SendableMessage::bare(MessageType::LightGet),
        SendableMessage::with_payload(set_label("")),
        SendableMessage::with_payload(Payload::EchoRequest(Default::default())),
    ];

    for message in messages {
        let bytes = message.encode().unwrap();
        let header = Header::decode(&bytes).unwrap();
        assert_eq!(header.frame.size as usize, bytes.len());
    }
}

#[test]
fn test_with_payload_sets_type() {
    let bytes = SendableMessage::with_payload(set_label("x")).encode().unwrap();
    let header = Header::decode(&bytes).unwrap();

    assert_eq!(header.protocol_header.typ, MessageType::SetLabel.code());
}

#[test]
fn test_builder_fields() {
    let bytes = SendableMessage::bare(MessageType::GetPower)
        .source(77)
        .target(0x1234)
        .sequence(9)
        .ack_required(true)
        .res_required(true)
        .encode()
        .unwrap();

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert_eq!(message.source(), 77);
    assert_eq!(message.target(), 0x1234);
    assert_eq!(message.sequence(), 9);
    assert!(message.ack_required());
    assert!(message.res_required());
    assert!(!message.header().frame.tagged);
}

#[test]
fn test_zero_target_is_tagged() {
    let bytes = SendableMessage::bare(MessageType::GetService)
        .target(0)
        .encode()
        .unwrap();

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert!(message.header().frame.tagged);
    assert!(message.is_for(0xabc));
}

#[test]
fn test_is_for_specific_target() {
    let bytes = SendableMessage::bare(MessageType::GetLabel)
        .target(0xabc)
        .encode()
        .unwrap();

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert!(message.is_for(0xabc));
    assert!(!message.is_for(0xdef));
}

#[test]
fn test_encode_error_propagates() {
    let message = SendableMessage::with_payload(set_label(&"z".repeat(40)));

    assert!(matches!(message.encode(), Err(LanError::Encode(_))));
}

// =============================================================================
// Receivable Decoding
// =============================================================================

#[test]
fn test_decode_bare_has_no_payload() {
    let bytes = SendableMessage::bare(MessageType::GetLabel).encode().unwrap();

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert_eq!(message.message_type(), MessageType::GetLabel);
    assert!(message.payload().is_none());
}

#[test]
fn test_decode_with_payload() {
    let bytes = SendableMessage::with_payload(set_label("kitchen"))
        .sequence(3)
        .encode()
        .unwrap();

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert_eq!(message.message_type(), MessageType::SetLabel);
    assert_eq!(message.sequence(), 3);
    assert_eq!(message.into_payload(), Some(set_label("kitchen")));
}

#[test]
fn test_decode_bare_ignores_trailing_bytes() {
    let mut bytes = SendableMessage::bare(MessageType::GetService)
        .encode()
        .unwrap()
        .to_vec();
    bytes.extend_from_slice(&[1, 2, 3]);

    let message = ReceivableMessage::decode(&bytes).unwrap();

    assert!(message.payload().is_none());
}

#[test]
fn test_decode_truncated_header() {
    let bytes = SendableMessage::bare(MessageType::GetService).encode().unwrap();

    let err = ReceivableMessage::decode(&bytes[..20]).unwrap_err();

    assert!(matches!(err, LanError::Truncated { .. }));
}

#[test]
fn test_decode_truncated_payload() {
    let bytes = SendableMessage::with_payload(set_label("kitchen"))
        .encode()
        .unwrap();

    let err = ReceivableMessage::decode(&bytes[..HEADER_SIZE + 10]).unwrap_err();

    assert!(matches!(
        err,
        LanError::Truncated {
            expected: 32,
            actual: 10,
            ..
        }
    ));
}

#[test]
fn test_decode_unknown_type_names_code() {
    let mut header = Header::with_type(999);
    header.frame.size = HEADER_SIZE as u16;
    let bytes = header.encode().unwrap();

    let err = ReceivableMessage::decode(&bytes).unwrap_err();

    assert!(matches!(err, LanError::UnknownType(999)));
}

#[test]
fn test_decode_garbage() {
    assert!(ReceivableMessage::decode(&[]).is_err());
    assert!(ReceivableMessage::decode(&[0xff; 36]).is_err());
    assert!(ReceivableMessage::decode(b"hello world").is_err());
}

// =============================================================================
// Replies
// =============================================================================

#[test]
fn test_reply_to_copies_correlation() {
    let request = SendableMessage::bare(MessageType::GetPower)
        .source(0x5555)
        .sequence(200)
        .target(0)
        .encode()
        .unwrap();
    let trigger = ReceivableMessage::decode(&request).unwrap();

    let mut reply = SendableMessage::reply_to(&trigger, 0xd073d5);
    reply.set_reply(
        MessageType::StatePower,
        Some(Payload::StatePower(Power::default())),
    );
    let decoded = ReceivableMessage::decode(&reply.encode().unwrap()).unwrap();

    assert_eq!(decoded.source(), 0x5555);
    assert_eq!(decoded.sequence(), 200);
    assert_eq!(decoded.target(), 0xd073d5);
    assert_eq!(decoded.message_type(), MessageType::StatePower);
}
