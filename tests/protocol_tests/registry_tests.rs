//! Tests for the type registry
//!
//! These tests verify:
//! - Every known code routes to exactly one outcome
//! - Bare commands never yield a decoder
//! - Unknown codes fail and carry the code

use lanlight::protocol::{dispatch, registry, Dispatch, MessageType};
use lanlight::LanError;

const BARE: &[MessageType] = &[
    MessageType::GetService,
    MessageType::GetHostInfo,
    MessageType::GetHostFirmware,
    MessageType::GetWifiInfo,
    MessageType::GetWifiFirmware,
    MessageType::GetPower,
    MessageType::GetLabel,
    MessageType::GetVersion,
    MessageType::GetInfo,
    MessageType::Acknowledgement,
    MessageType::GetLocation,
    MessageType::GetGroup,
    MessageType::LightGet,
    MessageType::LightGetPower,
];

#[test]
fn test_dispatch_is_total_over_known_codes() {
    for &typ in MessageType::ALL {
        let outcome = dispatch(typ.code()).unwrap();
        assert_eq!(outcome.message_type(), typ);
    }
}

#[test]
fn test_bare_commands_have_no_payload() {
    for &typ in BARE {
        assert!(
            matches!(dispatch(typ.code()).unwrap(), Dispatch::Bare(t) if t == typ),
            "{} should be bare",
            typ
        );
    }
}

#[cfg(feature = "owner")]
#[test]
fn test_owner_codes() {
    assert!(matches!(dispatch(54).unwrap(), Dispatch::Bare(MessageType::GetOwner)));
    assert!(dispatch(55).unwrap().has_payload());
    assert!(dispatch(56).unwrap().has_payload());
}

#[cfg(not(feature = "owner"))]
#[test]
fn test_owner_codes_unknown_without_feature() {
    for code in 54..=56 {
        assert!(matches!(dispatch(code), Err(LanError::UnknownType(c)) if c == code));
    }
}

#[test]
fn test_payload_codes_have_decoder() {
    for &typ in MessageType::ALL {
        if BARE.contains(&typ) {
            continue;
        }
        #[cfg(feature = "owner")]
        if typ == MessageType::GetOwner {
            continue;
        }
        assert!(dispatch(typ.code()).unwrap().has_payload(), "{}", typ);
    }
}

#[test]
fn test_unknown_codes_fail_with_code() {
    let known: Vec<u16> = MessageType::ALL.iter().map(|t| t.code()).collect();

    for code in 0..=u16::MAX {
        if known.contains(&code) {
            continue;
        }
        match dispatch(code) {
            Err(LanError::UnknownType(c)) => assert_eq!(c, code),
            other => panic!("code {} should be unknown, got {:?}", code, other),
        }
    }
}

#[test]
fn test_unknown_type_error_message_names_code() {
    let err = dispatch(103).unwrap_err();

    assert!(err.to_string().contains("103"));
    assert!(err.is_decode());
}

#[test]
fn test_type_codes_match_protocol() {
    assert_eq!(MessageType::GetService.code(), 2);
    assert_eq!(MessageType::StateService.code(), 3);
    assert_eq!(MessageType::SetPower.code(), 21);
    assert_eq!(MessageType::SetLabel.code(), 24);
    assert_eq!(MessageType::Acknowledgement.code(), 45);
    assert_eq!(MessageType::EchoRequest.code(), 58);
    assert_eq!(MessageType::LightSetColor.code(), 102);
    assert_eq!(MessageType::LightState.code(), 107);
    assert_eq!(MessageType::LightStatePower.code(), 118);
}

#[test]
fn test_try_from_round_trip() {
    for &typ in MessageType::ALL {
        assert_eq!(MessageType::try_from(typ.code()).unwrap(), typ);
    }
}

#[test]
fn test_route_agrees_with_dispatch() {
    for &typ in MessageType::ALL {
        assert_eq!(
            registry::route(typ).has_payload(),
            dispatch(typ.code()).unwrap().has_payload()
        );
    }
}
