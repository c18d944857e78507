//! Decoding frames from an untrusted peer.
//!
//! Whatever arrives on the data channel, a decoded message must never carry
//! a value outside the store's clamp bounds.

use proptest::prelude::*;
use riftlink_core::{MightSlot, Mutation, MIGHT_MAX, SCORE_MAX};
use riftlink_protocol::{decode, decode_mutation, encode_mutation, CodecError, WireMessage};

#[test]
fn test_legacy_two_field_score_shape_is_rejected() {
    // An early revision sent both players' scores; only `score` is accepted now.
    let result = decode(r#"{"type":"score","player1":3,"player2":5}"#);
    assert_eq!(result, Err(CodecError::MissingField("score")));
}

#[test]
fn test_string_score_from_scenario_is_dropped() {
    let result = decode(r#"{"type":"score","score":"abc"}"#);
    assert!(result.is_err());
    assert!(!result.unwrap_err().is_unknown_kind());
}

#[test]
fn test_missing_type_is_malformed_not_unknown() {
    let err = decode(r#"{"score":3}"#).unwrap_err();
    assert_eq!(err, CodecError::MissingField("type"));
    assert!(!err.is_unknown_kind());
}

#[test]
fn test_outbound_frames_decode_to_the_same_mutation() {
    let mutations = [
        Mutation::Score(8),
        Mutation::WinCondition { extended: true },
        Mutation::Reset,
        Mutation::Might {
            slot: MightSlot::RemoteFieldOwnCounter,
            value: 999,
        },
        Mutation::Battlefield("https://cards.example/base/ogn-275.png".to_string()),
    ];

    for mutation in mutations {
        let frame = encode_mutation(&mutation).unwrap();
        assert_eq!(decode_mutation(&frame).unwrap(), mutation, "frame: {}", frame);
    }
}

#[test]
fn test_extra_fields_are_ignored() {
    assert_eq!(
        decode(r#"{"type":"reset","by":"host","at":12}"#),
        Ok(WireMessage::Reset)
    );
}

proptest! {
    #[test]
    fn decoded_scores_stay_in_bounds(raw in any::<i64>()) {
        let frame = format!(r#"{{"type":"score","score":{}}}"#, raw);
        match decode(&frame) {
            Ok(WireMessage::Score { score }) => prop_assert!(score <= SCORE_MAX),
            Ok(other) => prop_assert!(false, "unexpected message {:?}", other),
            Err(err) => {
                let is_range_error = matches!(err, CodecError::OutOfRange { .. });
                prop_assert!(is_range_error);
            }
        }
    }

    #[test]
    fn decoded_might_stays_in_bounds(raw in any::<i64>()) {
        let frame = format!(r#"{{"type":"might","key":"ownFieldOwnCounter","value":{}}}"#, raw);
        if let Ok(WireMessage::Might { value, .. }) = decode(&frame) {
            prop_assert!(value <= MIGHT_MAX);
        }
    }

    #[test]
    fn arbitrary_text_never_panics(text in ".{0,64}") {
        let _ = decode(&text);
    }
}
