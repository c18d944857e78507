//! Encoding and defensive decoding.

use crate::error::{CodecError, Result};
use crate::message::WireMessage;
use riftlink_core::battlefield::validate_image_ref;
use riftlink_core::{MightSlot, Mutation, MIGHT_MAX, SCORE_MAX};
use serde_json::{Map, Value};

/// Encode a message as a JSON frame.
pub fn encode(message: &WireMessage) -> Result<String> {
    serde_json::to_string(message).map_err(|e| CodecError::Encode(e.to_string()))
}

pub fn encode_mutation(mutation: &Mutation) -> Result<String> {
    encode(&WireMessage::from(mutation.clone()))
}

/// Decode a JSON frame received from the peer.
pub fn decode(frame: &str) -> Result<WireMessage> {
    let value: Value = serde_json::from_str(frame)?;
    decode_value(&value)
}

/// Decode a frame straight into a store mutation.
pub fn decode_mutation(frame: &str) -> Result<Mutation> {
    decode(frame).map(WireMessage::into_mutation)
}

/// Decode an already-parsed frame.
///
/// Numbers may arrive as JSON numbers or as decimal strings; either way
/// they must be whole and inside the field's clamp bounds.
pub fn decode_value(value: &Value) -> Result<WireMessage> {
    let object = value.as_object().ok_or(CodecError::NotAnObject)?;
    let kind = object
        .get("type")
        .ok_or(CodecError::MissingField("type"))?
        .as_str()
        .ok_or(CodecError::InvalidField {
            field: "type",
            expected: "a string",
        })?;

    match kind {
        "score" => Ok(WireMessage::Score {
            score: bounded_int(object, "score", SCORE_MAX)?,
        }),
        "winCondition" => {
            let value = field(object, "value")?
                .as_bool()
                .ok_or(CodecError::InvalidField {
                    field: "value",
                    expected: "a boolean",
                })?;
            Ok(WireMessage::WinCondition { value })
        }
        "reset" => Ok(WireMessage::Reset),
        "might" => {
            let key = field(object, "key")?
                .as_str()
                .and_then(MightSlot::from_wire_key)
                .filter(|slot| slot.is_owned())
                .ok_or(CodecError::InvalidField {
                    field: "key",
                    expected: "ownFieldOwnCounter or remoteFieldOwnCounter",
                })?;
            let value = bounded_int(object, "value", MIGHT_MAX)?;
            Ok(WireMessage::Might { key, value })
        }
        "battlefield" => {
            let url = field(object, "url")?
                .as_str()
                .ok_or(CodecError::InvalidField {
                    field: "url",
                    expected: "a string",
                })?;
            let url = validate_image_ref(url)
                .map_err(|e| CodecError::InvalidReference(e.to_string()))?;
            Ok(WireMessage::Battlefield {
                url: url.to_string(),
            })
        }
        other => Err(CodecError::UnknownKind(other.to_string())),
    }
}

fn field<'a>(object: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value> {
    object.get(name).ok_or(CodecError::MissingField(name))
}

fn bounded_int(object: &Map<String, Value>, name: &'static str, max: u16) -> Result<u16> {
    let not_integer = CodecError::InvalidField {
        field: name,
        expected: "an integer",
    };
    let value = match field(object, name)? {
        Value::Number(number) => match number.as_i64() {
            Some(n) => n,
            None => {
                let f = number.as_f64().ok_or_else(|| not_integer.clone())?;
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(not_integer);
                }
                if f.abs() > i64::MAX as f64 {
                    return Err(CodecError::OutOfRange {
                        field: name,
                        value: if f > 0.0 { i64::MAX } else { i64::MIN },
                        max,
                    });
                }
                f as i64
            }
        },
        Value::String(text) => text.trim().parse::<i64>().map_err(|_| not_integer)?,
        _ => return Err(not_integer),
    };

    if !(0..=max as i64).contains(&value) {
        return Err(CodecError::OutOfRange {
            field: name,
            value,
            max,
        });
    }
    Ok(value as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_shapes() {
        assert_eq!(
            encode(&WireMessage::Score { score: 3 }).unwrap(),
            r#"{"type":"score","score":3}"#
        );
        assert_eq!(encode(&WireMessage::Reset).unwrap(), r#"{"type":"reset"}"#);
        assert_eq!(
            encode(&WireMessage::WinCondition { value: true }).unwrap(),
            r#"{"type":"winCondition","value":true}"#
        );
        assert_eq!(
            encode(&WireMessage::Might {
                key: MightSlot::RemoteFieldOwnCounter,
                value: 12
            })
            .unwrap(),
            r#"{"type":"might","key":"remoteFieldOwnCounter","value":12}"#
        );
    }

    #[test]
    fn test_decode_score() {
        assert_eq!(
            decode(r#"{"type":"score","score":7}"#),
            Ok(WireMessage::Score { score: 7 })
        );
        assert_eq!(
            decode(r#"{"type":"score","score":"42"}"#),
            Ok(WireMessage::Score { score: 42 })
        );
        assert_eq!(
            decode(r#"{"type":"score","score":5.0}"#),
            Ok(WireMessage::Score { score: 5 })
        );
    }

    #[test]
    fn test_decode_rejects_non_numeric_score() {
        let result = decode(r#"{"type":"score","score":"abc"}"#);
        assert!(matches!(
            result,
            Err(CodecError::InvalidField { field: "score", .. })
        ));
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert!(matches!(
            decode(r#"{"type":"score","score":100}"#),
            Err(CodecError::OutOfRange { value: 100, .. })
        ));
        assert!(matches!(
            decode(r#"{"type":"score","score":-1}"#),
            Err(CodecError::OutOfRange { .. })
        ));
        assert!(matches!(
            decode(r#"{"type":"might","key":"ownFieldOwnCounter","value":1000}"#),
            Err(CodecError::OutOfRange { max: 999, .. })
        ));
        assert!(matches!(
            decode(r#"{"type":"score","score":2.5}"#),
            Err(CodecError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_decode_might_requires_owned_key() {
        assert!(decode(r#"{"type":"might","key":"ownFieldRemoteCounter","value":1}"#).is_err());
        assert!(decode(r#"{"type":"might","key":"nonsense","value":1}"#).is_err());
        assert_eq!(
            decode(r#"{"type":"might","key":"ownFieldOwnCounter","value":9}"#),
            Ok(WireMessage::Might {
                key: MightSlot::OwnFieldOwnCounter,
                value: 9
            })
        );
    }

    #[test]
    fn test_decode_win_condition_requires_bool() {
        assert!(decode(r#"{"type":"winCondition","value":"true"}"#).is_err());
        assert_eq!(
            decode(r#"{"type":"winCondition","value":false}"#),
            Ok(WireMessage::WinCondition { value: false })
        );
    }

    #[test]
    fn test_decode_unknown_kind() {
        let err = decode(r#"{"type":"chat","text":"gg"}"#).unwrap_err();
        assert!(err.is_unknown_kind());
    }

    #[test]
    fn test_decode_not_json() {
        assert!(matches!(decode("score=3"), Err(CodecError::Malformed(_))));
        assert_eq!(decode_value(&json!([1, 2])), Err(CodecError::NotAnObject));
    }

    #[test]
    fn test_decode_battlefield_validates_url() {
        assert!(matches!(
            decode(r#"{"type":"battlefield","url":"  "}"#),
            Err(CodecError::InvalidReference(_))
        ));
        assert!(decode(r#"{"type":"battlefield","url":7}"#).is_err());
    }
}
