//! Codec errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed frame: {0}")]
    Malformed(String),

    #[error("Frame is not an object")]
    NotAnObject,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Field {field} is not {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field {field} out of range: {value} (allowed 0..={max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        max: u16,
    },

    #[error("Unknown message kind: {0}")]
    UnknownKind(String),

    #[error("Invalid image reference: {0}")]
    InvalidReference(String),

    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl CodecError {
    /// Unknown kinds are ignored quietly; everything else is worth a warning.
    pub fn is_unknown_kind(&self) -> bool {
        matches!(self, CodecError::UnknownKind(_))
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
