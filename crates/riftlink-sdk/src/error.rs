//! Error types for the Riftlink SDK.

use crate::lifecycle::{LifecycleTrigger, SessionState};
use crate::network::NetworkError;
use riftlink_core::CoreError;
use riftlink_protocol::CodecError;
use thiserror::Error;

/// Error type for SDK operations.
#[derive(Error, Debug)]
pub enum SdkError {
    /// A mutation broke an ownership or validation rule. State is unchanged.
    #[error("Rejected: {0}")]
    Rejected(#[from] CoreError),

    /// Session creation, join or send failed.
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// An inbound frame could not be decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Invalid session transition from {from:?} on {trigger:?}")]
    InvalidTransition {
        from: SessionState,
        trigger: LifecycleTrigger,
    },
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;
