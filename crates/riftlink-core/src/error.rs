//! Error types for local state transitions.

use thiserror::Error;

/// Reasons a mutation is rejected by the store.
///
/// None of these are fatal: the store is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} is driven by the opponent and cannot be changed locally")]
    NotOwned(String),

    #[error("Battlefield already chosen for this game; reset to choose again")]
    BattlefieldAlreadySet,

    #[error("Invalid image reference: {0}")]
    InvalidImageRef(String),

    #[error("Invalid room code: {0:?} (expected 6 digits)")]
    InvalidRoomCode(String),

    #[error("Display slot already bound: {0}")]
    AlreadyBound(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
