//! Room codes.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in a room code.
pub const ROOM_CODE_LEN: usize = 6;

const LOWEST: u32 = 100_000;
const SPAN: u32 = 900_000;

/// A short numeric code identifying a room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse user input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim();
        if code.len() != ROOM_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidRoomCode(input.to_string()));
        }
        Ok(RoomCode(code.to_string()))
    }

    /// Map random bits onto `[100000, 999999]`.
    pub fn from_entropy(entropy: u32) -> Self {
        RoomCode((LOWEST + entropy % SPAN).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        RoomCode::parse(s)
    }
}
