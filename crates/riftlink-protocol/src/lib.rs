//! Message codec for Riftlink.
//!
//! Translates store [`Mutation`](riftlink_core::Mutation)s into JSON frames
//! and back. Outbound encoding is a plain serde derive. Inbound decoding
//! never trusts the peer: every field is type-checked and range-checked,
//! and a frame that fails any check is rejected whole.
//!
//! | kind           | fields                                  |
//! |----------------|-----------------------------------------|
//! | `score`        | `score: 0..=99`                         |
//! | `winCondition` | `value: bool`                           |
//! | `reset`        |                                         |
//! | `might`        | `key: owned slot name`, `value: 0..=999`|
//! | `battlefield`  | `url: string`                           |

pub mod codec;
pub mod error;
pub mod message;

pub use codec::{decode, decode_mutation, decode_value, encode, encode_mutation};
pub use error::{CodecError, Result};
pub use message::WireMessage;
