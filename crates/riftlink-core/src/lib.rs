//! Core game-state model for Riftlink.
//!
//! Everything two players must agree on lives in a single [`SyncStore`]:
//! both scores, the shared win threshold, the four "might" counters and the
//! two battlefield images. Each field is owned by exactly one side, so the
//! two stores never race on a write. A locally originated mutation is
//! queued in the store's outbox for transmission; a remotely originated one
//! is applied and never queued again.
//!
//! The store performs no I/O. Transports, codecs and session lifecycles
//! live in `riftlink-protocol` and `riftlink-sdk`.

pub mod battlefield;
pub mod bounded;
pub mod display;
pub mod error;
pub mod might;
pub mod mirror;
pub mod role;
pub mod room;
pub mod store;
pub mod win;

pub use battlefield::Battlefield;
pub use bounded::{Bounded, MightCounter, ScoreCounter, MIGHT_MAX, SCORE_MAX};
pub use display::{DisplayBindings, DisplayCallback, DisplaySlot, DisplayValue};
pub use error::{CoreError, Result};
pub use might::{MightBoard, MightChange, MightSlot};
pub use mirror::{MirrorAxis, MirrorFlags, VideoFeed, VideoMirrors};
pub use role::{Origin, Role, Side};
pub use room::{RoomCode, ROOM_CODE_LEN};
pub use store::{GameSnapshot, Mutation, Notice, SyncStore};
pub use win::{evaluate, WinOutcome, WinThreshold};
