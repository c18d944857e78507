//! The four "might" counters and their cross-mapping.
//!
//! The counters form a 2×2 relation over whose units are placed (own or
//! remote) on whose field (own or remote). A player may only change the
//! two counters describing their own placements. The slots are not
//! symmetric labels: what the sender calls "own field, own counter" is what
//! the receiver calls "remote field, remote counter".
//!
//! ```text
//! sender slot              receiver slot
//! ownFieldOwnCounter    -> remoteFieldRemoteCounter
//! remoteFieldOwnCounter -> ownFieldRemoteCounter
//! ```
//!
//! Senders always transmit their own slot name; the receiver translates
//! with [`MightSlot::counterpart`].

use crate::bounded::MightCounter;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MightSlot {
    /// My units on my field.
    OwnFieldOwnCounter,
    /// My units on the opponent's field.
    RemoteFieldOwnCounter,
    /// The opponent's units on my field.
    OwnFieldRemoteCounter,
    /// The opponent's units on their field.
    RemoteFieldRemoteCounter,
}

impl MightSlot {
    pub const ALL: [MightSlot; 4] = [
        MightSlot::OwnFieldOwnCounter,
        MightSlot::RemoteFieldOwnCounter,
        MightSlot::OwnFieldRemoteCounter,
        MightSlot::RemoteFieldRemoteCounter,
    ];

    /// Slots the local player may change.
    pub const OWNED: [MightSlot; 2] = [
        MightSlot::OwnFieldOwnCounter,
        MightSlot::RemoteFieldOwnCounter,
    ];

    pub fn is_owned(self) -> bool {
        matches!(
            self,
            MightSlot::OwnFieldOwnCounter | MightSlot::RemoteFieldOwnCounter
        )
    }

    /// The slot the peer uses for the same counter.
    pub fn counterpart(self) -> Self {
        match self {
            MightSlot::OwnFieldOwnCounter => MightSlot::RemoteFieldRemoteCounter,
            MightSlot::RemoteFieldRemoteCounter => MightSlot::OwnFieldOwnCounter,
            MightSlot::RemoteFieldOwnCounter => MightSlot::OwnFieldRemoteCounter,
            MightSlot::OwnFieldRemoteCounter => MightSlot::RemoteFieldOwnCounter,
        }
    }

    pub fn wire_key(self) -> &'static str {
        match self {
            MightSlot::OwnFieldOwnCounter => "ownFieldOwnCounter",
            MightSlot::RemoteFieldOwnCounter => "remoteFieldOwnCounter",
            MightSlot::OwnFieldRemoteCounter => "ownFieldRemoteCounter",
            MightSlot::RemoteFieldRemoteCounter => "remoteFieldRemoteCounter",
        }
    }

    pub fn from_wire_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.wire_key() == key)
    }

    fn index(self) -> usize {
        match self {
            MightSlot::OwnFieldOwnCounter => 0,
            MightSlot::RemoteFieldOwnCounter => 1,
            MightSlot::OwnFieldRemoteCounter => 2,
            MightSlot::RemoteFieldRemoteCounter => 3,
        }
    }
}

impl fmt::Display for MightSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_key())
    }
}

/// How a might counter changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MightChange {
    Delta(i32),
    Absolute(i32),
}

/// All four might counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MightBoard {
    counters: [MightCounter; 4],
}

impl MightBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: MightSlot) -> u16 {
        self.counters[slot.index()].get()
    }

    /// Apply `change` to `slot`, clamped. Returns the new value.
    pub fn apply(&mut self, slot: MightSlot, change: MightChange) -> u16 {
        let counter = &mut self.counters[slot.index()];
        match change {
            MightChange::Delta(delta) => counter.adjust(delta),
            MightChange::Absolute(value) => counter.set(value as i64),
        }
    }

    pub fn reset(&mut self) {
        self.counters.iter_mut().for_each(MightCounter::reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counterpart_table() {
        assert_eq!(
            MightSlot::OwnFieldOwnCounter.counterpart(),
            MightSlot::RemoteFieldRemoteCounter
        );
        assert_eq!(
            MightSlot::RemoteFieldOwnCounter.counterpart(),
            MightSlot::OwnFieldRemoteCounter
        );
    }

    #[test]
    fn test_counterpart_of_owned_is_never_owned() {
        for slot in MightSlot::OWNED {
            assert!(!slot.counterpart().is_owned());
        }
    }

    #[test]
    fn test_wire_keys_round_trip() {
        for slot in MightSlot::ALL {
            assert_eq!(MightSlot::from_wire_key(slot.wire_key()), Some(slot));
        }
        assert_eq!(MightSlot::from_wire_key("player1"), None);
    }

    #[test]
    fn test_board_apply_and_reset() {
        let mut board = MightBoard::new();
        assert_eq!(board.apply(MightSlot::OwnFieldOwnCounter, MightChange::Delta(4)), 4);
        assert_eq!(
            board.apply(MightSlot::OwnFieldOwnCounter, MightChange::Absolute(5000)),
            999
        );
        assert_eq!(board.get(MightSlot::RemoteFieldOwnCounter), 0);

        board.reset();
        assert_eq!(board.get(MightSlot::OwnFieldOwnCounter), 0);
    }
}
