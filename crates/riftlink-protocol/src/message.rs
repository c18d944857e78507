//! Wire message shapes.

use riftlink_core::{MightSlot, Mutation};
use serde::{Deserialize, Serialize};

/// One frame on the data channel. Every field describes the sender's own
/// state, in the sender's naming.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WireMessage {
    Score { score: u16 },
    WinCondition { value: bool },
    Reset,
    Might { key: MightSlot, value: u16 },
    Battlefield { url: String },
}

impl WireMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            WireMessage::Score { .. } => "score",
            WireMessage::WinCondition { .. } => "winCondition",
            WireMessage::Reset => "reset",
            WireMessage::Might { .. } => "might",
            WireMessage::Battlefield { .. } => "battlefield",
        }
    }

    pub fn into_mutation(self) -> Mutation {
        match self {
            WireMessage::Score { score } => Mutation::Score(score),
            WireMessage::WinCondition { value } => Mutation::WinCondition { extended: value },
            WireMessage::Reset => Mutation::Reset,
            WireMessage::Might { key, value } => Mutation::Might { slot: key, value },
            WireMessage::Battlefield { url } => Mutation::Battlefield(url),
        }
    }
}

impl From<Mutation> for WireMessage {
    fn from(mutation: Mutation) -> Self {
        match mutation {
            Mutation::Score(score) => WireMessage::Score { score },
            Mutation::WinCondition { extended } => WireMessage::WinCondition { value: extended },
            Mutation::Reset => WireMessage::Reset,
            Mutation::Might { slot, value } => WireMessage::Might { key: slot, value },
            Mutation::Battlefield(url) => WireMessage::Battlefield { url },
        }
    }
}
