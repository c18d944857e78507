//! Participant roles, sides and mutation origins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed role of a participant for the lifetime of a session.
///
/// The host generates the room code; the guest joins with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Host,
    Guest,
}

impl Role {
    pub fn opposite(self) -> Self {
        match self {
            Role::Host => Role::Guest,
            Role::Guest => Role::Host,
        }
    }

    /// The role sitting on `side` as seen from this role.
    pub fn resolve(self, side: Side) -> Role {
        match side {
            Side::Mine => self,
            Side::Theirs => self.opposite(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Host => write!(f, "host"),
            Role::Guest => write!(f, "guest"),
        }
    }
}

/// A side of the table relative to the local participant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Mine,
    Theirs,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Mine, Side::Theirs];

    pub fn opposite(self) -> Self {
        match self {
            Side::Mine => Side::Theirs,
            Side::Theirs => Side::Mine,
        }
    }

    /// Name shown to the local player.
    pub fn display_name(self) -> &'static str {
        match self {
            Side::Mine => "You",
            Side::Theirs => "Opponent",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Mine => 0,
            Side::Theirs => 1,
        }
    }
}

/// Where a mutation came from.
///
/// Local mutations are transmitted to the peer; remote ones never are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Local,
    Remote,
}

impl Origin {
    pub fn is_local(self) -> bool {
        matches!(self, Origin::Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_resolution() {
        assert_eq!(Role::Host.resolve(Side::Mine), Role::Host);
        assert_eq!(Role::Host.resolve(Side::Theirs), Role::Guest);
        assert_eq!(Role::Guest.resolve(Side::Theirs), Role::Host);
    }

    #[test]
    fn test_side_names() {
        assert_eq!(Side::Mine.display_name(), "You");
        assert_eq!(Side::Theirs.display_name(), "Opponent");
        assert_eq!(Side::Mine.opposite(), Side::Theirs);
    }
}
