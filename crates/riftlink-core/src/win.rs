//! Win-condition evaluation.

use crate::role::Side;
use serde::{Deserialize, Serialize};

/// The score a player must reach to win.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinThreshold {
    /// First to 8.
    #[default]
    Standard,
    /// First to 9 ("Aspirant's Climb").
    Extended,
}

impl WinThreshold {
    pub fn from_extended(extended: bool) -> Self {
        if extended {
            WinThreshold::Extended
        } else {
            WinThreshold::Standard
        }
    }

    pub fn is_extended(self) -> bool {
        matches!(self, WinThreshold::Extended)
    }

    pub fn points(self) -> u16 {
        match self {
            WinThreshold::Standard => 8,
            WinThreshold::Extended => 9,
        }
    }
}

/// Result of evaluating the win condition.
///
/// Player 1 is always the local player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinOutcome {
    #[default]
    NoWinner,
    Player1Wins,
    Player2Wins,
}

impl WinOutcome {
    pub fn winner_side(self) -> Option<Side> {
        match self {
            WinOutcome::NoWinner => None,
            WinOutcome::Player1Wins => Some(Side::Mine),
            WinOutcome::Player2Wins => Some(Side::Theirs),
        }
    }
}

/// Evaluate the win condition. The local player is checked first.
pub fn evaluate(mine: u16, theirs: u16, threshold: WinThreshold) -> WinOutcome {
    let target = threshold.points();
    if mine >= target {
        WinOutcome::Player1Wins
    } else if theirs >= target {
        WinOutcome::Player2Wins
    } else {
        WinOutcome::NoWinner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_threshold() {
        assert_eq!(evaluate(7, 7, WinThreshold::Standard), WinOutcome::NoWinner);
        assert_eq!(evaluate(8, 3, WinThreshold::Standard), WinOutcome::Player1Wins);
        assert_eq!(evaluate(2, 8, WinThreshold::Standard), WinOutcome::Player2Wins);
    }

    #[test]
    fn test_extended_threshold() {
        assert_eq!(evaluate(8, 0, WinThreshold::Extended), WinOutcome::NoWinner);
        assert_eq!(evaluate(0, 9, WinThreshold::Extended), WinOutcome::Player2Wins);
    }

    #[test]
    fn test_local_player_checked_first() {
        assert_eq!(evaluate(9, 9, WinThreshold::Standard), WinOutcome::Player1Wins);
    }

    #[test]
    fn test_winner_side() {
        assert_eq!(WinOutcome::Player1Wins.winner_side(), Some(Side::Mine));
        assert_eq!(WinOutcome::NoWinner.winner_side(), None);
    }
}
