//! Clamped integer counters.
//!
//! Every counter in the game is clamped at the point of mutation, so a
//! value outside its bounds can never be displayed or transmitted.

/// Highest value a score can reach.
pub const SCORE_MAX: u16 = 99;
/// Highest value a might counter can reach.
pub const MIGHT_MAX: u16 = 999;

/// A non-negative counter clamped to `[0, MAX]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bounded<const MAX: u16>(u16);

pub type ScoreCounter = Bounded<SCORE_MAX>;
pub type MightCounter = Bounded<MIGHT_MAX>;

impl<const MAX: u16> Bounded<MAX> {
    pub const CEILING: u16 = MAX;
    pub const ZERO: Self = Bounded(0);

    /// Create a counter, clamping `value` into range.
    pub fn new(value: i64) -> Self {
        Bounded(clamp(value, MAX))
    }

    /// Create a counter only if `value` is already in range.
    pub fn exact(value: i64) -> Option<Self> {
        if (0..=MAX as i64).contains(&value) {
            Some(Bounded(value as u16))
        } else {
            None
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Add `delta` and clamp. Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> u16 {
        self.0 = clamp(self.0 as i64 + delta as i64, MAX);
        self.0
    }

    /// Overwrite with `value`, clamped. Returns the new value.
    pub fn set(&mut self, value: i64) -> u16 {
        self.0 = clamp(value, MAX);
        self.0
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

fn clamp(value: i64, max: u16) -> u16 {
    value.clamp(0, max as i64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_clamps_both_ends() {
        let mut score = ScoreCounter::ZERO;
        assert_eq!(score.adjust(-1000), 0);
        assert_eq!(score.adjust(1000), 99);
        assert_eq!(score.adjust(-1), 98);
    }

    #[test]
    fn test_extreme_deltas_do_not_overflow() {
        let mut might = MightCounter::new(500);
        assert_eq!(might.adjust(i32::MAX), 999);
        assert_eq!(might.adjust(i32::MIN), 0);
    }

    #[test]
    fn test_exact_rejects_out_of_range() {
        assert_eq!(ScoreCounter::exact(99).map(Bounded::get), Some(99));
        assert!(ScoreCounter::exact(100).is_none());
        assert!(ScoreCounter::exact(-1).is_none());
        assert!(MightCounter::exact(999).is_some());
    }
}
