//! Dice, keep flags, and the per-turn roll budget.
//!
//! ## DiceSet
//!
//! Five faces plus a keep flag per die. Reset at the start of every turn.
//!
//! ## RollBudget
//!
//! Rolls remaining this turn: 3 at turn start, never negative.
//!
//! ## DiceRoller
//!
//! Redraws every unkept die and consumes one unit of budget. Kept faces are
//! never touched.

pub mod roller;

use serde::{Deserialize, Serialize};

use crate::core::Rejection;

pub use roller::DiceRoller;

/// Number of dice in play.
pub const DICE_COUNT: usize = 5;
/// Rolls available at the start of a turn.
pub const MAX_ROLLS: u8 = 3;

/// Five die faces.
pub type Faces = [u8; DICE_COUNT];

/// Per-die keep flags. A kept die keeps its face across the next roll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeepMask(pub [bool; DICE_COUNT]);

impl KeepMask {
    /// Keep nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self([false; DICE_COUNT])
    }

    /// Build a mask from a per-die predicate.
    pub fn from_fn(f: impl FnMut(usize) -> bool) -> Self {
        Self(std::array::from_fn(f))
    }

    #[must_use]
    pub fn is_kept(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&k| k).count()
    }
}

/// The dice on the table and their keep flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceSet {
    faces: Faces,
    keep: KeepMask,
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::fresh()
    }
}

impl DiceSet {
    /// Dice at turn start: nothing kept, faces at their placeholder value.
    ///
    /// Faces are meaningless until the first roll of the turn.
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            faces: [1; DICE_COUNT],
            keep: KeepMask::none(),
        }
    }

    /// Dice showing `faces` with nothing kept.
    #[must_use]
    pub const fn from_faces(faces: Faces) -> Self {
        Self {
            faces,
            keep: KeepMask::none(),
        }
    }

    #[must_use]
    pub const fn faces(&self) -> &Faces {
        &self.faces
    }

    #[must_use]
    pub const fn keep_mask(&self) -> KeepMask {
        self.keep
    }

    #[must_use]
    pub fn is_kept(&self, index: usize) -> bool {
        self.keep.is_kept(index)
    }

    /// Flip the keep flag of die `index`, returning the new flag.
    pub fn toggle(&mut self, index: usize) -> Result<bool, Rejection> {
        let flag = self
            .keep
            .0
            .get_mut(index)
            .ok_or(Rejection::DieOutOfRange(index))?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Replace all keep flags at once.
    pub fn set_keep_mask(&mut self, mask: KeepMask) {
        self.keep = mask;
    }

    pub(crate) fn set_faces(&mut self, faces: Faces) {
        self.faces = faces;
    }

    /// Back to the turn-start state.
    pub fn reset(&mut self) {
        *self = Self::fresh();
    }
}

/// Rolls remaining in the current turn, within `0..=MAX_ROLLS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollBudget(u8);

impl Default for RollBudget {
    fn default() -> Self {
        Self::fresh()
    }
}

impl RollBudget {
    #[must_use]
    pub const fn fresh() -> Self {
        Self(MAX_ROLLS)
    }

    #[must_use]
    pub const fn remaining(self) -> u8 {
        self.0
    }

    /// No roll has happened yet this turn.
    #[must_use]
    pub const fn is_fresh(self) -> bool {
        self.0 == MAX_ROLLS
    }

    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        self.0 == 0
    }

    /// Spend one roll. Rejected without change when nothing is left.
    pub fn consume(&mut self) -> Result<u8, Rejection> {
        if self.is_exhausted() {
            return Err(Rejection::RollsExhausted);
        }
        self.0 -= 1;
        Ok(self.0)
    }

    pub fn reset(&mut self) {
        *self = Self::fresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_counts_down_and_stops() {
        let mut budget = RollBudget::fresh();
        assert!(budget.is_fresh());
        assert_eq!(budget.consume(), Ok(2));
        assert_eq!(budget.consume(), Ok(1));
        assert_eq!(budget.consume(), Ok(0));
        assert!(budget.is_exhausted());
        assert_eq!(budget.consume(), Err(Rejection::RollsExhausted));
        assert_eq!(budget.remaining(), 0);

        budget.reset();
        assert_eq!(budget.remaining(), MAX_ROLLS);
    }

    #[test]
    fn test_toggle() {
        let mut dice = DiceSet::from_faces([1, 2, 3, 4, 5]);
        assert_eq!(dice.toggle(2), Ok(true));
        assert!(dice.is_kept(2));
        assert_eq!(dice.toggle(2), Ok(false));
        assert_eq!(dice.toggle(5), Err(Rejection::DieOutOfRange(5)));
        assert_eq!(dice.keep_mask(), KeepMask::none());
    }

    #[test]
    fn test_reset_clears_keep_flags() {
        let mut dice = DiceSet::from_faces([6, 6, 6, 6, 6]);
        dice.set_keep_mask(KeepMask::from_fn(|i| i % 2 == 0));
        assert_eq!(dice.keep_mask().count(), 3);

        dice.reset();
        assert_eq!(dice, DiceSet::fresh());
        assert!(!dice.is_kept(9));
    }
}
