//! Dice rolling against a roll budget.

use tracing::debug;

use super::{DiceSet, Faces, KeepMask, RollBudget};
use crate::core::{GameRng, Rejection};

/// Draws new faces for unkept dice.
#[derive(Clone, Debug)]
pub struct DiceRoller {
    rng: GameRng,
}

impl DiceRoller {
    #[must_use]
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    /// Faces after rerolling every die not kept by `keep`.
    pub fn reroll(&mut self, faces: &Faces, keep: KeepMask) -> Faces {
        let mut next = *faces;
        for (i, face) in next.iter_mut().enumerate() {
            if !keep.is_kept(i) {
                *face = self.rng.roll_die();
            }
        }
        next
    }

    /// Roll `dice` using its own keep flags, spending one unit of `budget`.
    ///
    /// Rejected without touching either argument when the budget is spent.
    pub fn roll(&mut self, dice: &mut DiceSet, budget: &mut RollBudget) -> Result<Faces, Rejection> {
        let left = budget.consume()?;
        let faces = self.reroll(dice.faces(), dice.keep_mask());
        dice.set_faces(faces);
        debug!(?faces, kept = dice.keep_mask().count(), left, "rolled");
        Ok(faces)
    }

    /// Current RNG state, for reproducing a table.
    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }
}
