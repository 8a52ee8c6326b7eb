//! Automated opponents.
//!
//! A `BotPolicy` makes the two decisions a seat needs on its turn:
//! - which dice to keep before a roll
//! - which category to record once it stops rolling
//!
//! Bots never go through the zero-score confirmation flow. If every open
//! category would score 0, the first open one is recorded.

use crate::core::GameRng;
use crate::dice::{DiceSet, Faces, KeepMask, RollBudget};
use crate::scoring::{score_with, Category, FullHouseRule, ScoreCard};

/// Decision procedure for an automated seat.
pub trait BotPolicy: Send {
    /// Keep flags to apply before the next roll.
    fn keep_mask(&self, dice: &DiceSet, budget: RollBudget, rng: &mut GameRng) -> KeepMask;

    /// Category to record for `faces`. `None` only when `card` is complete.
    fn choose_category(
        &self,
        faces: &Faces,
        card: &ScoreCard,
        full_house: FullHouseRule,
    ) -> Option<Category> {
        best_category(faces, card, full_house).map(|(c, _)| c)
    }
}

/// Highest-scoring open category and its score.
///
/// Ties go to the category seen first in canonical order (upper, then lower),
/// so an all-zero hand gives up the first open category.
///
/// ```
/// use yacht_dice::bot::best_category;
/// use yacht_dice::scoring::{Category, FullHouseRule, ScoreCard};
///
/// let card = ScoreCard::new();
/// let best = best_category(&[6, 6, 6, 6, 6], &card, FullHouseRule::default());
/// assert_eq!(best, Some((Category::Yacht, 50)));
/// ```
#[must_use]
pub fn best_category(
    faces: &Faces,
    card: &ScoreCard,
    full_house: FullHouseRule,
) -> Option<(Category, u32)> {
    let mut best: Option<(Category, u32)> = None;
    for category in card.unrecorded() {
        let score = score_with(faces, category, full_house);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((category, score));
        }
    }
    best
}

/// Reference policy: roll fresh dice first, then keep each die
/// independently with a fixed probability, then take the best category.
///
/// Stochastic, and not trying to play well.
#[derive(Clone, Debug)]
pub struct HeuristicBot {
    keep_probability: f64,
}

impl Default for HeuristicBot {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_KEEP_PROBABILITY)
    }
}

impl HeuristicBot {
    #[must_use]
    pub fn new(keep_probability: f64) -> Self {
        Self { keep_probability }
    }

    #[must_use]
    pub fn keep_probability(&self) -> f64 {
        self.keep_probability
    }
}

impl BotPolicy for HeuristicBot {
    fn keep_mask(&self, _dice: &DiceSet, budget: RollBudget, rng: &mut GameRng) -> KeepMask {
        if budget.is_fresh() {
            return KeepMask::none();
        }
        KeepMask::from_fn(|_| rng.gen_bool(self.keep_probability))
    }
}
