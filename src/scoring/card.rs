//! Per-participant score card.

use serde::{Deserialize, Serialize};

use super::category::{Category, Section, CATEGORY_COUNT};
use crate::core::Rejection;

/// Upper subtotal needed for the bonus.
pub const UPPER_BONUS_THRESHOLD: u32 = 63;
/// Bonus awarded once the upper subtotal reaches the threshold.
pub const UPPER_BONUS: u32 = 35;

/// Recorded score per category. A recorded category never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    scores: [Option<u32>; CATEGORY_COUNT],
}

impl ScoreCard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, category: Category) -> Option<u32> {
        self.scores[category.index()]
    }

    #[must_use]
    pub fn is_recorded(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    /// Record `score` in `category`.
    ///
    /// Rejected without change if the category already holds a score.
    pub fn record(&mut self, category: Category, score: u32) -> Result<(), Rejection> {
        let slot = &mut self.scores[category.index()];
        if slot.is_some() {
            return Err(Rejection::CategoryTaken(category));
        }
        *slot = Some(score);
        Ok(())
    }

    #[must_use]
    pub fn recorded_count(&self) -> usize {
        self.scores.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.recorded_count() == CATEGORY_COUNT
    }

    /// Categories still open, in canonical order.
    pub fn unrecorded(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| !self.is_recorded(*c))
    }

    /// Recorded (category, score) pairs in canonical order.
    pub fn recorded(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|s| (c, s)))
    }

    fn section_sum(&self, section: Section) -> u32 {
        self.recorded()
            .filter(|(c, _)| c.section() == section)
            .map(|(_, s)| s)
            .sum()
    }

    #[must_use]
    pub fn upper_subtotal(&self) -> u32 {
        self.section_sum(Section::Upper)
    }

    #[must_use]
    pub fn lower_subtotal(&self) -> u32 {
        self.section_sum(Section::Lower)
    }

    #[must_use]
    pub fn upper_bonus(&self) -> u32 {
        if self.upper_subtotal() >= UPPER_BONUS_THRESHOLD {
            UPPER_BONUS
        } else {
            0
        }
    }

    /// Sum of all recorded scores plus the upper bonus.
    #[must_use]
    pub fn grand_total(&self) -> u32 {
        self.upper_subtotal() + self.lower_subtotal() + self.upper_bonus()
    }
}
