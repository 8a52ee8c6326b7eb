//! Scoring rules and score cards.
//!
//! - `Category`: closed enumeration of the 13 slots, upper then lower
//! - `score` / `score_with`: pure category scoring for five faces
//! - `ScoreCard`: per-participant record with upper bonus and totals

pub mod category;
pub mod rules;
pub mod card;

pub use category::{Category, Section, CATEGORY_COUNT};
pub use rules::{
    contributing_faces, score, score_with, scores_for_faces, FullHouseRule, FULL_HOUSE_SCORE,
    LARGE_STRAIGHT_SCORE, SMALL_STRAIGHT_SCORE, YACHT_SCORE,
};
pub use card::{ScoreCard, UPPER_BONUS, UPPER_BONUS_THRESHOLD};
