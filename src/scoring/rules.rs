//! Category scoring.
//!
//! Pure functions from five faces to a score. Every input yields a defined,
//! non-negative score; patterns that don't match score 0. Faces outside
//! 1..=6 never match any pattern and contribute nothing to sums.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::category::{Category, CATEGORY_COUNT};
use crate::dice::Faces;

pub const FULL_HOUSE_SCORE: u32 = 25;
pub const SMALL_STRAIGHT_SCORE: u32 = 30;
pub const LARGE_STRAIGHT_SCORE: u32 = 40;
pub const YACHT_SCORE: u32 = 50;

/// Full house variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullHouseRule {
    /// A 3+2 split or five of a kind scores the full house.
    #[default]
    FiveOfAKindQualifies,
    /// Only a true 3+2 split scores (classic rules).
    Strict,
}

/// Face counts indexed by face value; index 0 is unused.
fn face_counts(faces: &Faces) -> [u8; 7] {
    let mut counts = [0u8; 7];
    for &f in faces {
        if (1..=6).contains(&f) {
            counts[f as usize] += 1;
        }
    }
    counts
}

fn face_sum(faces: &Faces) -> u32 {
    faces
        .iter()
        .filter(|f| (1..=6).contains(*f))
        .map(|&f| u32::from(f))
        .sum()
}

/// Length of the longest run of consecutive faces present.
fn longest_run(counts: &[u8; 7]) -> usize {
    let mut best = 0;
    let mut run = 0;
    for &c in &counts[1..] {
        if c > 0 {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

fn max_count(counts: &[u8; 7]) -> u8 {
    counts[1..].iter().copied().max().unwrap_or(0)
}

/// Score `category` for `faces` under the default rules.
///
/// ```
/// use yacht_dice::scoring::{score, Category};
///
/// assert_eq!(score(&[5, 5, 5, 5, 5], Category::Yacht), 50);
/// assert_eq!(score(&[1, 2, 3, 4, 5], Category::SmallStraight), 30);
/// ```
#[must_use]
pub fn score(faces: &Faces, category: Category) -> u32 {
    score_with(faces, category, FullHouseRule::default())
}

/// Score `category` for `faces` under the given full house variant.
#[must_use]
pub fn score_with(faces: &Faces, category: Category, full_house: FullHouseRule) -> u32 {
    let counts = face_counts(faces);

    if let Some(face) = category.upper_face() {
        return u32::from(counts[face as usize]) * u32::from(face);
    }

    match category {
        Category::Choice => face_sum(faces),
        Category::ThreeKind if max_count(&counts) >= 3 => face_sum(faces),
        Category::FourKind if max_count(&counts) >= 4 => face_sum(faces),
        Category::FullHouse => {
            let pair = counts.contains(&2);
            let triple = counts.contains(&3);
            let five = counts.contains(&5);
            let qualifies = match full_house {
                FullHouseRule::FiveOfAKindQualifies => (triple && pair) || five,
                FullHouseRule::Strict => triple && pair,
            };
            if qualifies {
                FULL_HOUSE_SCORE
            } else {
                0
            }
        }
        Category::SmallStraight if longest_run(&counts) >= 4 => SMALL_STRAIGHT_SCORE,
        Category::LargeStraight if longest_run(&counts) == 5 => LARGE_STRAIGHT_SCORE,
        Category::Yacht if max_count(&counts) == 5 => YACHT_SCORE,
        _ => 0,
    }
}

/// Scores for every category, indexed by `Category::index()`.
#[must_use]
pub fn scores_for_faces(faces: &Faces, full_house: FullHouseRule) -> [u32; CATEGORY_COUNT] {
    Category::ALL.map(|c| score_with(faces, c, full_house))
}

/// Faces to highlight when a score is revealed.
///
/// - Upper categories: the counted face.
/// - ThreeKind, FourKind, Yacht: the face that reached the required count,
///   or nothing if none did.
/// - Everything else: all five faces.
#[must_use]
pub fn contributing_faces(faces: &Faces, category: Category) -> SmallVec<[u8; 5]> {
    if let Some(face) = category.upper_face() {
        return SmallVec::from_slice(&[face]);
    }

    let needed = match category {
        Category::ThreeKind => 3,
        Category::FourKind => 4,
        Category::Yacht => 5,
        _ => return SmallVec::from_slice(faces),
    };

    let counts = face_counts(faces);
    (1..=6u8)
        .find(|&f| counts[f as usize] >= needed)
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_categories() {
        let faces = [1, 3, 3, 6, 6];
        assert_eq!(score(&faces, Category::Aces), 1);
        assert_eq!(score(&faces, Category::Deuces), 0);
        assert_eq!(score(&faces, Category::Threes), 6);
        assert_eq!(score(&faces, Category::Sixes), 12);
    }

    #[test]
    fn test_kinds_score_the_sum() {
        assert_eq!(score(&[4, 4, 4, 1, 2], Category::ThreeKind), 15);
        assert_eq!(score(&[4, 4, 4, 1, 2], Category::FourKind), 0);
        assert_eq!(score(&[2, 2, 2, 2, 6], Category::FourKind), 14);
        assert_eq!(score(&[2, 2, 2, 2, 6], Category::ThreeKind), 14);
        assert_eq!(score(&[1, 2, 3, 4, 6], Category::Choice), 16);
    }

    #[test]
    fn test_full_house_variants() {
        assert_eq!(score(&[6, 6, 6, 2, 2], Category::FullHouse), 25);
        assert_eq!(score(&[3, 3, 3, 3, 3], Category::FullHouse), 25);
        assert_eq!(score(&[6, 6, 6, 6, 2], Category::FullHouse), 0);
        assert_eq!(
            score_with(&[3, 3, 3, 3, 3], Category::FullHouse, FullHouseRule::Strict),
            0
        );
        assert_eq!(
            score_with(&[2, 3, 2, 3, 2], Category::FullHouse, FullHouseRule::Strict),
            25
        );
    }

    #[test]
    fn test_straights() {
        assert_eq!(score(&[1, 2, 3, 4, 5], Category::LargeStraight), 40);
        assert_eq!(score(&[6, 2, 4, 3, 5], Category::LargeStraight), 40);
        assert_eq!(score(&[1, 2, 3, 4, 6], Category::LargeStraight), 0);

        assert_eq!(score(&[1, 2, 3, 4, 5], Category::SmallStraight), 30);
        assert_eq!(score(&[3, 4, 5, 6, 6], Category::SmallStraight), 30);
        assert_eq!(score(&[1, 1, 2, 3, 4], Category::SmallStraight), 30);
        assert_eq!(score(&[1, 2, 3, 5, 6], Category::SmallStraight), 0);
    }

    #[test]
    fn test_yacht() {
        assert_eq!(score(&[5, 5, 5, 5, 5], Category::Yacht), 50);
        assert_eq!(score(&[5, 5, 5, 5, 4], Category::Yacht), 0);
    }

    #[test]
    fn test_out_of_range_faces_never_match() {
        assert_eq!(score(&[0, 0, 0, 0, 0], Category::Yacht), 0);
        assert_eq!(score(&[9, 9, 9, 9, 9], Category::Choice), 0);
        assert_eq!(score(&[7, 1, 1, 1, 2], Category::ThreeKind), 5);
    }

    #[test]
    fn test_scores_for_faces_matches_individual_scores() {
        let faces = [2, 2, 3, 3, 3];
        let all = scores_for_faces(&faces, FullHouseRule::default());
        for c in Category::ALL {
            assert_eq!(all[c.index()], score(&faces, c));
        }
    }

    #[test]
    fn test_contributing_faces() {
        let faces = [6, 6, 6, 2, 2];
        assert_eq!(contributing_faces(&faces, Category::Sixes).as_slice(), &[6u8]);
        assert_eq!(contributing_faces(&faces, Category::ThreeKind).as_slice(), &[6u8]);
        assert!(contributing_faces(&faces, Category::FourKind).is_empty());
        assert_eq!(contributing_faces(&faces, Category::FullHouse).as_slice(), &faces[..]);
        assert_eq!(contributing_faces(&[4; 5], Category::Yacht).as_slice(), &[4u8]);
    }
}
