//! The thirteen scoring categories.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Rejection;

/// Number of categories on a score card.
pub const CATEGORY_COUNT: usize = 13;

/// Score card section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Single-face categories, Aces through Sixes.
    Upper,
    /// Pattern categories.
    Lower,
}

/// A scoring slot. Each participant fills every category exactly once.
///
/// Declaration order is the canonical enumeration order: upper section first,
/// then lower. Bots break ties in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Aces,
    Deuces,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeKind,
    FourKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yacht,
    Choice,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Aces,
        Category::Deuces,
        Category::Threes,
        Category::Fours,
        Category::Fives,
        Category::Sixes,
        Category::ThreeKind,
        Category::FourKind,
        Category::FullHouse,
        Category::SmallStraight,
        Category::LargeStraight,
        Category::Yacht,
        Category::Choice,
    ];

    /// Position in canonical order (0..13).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn section(self) -> Section {
        match self {
            Category::Aces
            | Category::Deuces
            | Category::Threes
            | Category::Fours
            | Category::Fives
            | Category::Sixes => Section::Upper,
            Category::ThreeKind
            | Category::FourKind
            | Category::FullHouse
            | Category::SmallStraight
            | Category::LargeStraight
            | Category::Yacht
            | Category::Choice => Section::Lower,
        }
    }

    /// The face an upper category counts, `None` for lower categories.
    #[must_use]
    pub const fn upper_face(self) -> Option<u8> {
        match self {
            Category::Aces => Some(1),
            Category::Deuces => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Category::Aces => "Aces",
            Category::Deuces => "Deuces",
            Category::Threes => "Threes",
            Category::Fours => "Fours",
            Category::Fives => "Fives",
            Category::Sixes => "Sixes",
            Category::ThreeKind => "ThreeKind",
            Category::FourKind => "FourKind",
            Category::FullHouse => "FullHouse",
            Category::SmallStraight => "SmallStraight",
            Category::LargeStraight => "LargeStraight",
            Category::Yacht => "Yacht",
            Category::Choice => "Choice",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses names from the presentation layer. Unknown names are rejected.
impl FromStr for Category {
    type Err = Rejection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(key))
            .or(match key {
                "SmallS" => Some(Category::SmallStraight),
                "LargeS" => Some(Category::LargeStraight),
                _ => None,
            })
            .ok_or_else(|| Rejection::UnknownCategory(s.to_string()))
    }
}
