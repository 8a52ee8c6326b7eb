//! Notifications emitted by the turn controller.
//!
//! Events queue up inside the controller and are drained by the host after
//! each command or `advance`. They describe what already happened; nothing
//! in the engine waits on them.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ParticipantId, PlayerId};
use crate::dice::Faces;
use crate::scoring::Category;
use crate::settlement::FinalScores;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A seat's turn opened with fresh dice and a full roll budget.
    TurnStarted {
        turn: u32,
        seat: PlayerId,
        participant: ParticipantId,
    },
    /// New faces landed.
    DiceRolled {
        seat: PlayerId,
        faces: Faces,
        rolls_left: u8,
    },
    /// A score was recorded and the turn is closing.
    TurnEnded {
        summary: String,
        participant: ParticipantId,
        category: Category,
        score: u32,
        /// Faces the reveal highlights, from `contributing_faces`.
        contributing: SmallVec<[u8; 5]>,
    },
    /// Every card is complete. Totals include the upper bonus.
    GameOver { final_scores: FinalScores },
}

/// Human-readable line for a committed turn.
#[must_use]
pub fn turn_summary(name: &str, category: Category, score: u32) -> String {
    format!("{name} recorded {score} in {category}.")
}
