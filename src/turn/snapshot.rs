//! Read-only view of the table for the presentation layer.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::session::TurnRecord;
use crate::core::{Participant, PlayerId};
use crate::dice::DiceSet;
use crate::scoring::{Category, ScoreCard};

/// Turn controller states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No session has been started, or it was torn down.
    #[default]
    Idle,
    /// The active seat may roll, toggle keeps, or pick a category.
    Rolling,
    /// A human picked a category worth 0 and must confirm or cancel.
    AwaitingConfirmation(Category),
    /// The score is recorded; the turn passes once the reveal is over.
    Committing,
    /// Every card is complete.
    GameOver,
}

impl EngineState {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Rolling => "rolling",
            EngineState::AwaitingConfirmation(_) => "awaiting confirmation",
            EngineState::Committing => "committing",
            EngineState::GameOver => "game over",
        }
    }
}

/// One seat's card with its derived totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: PlayerId,
    pub participant: Participant,
    pub card: ScoreCard,
    pub upper_subtotal: u32,
    pub upper_bonus: u32,
    pub total: u32,
}

impl SeatView {
    pub(crate) fn new(seat: PlayerId, participant: &Participant, card: &ScoreCard) -> Self {
        Self {
            seat,
            participant: participant.clone(),
            card: card.clone(),
            upper_subtotal: card.upper_subtotal(),
            upper_bonus: card.upper_bonus(),
            total: card.grand_total(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub state: EngineState,
    /// A delayed step (roll, bot action, reveal) is outstanding; commands
    /// are rejected until it fires.
    pub action_pending: bool,
    /// The outstanding step is a roll whose faces haven't landed yet.
    pub rolling: bool,
    pub active: Option<PlayerId>,
    pub turn_number: u32,
    pub dice: DiceSet,
    pub rolls_left: u8,
    pub seats: Vec<SeatView>,
    /// What each open category would score for the current dice.
    /// Only filled in for a human seat that has rolled and isn't mid-roll.
    pub potentials: Vec<(Category, u32)>,
    pub history: Vector<TurnRecord>,
}

impl TableSnapshot {
    /// The seat whose turn it is.
    #[must_use]
    pub fn active_seat(&self) -> Option<&SeatView> {
        let active = self.active?;
        self.seats.get(active.index())
    }

    #[must_use]
    pub fn potential(&self, category: Category) -> Option<u32> {
        self.potentials
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| *s)
    }
}
