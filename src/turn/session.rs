//! The session aggregate.
//!
//! Everything a running game knows lives here: seats, score cards, the dice
//! on the table, the roll budget, and the turn history. Only
//! `TurnController` holds a `GameSession`, and only its transition functions
//! mutate one.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{Participant, ParticipantId, PlayerId, PlayerMap, Rejection};
use crate::dice::{DiceSet, Faces, RollBudget};
use crate::scoring::{Category, ScoreCard};
use crate::settlement::FinalScores;

/// One committed turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// 1-based turn counter across all seats.
    pub turn: u32,
    pub seat: PlayerId,
    pub participant: ParticipantId,
    pub category: Category,
    pub score: u32,
    pub faces: Faces,
}

#[derive(Clone, Debug)]
pub struct GameSession {
    participants: Vec<Participant>,
    cards: PlayerMap<ScoreCard>,
    active: PlayerId,
    turn_number: u32,
    dice: DiceSet,
    budget: RollBudget,
    history: Vector<TurnRecord>,
}

impl GameSession {
    /// Seat the participants and open the first turn.
    ///
    /// Rejected when the list is empty, too long, or repeats an id, or when
    /// `starting` names a seat that doesn't exist.
    pub fn new(participants: Vec<Participant>, starting: Option<PlayerId>) -> Result<Self, Rejection> {
        if participants.is_empty() {
            return Err(Rejection::InvalidParticipants("no participants"));
        }
        if participants.len() > 255 {
            return Err(Rejection::InvalidParticipants("more than 255 participants"));
        }
        let duplicate = participants
            .iter()
            .enumerate()
            .any(|(i, p)| participants[..i].iter().any(|q| q.id == p.id));
        if duplicate {
            return Err(Rejection::InvalidParticipants("duplicate participant id"));
        }

        let active = starting.unwrap_or_default();
        if active.index() >= participants.len() {
            return Err(Rejection::StartingSeatOutOfRange(active));
        }

        Ok(Self {
            cards: PlayerMap::with_default(participants.len()),
            participants,
            active,
            turn_number: 1,
            dice: DiceSet::fresh(),
            budget: RollBudget::fresh(),
            history: Vector::new(),
        })
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn participant(&self, seat: PlayerId) -> Option<&Participant> {
        self.participants.get(seat.index())
    }

    #[must_use]
    pub fn active(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn active_participant(&self) -> &Participant {
        &self.participants[self.active.index()]
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn dice(&self) -> &DiceSet {
        &self.dice
    }

    #[must_use]
    pub fn budget(&self) -> RollBudget {
        self.budget
    }

    #[must_use]
    pub fn card(&self, seat: PlayerId) -> &ScoreCard {
        &self.cards[seat]
    }

    #[must_use]
    pub fn active_card(&self) -> &ScoreCard {
        &self.cards[self.active]
    }

    #[must_use]
    pub fn history(&self) -> &Vector<TurnRecord> {
        &self.history
    }

    /// Every seat has filled every category.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cards.values().all(ScoreCard::is_complete)
    }

    /// Grand totals, bonus included, for every participant.
    #[must_use]
    pub fn final_scores(&self) -> FinalScores {
        self.participants
            .iter()
            .zip(self.cards.values())
            .map(|(p, card)| (p.id.clone(), card.grand_total()))
            .collect()
    }

    pub(crate) fn dice_and_budget_mut(&mut self) -> (&mut DiceSet, &mut RollBudget) {
        (&mut self.dice, &mut self.budget)
    }

    pub(crate) fn dice_mut(&mut self) -> &mut DiceSet {
        &mut self.dice
    }

    /// Record `score` for the active seat and append it to the history.
    pub(crate) fn record(&mut self, category: Category, score: u32) -> Result<TurnRecord, Rejection> {
        self.cards[self.active].record(category, score)?;
        let record = TurnRecord {
            turn: self.turn_number,
            seat: self.active,
            participant: self.active_participant().id.clone(),
            category,
            score,
            faces: *self.dice.faces(),
        };
        self.history.push_back(record.clone());
        Ok(record)
    }

    /// Pass the turn to the next seat with fresh dice and budget.
    pub(crate) fn advance_turn(&mut self) {
        self.active = self.active.next(self.participants.len());
        self.turn_number += 1;
        self.dice.reset();
        self.budget.reset();
    }
}
