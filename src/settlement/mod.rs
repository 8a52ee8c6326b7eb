//! Wager settlement after a finished game.
//!
//! Every participant stakes `bet_amount` against every other participant.
//! The pot is `bet_amount * (n - 1)`; the mode decides who moves it:
//!
//! - `WinnerTakesAll`: the top scorer collects the pot, everyone else pays the bet.
//! - `LoserPaysAll`: the bottom scorer pays the pot, everyone else collects the bet.
//!
//! Payouts always sum to zero. Ranking is by final score, descending; ties
//! keep the session's seat order.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Participant, ParticipantId};

/// Final grand totals keyed by participant.
pub type FinalScores = FxHashMap<ParticipantId, u32>;

/// How the stakes move.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementMode {
    #[default]
    WinnerTakesAll,
    LoserPaysAll,
}

impl std::fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementMode::WinnerTakesAll => f.write_str("winner takes all"),
            SettlementMode::LoserPaysAll => f.write_str("loser pays all"),
        }
    }
}

/// Signed amount owed to (positive) or by (negative) one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub participant: ParticipantId,
    pub name: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    pub reason: String,
    /// One entry per participant, in seat order.
    pub payouts: Vec<Payout>,
    pub mode: SettlementMode,
}

impl SettlementResult {
    #[must_use]
    pub fn payout_for(&self, participant: &ParticipantId) -> Option<i64> {
        self.payouts
            .iter()
            .find(|p| &p.participant == participant)
            .map(|p| p.amount)
    }

    /// Sum of all payouts. Zero for every valid settlement.
    #[must_use]
    pub fn net(&self) -> i64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("no participants to settle")]
    NoParticipants,
    #[error("bet amount must be positive")]
    ZeroBet,
    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),
    #[error("stake of {bet} across {players} players overflows")]
    StakeOverflow { bet: u64, players: usize },
}

/// Rank participants by final score, descending, keeping seat order on ties.
///
/// Participants missing from `final_scores` rank as 0.
#[must_use]
pub fn rank<'a>(participants: &'a [Participant], final_scores: &FinalScores) -> Vec<&'a Participant> {
    let score = |p: &Participant| final_scores.get(&p.id).copied().unwrap_or(0);
    let mut ranked: Vec<&Participant> = participants.iter().collect();
    // `sort_by` is stable, which is what keeps ties in seat order.
    ranked.sort_by(|a, b| score(b).cmp(&score(a)));
    ranked
}

/// Compute the payouts for a finished game.
pub fn settle(
    participants: &[Participant],
    final_scores: &FinalScores,
    bet_amount: u64,
    mode: SettlementMode,
) -> Result<SettlementResult, SettlementError> {
    if bet_amount == 0 {
        return Err(SettlementError::ZeroBet);
    }
    let mut seen = FxHashSet::default();
    if let Some(dup) = participants.iter().map(|p| &p.id).find(|id| !seen.insert(*id)) {
        return Err(SettlementError::DuplicateParticipant(dup.clone()));
    }
    let ranked = rank(participants, final_scores);
    let (Some(&winner), Some(&loser)) = (ranked.first(), ranked.last()) else {
        return Err(SettlementError::NoParticipants);
    };

    let overflow = SettlementError::StakeOverflow {
        bet: bet_amount,
        players: participants.len(),
    };
    let bet = i64::try_from(bet_amount).map_err(|_| overflow.clone())?;
    let others = i64::try_from(participants.len() - 1).map_err(|_| overflow.clone())?;
    let pot = bet.checked_mul(others).ok_or(overflow)?;

    let (decisive, reason) = match mode {
        SettlementMode::WinnerTakesAll => (
            winner,
            format!("{} finished first and takes the whole pot of {pot} ({mode}).", winner.name),
        ),
        SettlementMode::LoserPaysAll => (
            loser,
            format!("{} finished last and pays {bet} to every other player ({mode}).", loser.name),
        ),
    };

    let payouts = participants
        .iter()
        .map(|p| {
            let decisive_seat = p.id == decisive.id;
            let amount = match (mode, decisive_seat) {
                (SettlementMode::WinnerTakesAll, true) => pot,
                (SettlementMode::WinnerTakesAll, false) => -bet,
                (SettlementMode::LoserPaysAll, true) => -pot,
                (SettlementMode::LoserPaysAll, false) => bet,
            };
            Payout {
                participant: p.id.clone(),
                name: p.name.clone(),
                amount,
            }
        })
        .collect();

    Ok(SettlementResult {
        winner: winner.id.clone(),
        loser: loser.id.clone(),
        reason,
        payouts,
        mode,
    })
}
