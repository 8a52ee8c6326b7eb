//! Command rejection reasons.
//!
//! A rejected command is a no-op: the engine state is exactly what it was
//! before the command was issued. Callers are expected to consult the
//! snapshot before issuing commands, so rejections are ordinary values, not
//! faults.

use thiserror::Error;

use super::PlayerId;
use crate::scoring::Category;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("no session is running")]
    NoSession,
    #[error("participant list is invalid: {0}")]
    InvalidParticipants(&'static str),
    #[error("starting seat {0} is out of range")]
    StartingSeatOutOfRange(PlayerId),
    #[error("{actor} acted out of turn (active seat is {active})")]
    NotYourTurn { actor: PlayerId, active: PlayerId },
    #[error("{0} is played by a bot")]
    AutomatedSeat(PlayerId),
    #[error("another action is still in progress")]
    ActionPending,
    #[error("command not allowed while {0}")]
    WrongState(&'static str),
    #[error("no rolls left this turn")]
    RollsExhausted,
    #[error("dice have not been rolled yet this turn")]
    NoRollYet,
    #[error("die index {0} is out of range")]
    DieOutOfRange(usize),
    #[error("category {0} is already recorded")]
    CategoryTaken(Category),
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}
