//! # yacht-dice
//!
//! Rules engine for a Yacht dice table: one or more human seats, any number of
//! automated opponents, and a wager settled once every card is full.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: All session state lives in a `GameSession` that only the
//!    `TurnController` mutates. Commands either apply fully or are rejected
//!    with a reason and change nothing.
//!
//! 2. **Injected Time**: Pacing delays (roll animation, bot "thinking", score
//!    reveal) are cancellable tasks on a virtual clock. The host decides how
//!    fast time moves; tests run at zero delay.
//!
//! 3. **Deterministic**: Dice and bot randomness come from a seeded
//!    `GameRng`. Same seed and same commands give the same game.
//!
//! ## Modules
//!
//! - `core`: Seats, participants, RNG, configuration, rejections
//! - `dice`: Dice, keep flags, roll budget, roller
//! - `scoring`: Categories, scoring rules, score cards
//! - `turn`: Session aggregate, turn state machine, events, snapshots
//! - `schedule`: Virtual-clock delayed task queue
//! - `bot`: Automated seat policy
//! - `settlement`: Post-game wager payouts

pub mod core;
pub mod dice;
pub mod scoring;
pub mod schedule;
pub mod bot;
pub mod turn;
pub mod settlement;

// Re-export commonly used types
pub use crate::core::{
    Participant, ParticipantId, PlayerId, PlayerMap,
    GameRng, GameRngState,
    EngineConfig, ConfigError, Rejection,
};

pub use crate::dice::{DiceRoller, DiceSet, Faces, KeepMask, RollBudget, DICE_COUNT, MAX_ROLLS};

pub use crate::scoring::{score, score_with, Category, FullHouseRule, ScoreCard, Section};

pub use crate::schedule::{Scheduler, TaskToken};

pub use crate::bot::{best_category, BotPolicy, HeuristicBot};

pub use crate::turn::{
    EngineState, GameEvent, GameSession, SeatView, Selection,
    TableSnapshot, TurnController, TurnRecord,
};

pub use crate::settlement::{
    settle, FinalScores, Payout, SettlementError, SettlementMode, SettlementResult,
};
