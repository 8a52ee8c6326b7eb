//! Turn flow: the session aggregate and the state machine that drives it.
//!
//! - `GameSession`: seats, cards, dice, budget and history for one game
//! - `TurnController`: commands, bot scheduling, events, snapshots
//! - `GameEvent`: what the host is told after each step
//! - `TableSnapshot`: what the host renders

pub mod controller;
pub mod event;
pub mod session;
pub mod snapshot;

pub use controller::{Selection, TurnController};
pub use event::{turn_summary, GameEvent};
pub use session::{GameSession, TurnRecord};
pub use snapshot::{EngineState, SeatView, TableSnapshot};
