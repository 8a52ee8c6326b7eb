//! Core engine types: seats, participants, RNG, configuration, rejections.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{Participant, ParticipantId, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{ConfigError, EngineConfig, DEFAULT_KEEP_PROBABILITY};
pub use error::Rejection;
