//! Engine configuration.
//!
//! Delays are cosmetic pacing for the presentation layer. A zero delay means
//! the step is applied synchronously instead of being scheduled, which is
//! what tests and headless simulations want (`EngineConfig::instant()`).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::FullHouseRule;

/// Reference probability that a bot keeps any given die on its second and
/// third rolls.
pub const DEFAULT_KEEP_PROBABILITY: f64 = 0.6;

/// Engine configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for dice and bot randomness.
    /// Same seed and same commands produce the same game.
    pub seed: u64,

    /// Time a roll stays "in progress" before the new faces land.
    pub roll_delay_ms: u64,

    /// Bot "thinking" time before each roll.
    pub bot_roll_delay_ms: u64,

    /// Bot "thinking" time before choosing a category.
    pub bot_select_delay_ms: u64,

    /// Time the recorded score is shown before the turn passes on.
    pub reveal_delay_ms: u64,

    /// Per-die keep probability used by the reference bot after its first roll.
    pub bot_keep_probability: f64,

    /// Whether five of a kind counts as a full house.
    pub full_house_rule: FullHouseRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            roll_delay_ms: 1_000,
            bot_roll_delay_ms: 1_500,
            bot_select_delay_ms: 2_000,
            reveal_delay_ms: 2_000,
            bot_keep_probability: DEFAULT_KEEP_PROBABILITY,
            full_house_rule: FullHouseRule::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration with every delay set to zero.
    ///
    /// Human commands take effect immediately; bot actions still go through
    /// the scheduler and fire on the next `advance`.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            roll_delay_ms: 0,
            bot_roll_delay_ms: 0,
            bot_select_delay_ms: 0,
            reveal_delay_ms: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_keep_probability(mut self, probability: f64) -> Self {
        self.bot_keep_probability = probability;
        self
    }

    #[must_use]
    pub fn with_full_house_rule(mut self, rule: FullHouseRule) -> Self {
        self.full_house_rule = rule;
        self
    }

    #[must_use]
    pub fn with_roll_delay(mut self, delay: Duration) -> Self {
        self.roll_delay_ms = duration_ms(delay);
        self
    }

    #[must_use]
    pub fn with_bot_delays(mut self, roll: Duration, select: Duration) -> Self {
        self.bot_roll_delay_ms = duration_ms(roll);
        self.bot_select_delay_ms = duration_ms(select);
        self
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay_ms = duration_ms(delay);
        self
    }

    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms)
    }

    pub fn bot_roll_delay(&self) -> Duration {
        Duration::from_millis(self.bot_roll_delay_ms)
    }

    pub fn bot_select_delay(&self) -> Duration {
        Duration::from_millis(self.bot_select_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Check that the configuration describes a playable table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.bot_keep_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::KeepProbability(p));
        }
        Ok(())
    }
}

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("bot_keep_probability must be within [0, 1] (got {0})")]
    KeepProbability(f64),
}
