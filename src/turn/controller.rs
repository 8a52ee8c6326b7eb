//! The turn state machine.
//!
//! ## States
//!
//! - `Rolling`: the active seat may roll (while budget remains), toggle keeps
//!   (after the first roll), or pick an open category (after the first roll)
//! - `AwaitingConfirmation`: a human picked a category worth 0 and must
//!   confirm or cancel
//! - `Committing`: the score is recorded and `TurnEnded` emitted; the turn
//!   passes when the reveal delay is over
//! - `GameOver`: every card is complete
//!
//! ## Pending actions
//!
//! At most one delayed step is outstanding: a roll in progress, a bot
//! "thinking", or a score reveal. While it is outstanding every command is
//! rejected. It is cancelled whenever the turn passes or the session is torn
//! down, so a stale timer can never act on a table that has moved on.
//!
//! ## Commands
//!
//! Commands name the acting seat. A command from any seat other than the
//! active human seat, or one the current state forbids, is rejected as a
//! no-op with the reason.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::event::{turn_summary, GameEvent};
use super::session::GameSession;
use super::snapshot::{EngineState, SeatView, TableSnapshot};
use crate::bot::{best_category, BotPolicy, HeuristicBot};
use crate::core::{EngineConfig, GameRng, Participant, PlayerId, Rejection};
use crate::dice::DiceRoller;
use crate::schedule::{Scheduler, TaskToken};
use crate::scoring::{contributing_faces, score_with, Category};

/// Delayed steps the controller can have outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingAction {
    /// A roll is in the air; faces land when this fires.
    SettleRoll,
    /// The active bot decides its keeps and rolls.
    BotRoll,
    /// The active bot picks a category.
    BotSelect,
    /// The reveal is over; pass the turn or end the game.
    FinishTurn,
}

/// Outcome of an accepted category selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// The score was recorded.
    Committed { score: u32 },
    /// The category would score 0; `confirm_zero_score` or
    /// `cancel_zero_score` must follow.
    NeedsConfirmation,
}

fn rejected(reason: Rejection) -> Rejection {
    debug!(%reason, "command rejected");
    reason
}

/// Owns a `GameSession` and is the only thing that mutates it.
pub struct TurnController {
    config: EngineConfig,
    roller: DiceRoller,
    bot_rng: GameRng,
    bot: Box<dyn BotPolicy>,
    scheduler: Scheduler<PendingAction>,
    pending: Option<(TaskToken, PendingAction)>,
    session: Option<GameSession>,
    state: EngineState,
    events: Vec<GameEvent>,
}

impl TurnController {
    /// Controller with the reference bot policy.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let bot = HeuristicBot::new(config.bot_keep_probability);
        Self::with_bot(config, Box::new(bot))
    }

    /// Controller with a custom policy for every automated seat.
    #[must_use]
    pub fn with_bot(config: EngineConfig, bot: Box<dyn BotPolicy>) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            roller: DiceRoller::new(rng.for_context("dice")),
            bot_rng: rng.for_context("bot"),
            bot,
            scheduler: Scheduler::new(),
            pending: None,
            session: None,
            state: EngineState::Idle,
            events: Vec::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_action_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Time until the outstanding delayed step fires, if any.
    #[must_use]
    pub fn time_until_next(&self) -> Option<Duration> {
        self.scheduler.time_until_next()
    }

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Session lifecycle ===

    /// Seat `participants` in turn order and open the first turn.
    ///
    /// Any running session is discarded first. An invalid participant list
    /// is rejected and leaves the current session untouched.
    pub fn start_session(
        &mut self,
        participants: Vec<Participant>,
        starting: Option<PlayerId>,
    ) -> Result<(), Rejection> {
        let session = GameSession::new(participants, starting).map_err(rejected)?;
        self.cancel_pending();
        self.events.clear();
        info!(
            players = session.player_count(),
            starting = %session.active(),
            "session started"
        );
        self.session = Some(session);
        self.state = EngineState::Rolling;
        self.open_turn();
        Ok(())
    }

    /// Discard the session and cancel anything outstanding.
    pub fn end_session(&mut self) {
        self.cancel_pending();
        let dropped = self.scheduler.cancel_all();
        if self.session.take().is_some() {
            info!(dropped, "session ended");
        }
        self.state = EngineState::Idle;
    }

    // === Commands ===

    /// Roll every unkept die.
    ///
    /// With a non-zero roll delay the faces land on a later `advance`.
    pub fn roll(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        self.try_roll(actor).map_err(rejected)
    }

    /// Flip the keep flag of die `index`, returning the new flag.
    pub fn toggle_keep(&mut self, actor: PlayerId, index: usize) -> Result<bool, Rejection> {
        self.try_toggle_keep(actor, index).map_err(rejected)
    }

    /// Pick a category for the current dice.
    ///
    /// A positive score is recorded straight away. A zero score moves to
    /// `AwaitingConfirmation` because it gives the category up for good.
    pub fn select_category(
        &mut self,
        actor: PlayerId,
        category: Category,
    ) -> Result<Selection, Rejection> {
        self.try_select_category(actor, category).map_err(rejected)
    }

    /// `select_category` for a category given by name, as the UI sends it.
    pub fn select_category_named(
        &mut self,
        actor: PlayerId,
        name: &str,
    ) -> Result<Selection, Rejection> {
        let category = name.parse::<Category>().map_err(rejected)?;
        self.select_category(actor, category)
    }

    /// Record the pending zero score.
    pub fn confirm_zero_score(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        self.try_confirm_zero_score(actor).map_err(rejected)
    }

    /// Drop the pending zero-score selection. Dice and budget are unchanged.
    pub fn cancel_zero_score(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        self.try_cancel_zero_score(actor).map_err(rejected)
    }

    // === Time ===

    /// Move the clock forward by `elapsed`, firing every delayed step that
    /// falls due, including ones scheduled along the way.
    ///
    /// Returns the number of steps fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let target = self.scheduler.now().saturating_add(elapsed);
        let mut fired = 0;
        while let Some((token, action)) = self.scheduler.pop_due(target) {
            if self.pending.map(|(t, _)| t) != Some(token) {
                debug!(token = token.raw(), ?action, "stale task dropped");
                continue;
            }
            self.pending = None;
            self.run(action);
            fired += 1;
        }
        self.scheduler.advance_to(target);
        fired
    }

    /// Jump the clock to the next delayed step and fire it.
    ///
    /// Returns `false` when nothing is scheduled, e.g. while waiting on a
    /// human seat or after the game ends.
    pub fn advance_to_next(&mut self) -> bool {
        match self.scheduler.time_until_next() {
            Some(wait) => {
                self.advance(wait);
                true
            }
            None => false,
        }
    }

    // === Snapshot ===

    #[must_use]
    pub fn snapshot(&self) -> TableSnapshot {
        let Some(session) = &self.session else {
            return TableSnapshot::default();
        };

        let rolling = matches!(self.pending, Some((_, PendingAction::SettleRoll)));
        let seats = session
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let seat = PlayerId::new(i as u8);
                SeatView::new(seat, p, session.card(seat))
            })
            .collect();

        let shows_potentials = matches!(
            self.state,
            EngineState::Rolling | EngineState::AwaitingConfirmation(_)
        ) && !session.active_participant().is_automated
            && !session.budget().is_fresh()
            && !rolling;
        let potentials = if shows_potentials {
            let faces = session.dice().faces();
            session
                .active_card()
                .unrecorded()
                .map(|c| (c, score_with(faces, c, self.config.full_house_rule)))
                .collect()
        } else {
            Vec::new()
        };

        TableSnapshot {
            state: self.state,
            action_pending: self.pending.is_some(),
            rolling,
            active: Some(session.active()),
            turn_number: session.turn_number(),
            dice: *session.dice(),
            rolls_left: session.budget().remaining(),
            seats,
            potentials,
            history: session.history().clone(),
        }
    }

    // === Command implementations ===

    /// The session, if `actor` is the active human seat and nothing is pending.
    fn human_turn(&self, actor: PlayerId) -> Result<&GameSession, Rejection> {
        let session = self.session.as_ref().ok_or(Rejection::NoSession)?;
        if self.pending.is_some() {
            return Err(Rejection::ActionPending);
        }
        if actor != session.active() {
            return Err(Rejection::NotYourTurn {
                actor,
                active: session.active(),
            });
        }
        if session.active_participant().is_automated {
            return Err(Rejection::AutomatedSeat(actor));
        }
        Ok(session)
    }

    fn require_rolling(&self) -> Result<(), Rejection> {
        match self.state {
            EngineState::Rolling => Ok(()),
            other => Err(Rejection::WrongState(other.describe())),
        }
    }

    fn try_roll(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        let session = self.human_turn(actor)?;
        self.require_rolling()?;
        if session.budget().is_exhausted() {
            return Err(Rejection::RollsExhausted);
        }
        self.begin_roll();
        Ok(())
    }

    fn try_toggle_keep(&mut self, actor: PlayerId, index: usize) -> Result<bool, Rejection> {
        let budget = self.human_turn(actor)?.budget();
        self.require_rolling()?;
        if budget.is_fresh() {
            return Err(Rejection::NoRollYet);
        }
        if budget.is_exhausted() {
            return Err(Rejection::RollsExhausted);
        }
        let session = self.session.as_mut().ok_or(Rejection::NoSession)?;
        let kept = session.dice_mut().toggle(index)?;
        debug!(seat = %actor, index, kept, "keep toggled");
        Ok(kept)
    }

    fn try_select_category(
        &mut self,
        actor: PlayerId,
        category: Category,
    ) -> Result<Selection, Rejection> {
        let session = self.human_turn(actor)?;
        self.require_rolling()?;
        if session.budget().is_fresh() {
            return Err(Rejection::NoRollYet);
        }
        if session.active_card().is_recorded(category) {
            return Err(Rejection::CategoryTaken(category));
        }

        let score = score_with(session.dice().faces(), category, self.config.full_house_rule);
        if score > 0 {
            self.commit(category, score)?;
            Ok(Selection::Committed { score })
        } else {
            debug!(seat = %actor, %category, "zero score needs confirmation");
            self.state = EngineState::AwaitingConfirmation(category);
            Ok(Selection::NeedsConfirmation)
        }
    }

    fn try_confirm_zero_score(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        self.human_turn(actor)?;
        let EngineState::AwaitingConfirmation(category) = self.state else {
            return Err(Rejection::WrongState(self.state.describe()));
        };
        self.commit(category, 0)
    }

    fn try_cancel_zero_score(&mut self, actor: PlayerId) -> Result<(), Rejection> {
        self.human_turn(actor)?;
        let EngineState::AwaitingConfirmation(category) = self.state else {
            return Err(Rejection::WrongState(self.state.describe()));
        };
        debug!(seat = %actor, %category, "zero score cancelled");
        self.state = EngineState::Rolling;
        Ok(())
    }

    // === Transitions ===

    fn open_turn(&mut self) {
        if let Some(session) = &self.session {
            let participant = session.active_participant();
            debug!(
                turn = session.turn_number(),
                seat = %session.active(),
                automated = participant.is_automated,
                "turn started"
            );
            self.events.push(GameEvent::TurnStarted {
                turn: session.turn_number(),
                seat: session.active(),
                participant: participant.id.clone(),
            });
        }
        self.schedule_bot_if_needed();
    }

    fn begin_roll(&mut self) {
        let delay = self.config.roll_delay();
        if delay.is_zero() {
            self.settle_roll();
        } else {
            self.schedule(delay, PendingAction::SettleRoll);
        }
    }

    fn settle_roll(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let seat = session.active();
        let (dice, budget) = session.dice_and_budget_mut();
        match self.roller.roll(dice, budget) {
            Ok(faces) => self.events.push(GameEvent::DiceRolled {
                seat,
                faces,
                rolls_left: budget.remaining(),
            }),
            Err(reason) => warn!(%reason, %seat, "roll settled without budget"),
        }
        self.schedule_bot_if_needed();
    }

    /// Record the score for the active seat and start the reveal.
    fn commit(&mut self, category: Category, score: u32) -> Result<(), Rejection> {
        let session = self.session.as_mut().ok_or(Rejection::NoSession)?;
        let record = session.record(category, score)?;
        let summary = turn_summary(&session.active_participant().name, category, score);
        info!(
            turn = record.turn,
            seat = %record.seat,
            %category,
            score,
            "score recorded"
        );
        self.events.push(GameEvent::TurnEnded {
            summary,
            contributing: contributing_faces(&record.faces, category),
            participant: record.participant,
            category,
            score,
        });
        self.state = EngineState::Committing;

        let delay = self.config.reveal_delay();
        if delay.is_zero() {
            self.finish_turn();
        } else {
            self.schedule(delay, PendingAction::FinishTurn);
        }
        Ok(())
    }

    fn finish_turn(&mut self) {
        self.cancel_pending();
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.is_complete() {
            let final_scores = session.final_scores();
            info!(turns = session.history().len(), "game over");
            self.state = EngineState::GameOver;
            self.events.push(GameEvent::GameOver { final_scores });
            return;
        }

        session.advance_turn();
        self.state = EngineState::Rolling;
        self.open_turn();
    }

    // === Bots ===

    fn schedule_bot_if_needed(&mut self) {
        if self.state != EngineState::Rolling || self.pending.is_some() {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        if !session.active_participant().is_automated {
            return;
        }

        if session.budget().is_exhausted() {
            self.schedule(self.config.bot_select_delay(), PendingAction::BotSelect);
        } else {
            self.schedule(self.config.bot_roll_delay(), PendingAction::BotRoll);
        }
    }

    fn bot_roll(&mut self) {
        if self.state != EngineState::Rolling {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.active_participant().is_automated || session.budget().is_exhausted() {
            return;
        }

        let mask = self
            .bot
            .keep_mask(session.dice(), session.budget(), &mut self.bot_rng);
        session.dice_mut().set_keep_mask(mask);
        debug!(seat = %session.active(), kept = mask.count(), "bot keeps");
        self.begin_roll();
    }

    fn bot_select(&mut self) {
        if self.state != EngineState::Rolling {
            return;
        }
        let Some(session) = &self.session else {
            return;
        };
        if !session.active_participant().is_automated {
            return;
        }

        let rule = self.config.full_house_rule;
        let faces = *session.dice().faces();
        let card = session.active_card();
        let chosen = self
            .bot
            .choose_category(&faces, card, rule)
            .filter(|c| !card.is_recorded(*c))
            .or_else(|| best_category(&faces, card, rule).map(|(c, _)| c));
        let Some(category) = chosen else {
            warn!(seat = %session.active(), "bot has no open category");
            return;
        };

        let score = score_with(&faces, category, rule);
        debug!(seat = %session.active(), %category, score, "bot selects");
        if let Err(reason) = self.commit(category, score) {
            warn!(%reason, "bot selection rejected");
        }
    }

    // === Scheduling ===

    fn run(&mut self, action: PendingAction) {
        match action {
            PendingAction::SettleRoll => self.settle_roll(),
            PendingAction::BotRoll => self.bot_roll(),
            PendingAction::BotSelect => self.bot_select(),
            PendingAction::FinishTurn => self.finish_turn(),
        }
    }

    fn schedule(&mut self, delay: Duration, action: PendingAction) {
        let token = self.scheduler.schedule(delay, action);
        self.pending = Some((token, action));
    }

    fn cancel_pending(&mut self) {
        if let Some((token, action)) = self.pending.take() {
            self.scheduler.cancel(token);
            debug!(token = token.raw(), ?action, "pending action cancelled");
        }
    }
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("now", &self.scheduler.now())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::MAX_ROLLS;

    const ME: PlayerId = PlayerId::new(0);
    const BOT: PlayerId = PlayerId::new(1);

    fn table() -> Vec<Participant> {
        vec![
            Participant::human("me", "Guest").as_host(),
            Participant::bot("bot-1", "Warrior-1"),
        ]
    }

    fn instant() -> TurnController {
        let mut ctl = TurnController::new(EngineConfig::instant().with_seed(17));
        ctl.start_session(table(), None).unwrap();
        ctl
    }

    #[test]
    fn test_commands_before_session_are_rejected() {
        let mut ctl = TurnController::new(EngineConfig::instant());
        assert_eq!(ctl.roll(ME), Err(Rejection::NoSession));
        assert_eq!(ctl.state(), EngineState::Idle);
        assert_eq!(ctl.snapshot(), TableSnapshot::default());
    }

    #[test]
    fn test_roll_consumes_budget_until_exhausted() {
        let mut ctl = instant();
        for left in (0..MAX_ROLLS).rev() {
            ctl.roll(ME).unwrap();
            assert_eq!(ctl.snapshot().rolls_left, left);
        }
        assert_eq!(ctl.roll(ME), Err(Rejection::RollsExhausted));
        assert_eq!(ctl.snapshot().rolls_left, 0);
    }

    #[test]
    fn test_toggle_requires_a_roll() {
        let mut ctl = instant();
        assert_eq!(ctl.toggle_keep(ME, 0), Err(Rejection::NoRollYet));
        ctl.roll(ME).unwrap();
        assert_eq!(ctl.toggle_keep(ME, 0), Ok(true));
        assert_eq!(ctl.toggle_keep(ME, 7), Err(Rejection::DieOutOfRange(7)));
    }

    #[test]
    fn test_bot_seat_rejects_commands() {
        let mut ctl = instant();
        assert_eq!(
            ctl.roll(BOT),
            Err(Rejection::NotYourTurn { actor: BOT, active: ME })
        );
    }

    #[test]
    fn test_zero_score_confirmation_cycle() {
        let mut ctl = instant();
        ctl.roll(ME).unwrap();

        let zero = Category::ALL
            .into_iter()
            .find(|&c| ctl.snapshot().potential(c) == Some(0))
            .expect("some category scores 0 for five dice");

        assert_eq!(ctl.select_category(ME, zero), Ok(Selection::NeedsConfirmation));
        assert_eq!(ctl.state(), EngineState::AwaitingConfirmation(zero));
        assert_eq!(ctl.roll(ME), Err(Rejection::WrongState("awaiting confirmation")));

        ctl.cancel_zero_score(ME).unwrap();
        assert_eq!(ctl.state(), EngineState::Rolling);
        assert_eq!(ctl.snapshot().rolls_left, MAX_ROLLS - 1);

        ctl.select_category(ME, zero).unwrap();
        ctl.confirm_zero_score(ME).unwrap();
        let snap = ctl.snapshot();
        let card = &snap.seats[0].card;
        assert_eq!(card.get(zero), Some(0));
        assert_eq!(ctl.snapshot().active, Some(BOT));
    }

    #[test]
    fn test_bot_turn_runs_on_advance() {
        let mut ctl = instant();
        ctl.roll(ME).unwrap();
        ctl.select_category(ME, Category::Choice).unwrap();
        assert!(ctl.is_action_pending());

        // Three bot rolls and a selection.
        assert_eq!(ctl.advance(Duration::ZERO), 4);
        let snap = ctl.snapshot();
        assert_eq!(snap.active, Some(ME));
        assert_eq!(snap.seats[1].card.recorded_count(), 1);
        assert!(!ctl.is_action_pending());
    }

    #[test]
    fn test_end_session_cancels_pending_bot() {
        let mut ctl = instant();
        ctl.roll(ME).unwrap();
        ctl.select_category(ME, Category::Choice).unwrap();
        assert!(ctl.is_action_pending());

        ctl.end_session();
        assert!(!ctl.is_action_pending());
        assert_eq!(ctl.time_until_next(), None);
        assert_eq!(ctl.advance(Duration::from_secs(60)), 0);
        assert_eq!(ctl.state(), EngineState::Idle);
    }

    #[test]
    fn test_turn_ended_carries_contributing_faces() {
        let mut ctl = instant();
        ctl.roll(ME).unwrap();
        let faces = *ctl.snapshot().dice.faces();
        ctl.select_category(ME, Category::Choice).unwrap();
        ctl.advance(Duration::ZERO);

        let reveals: Vec<_> = ctl
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::TurnEnded {
                    category,
                    contributing,
                    ..
                } => Some((category, contributing)),
                _ => None,
            })
            .collect();
        assert_eq!(reveals.len(), 2);
        assert_eq!(reveals[0].0, Category::Choice);
        assert_eq!(reveals[0].1.as_slice(), &faces[..]);

        // The bot's reveal matches its recorded dice.
        let snap = ctl.snapshot();
        let bot_turn = &snap.history[1];
        assert_eq!(reveals[1].0, bot_turn.category);
        assert_eq!(reveals[1].1, contributing_faces(&bot_turn.faces, bot_turn.category));
    }
}
