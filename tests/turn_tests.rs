//! Turn controller behavior: commands, rejections, pacing, game flow.

use std::time::Duration;

use yacht_dice::core::{Participant, PlayerId, Rejection};
use yacht_dice::dice::MAX_ROLLS;
use yacht_dice::scoring::{Category, CATEGORY_COUNT};
use yacht_dice::turn::{EngineState, GameEvent, Selection, TurnController};
use yacht_dice::EngineConfig;

const ME: PlayerId = PlayerId::new(0);

fn solo() -> Vec<Participant> {
    vec![Participant::human("me", "Guest").as_host()]
}

fn with_bots(bots: usize) -> Vec<Participant> {
    let mut table = solo();
    table.extend((1..=bots).map(|i| Participant::bot(format!("bot-{i}"), format!("Warrior-{i}"))));
    table
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Roll once and take the highest potential, confirming a zero if needed.
fn play_human_turn(ctl: &mut TurnController, seat: PlayerId) -> Category {
    ctl.roll(seat).unwrap();
    let (category, _) = ctl
        .snapshot()
        .potentials
        .iter()
        .copied()
        .max_by_key(|&(_, s)| s)
        .expect("open categories");
    if ctl.select_category(seat, category).unwrap() == Selection::NeedsConfirmation {
        ctl.confirm_zero_score(seat).unwrap();
    }
    category
}

#[test]
fn test_solo_game_runs_to_game_over() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    ctl.start_session(solo(), None).unwrap();

    for turn in 1..=CATEGORY_COUNT as u32 {
        assert_eq!(ctl.snapshot().turn_number, turn);
        play_human_turn(&mut ctl, ME);
    }

    assert_eq!(ctl.state(), EngineState::GameOver);
    let events = ctl.drain_events();
    let ended = events
        .iter()
        .filter(|e| matches!(e, GameEvent::TurnEnded { .. }))
        .count();
    assert_eq!(ended, CATEGORY_COUNT);

    let Some(GameEvent::GameOver { final_scores }) = events.last() else {
        panic!("last event should be game over");
    };
    let snap = ctl.snapshot();
    assert!(snap.seats[0].card.is_complete());
    assert_eq!(final_scores[&snap.seats[0].participant.id], snap.seats[0].total);

    assert_eq!(ctl.roll(ME), Err(Rejection::WrongState("game over")));
}

#[test]
fn test_mixed_table_round_robin() {
    let mut ctl = TurnController::new(EngineConfig::instant().with_seed(7));
    ctl.start_session(with_bots(2), None).unwrap();

    for _ in 0..CATEGORY_COUNT {
        assert_eq!(ctl.snapshot().active, Some(ME));
        play_human_turn(&mut ctl, ME);
        while ctl.advance_to_next() {}
    }

    assert_eq!(ctl.state(), EngineState::GameOver);
    let snap = ctl.snapshot();
    assert!(snap.seats.iter().all(|s| s.card.is_complete()));
    assert_eq!(snap.history.len(), 3 * CATEGORY_COUNT);

    let seats: Vec<_> = snap.history.iter().take(6).map(|r| r.seat.index()).collect();
    assert_eq!(seats, vec![0, 1, 2, 0, 1, 2]);
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let mut ctl = TurnController::new(EngineConfig::instant().with_seed(99));
        ctl.start_session(with_bots(3), None).unwrap();
        for _ in 0..CATEGORY_COUNT {
            play_human_turn(&mut ctl, ME);
            while ctl.advance_to_next() {}
        }
        ctl.drain_events()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_rejected_commands_change_nothing() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    ctl.start_session(with_bots(1), None).unwrap();

    let before = ctl.snapshot();
    assert_eq!(ctl.toggle_keep(ME, 0), Err(Rejection::NoRollYet));
    assert_eq!(ctl.select_category(ME, Category::Choice), Err(Rejection::NoRollYet));
    assert_eq!(ctl.confirm_zero_score(ME), Err(Rejection::WrongState("rolling")));
    assert_eq!(ctl.cancel_zero_score(ME), Err(Rejection::WrongState("rolling")));
    assert_eq!(
        ctl.roll(PlayerId::new(1)),
        Err(Rejection::NotYourTurn { actor: PlayerId::new(1), active: ME })
    );
    assert_eq!(
        ctl.select_category_named(ME, "Bogus"),
        Err(Rejection::UnknownCategory("Bogus".to_string()))
    );
    assert_eq!(ctl.snapshot(), before);

    for _ in 0..MAX_ROLLS {
        ctl.roll(ME).unwrap();
    }
    let exhausted = ctl.snapshot();
    assert_eq!(ctl.roll(ME), Err(Rejection::RollsExhausted));
    assert_eq!(ctl.toggle_keep(ME, 1), Err(Rejection::RollsExhausted));
    assert_eq!(ctl.snapshot(), exhausted);
}

#[test]
fn test_recorded_category_is_rejected() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    ctl.start_session(solo(), None).unwrap();

    ctl.roll(ME).unwrap();
    assert!(matches!(
        ctl.select_category(ME, Category::Choice),
        Ok(Selection::Committed { .. })
    ));

    ctl.roll(ME).unwrap();
    assert_eq!(ctl.snapshot().potential(Category::Choice), None);
    assert_eq!(
        ctl.select_category(ME, Category::Choice),
        Err(Rejection::CategoryTaken(Category::Choice))
    );
}

#[test]
fn test_kept_dice_survive_rolls() {
    let mut ctl = TurnController::new(EngineConfig::instant().with_seed(3));
    ctl.start_session(solo(), None).unwrap();

    ctl.roll(ME).unwrap();
    assert_eq!(ctl.toggle_keep(ME, 0), Ok(true));
    assert_eq!(ctl.toggle_keep(ME, 3), Ok(true));
    let held = *ctl.snapshot().dice.faces();

    ctl.roll(ME).unwrap();
    ctl.roll(ME).unwrap();
    let after = *ctl.snapshot().dice.faces();
    assert_eq!(after[0], held[0]);
    assert_eq!(after[3], held[3]);
    assert!(ctl.snapshot().dice.is_kept(3));
}

#[test]
fn test_roll_in_progress_blocks_commands() {
    let mut ctl = TurnController::new(EngineConfig::default());
    ctl.start_session(solo(), None).unwrap();

    ctl.roll(ME).unwrap();
    let snap = ctl.snapshot();
    assert!(snap.rolling);
    assert!(snap.action_pending);
    assert_eq!(snap.rolls_left, MAX_ROLLS);
    assert!(snap.potentials.is_empty());
    assert_eq!(ctl.roll(ME), Err(Rejection::ActionPending));
    assert_eq!(ctl.toggle_keep(ME, 0), Err(Rejection::ActionPending));

    assert_eq!(ctl.advance(ms(999)), 0);
    assert!(ctl.snapshot().rolling);

    assert_eq!(ctl.advance(ms(1)), 1);
    let snap = ctl.snapshot();
    assert!(!snap.rolling);
    assert_eq!(snap.rolls_left, MAX_ROLLS - 1);
    assert_eq!(snap.potentials.len(), CATEGORY_COUNT);
    assert!(ctl
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::DiceRolled { rolls_left: 2, .. })));
}

#[test]
fn test_advance_to_the_end_of_time() {
    let mut ctl = TurnController::new(EngineConfig::default());
    ctl.start_session(solo(), None).unwrap();

    ctl.roll(ME).unwrap();
    assert_eq!(ctl.advance(ms(1_000)), 1);
    assert_eq!(ctl.advance(Duration::MAX), 0);

    // With the clock pinned at the limit, later rolls still land.
    ctl.roll(ME).unwrap();
    assert!(ctl.snapshot().rolling);
    assert_eq!(ctl.advance(Duration::MAX), 1);
    let snap = ctl.snapshot();
    assert!(!snap.rolling);
    assert_eq!(snap.rolls_left, MAX_ROLLS - 2);
}

#[test]
fn test_reveal_then_bot_thinking() {
    let mut ctl = TurnController::new(EngineConfig::default());
    ctl.start_session(with_bots(1), None).unwrap();

    ctl.roll(ME).unwrap();
    ctl.advance(ms(1_000));
    ctl.select_category(ME, Category::Choice).unwrap();

    // The score is recorded at once; the turn passes after the reveal.
    assert_eq!(ctl.state(), EngineState::Committing);
    assert!(ctl.snapshot().seats[0].card.is_recorded(Category::Choice));
    assert_eq!(ctl.snapshot().active, Some(ME));
    assert_eq!(ctl.roll(ME), Err(Rejection::ActionPending));

    ctl.advance(ms(2_000));
    assert_eq!(ctl.state(), EngineState::Rolling);
    assert_eq!(ctl.snapshot().active, Some(PlayerId::new(1)));
    assert_eq!(ctl.time_until_next(), Some(ms(1_500)));

    // Bot: think 1.5s, roll for 1s, three times, then think 2s and select.
    ctl.advance(ms(1_500 + 1_000));
    assert_eq!(ctl.snapshot().rolls_left, 2);
    ctl.advance(ms(2 * 2_500 + 2_000));
    assert_eq!(ctl.state(), EngineState::Committing);
    assert_eq!(ctl.snapshot().seats[1].card.recorded_count(), 1);

    ctl.advance(ms(2_000));
    assert_eq!(ctl.snapshot().active, Some(ME));
    assert_eq!(ctl.time_until_next(), None);
}

#[test]
fn test_teardown_cancels_bot_timer() {
    let mut ctl = TurnController::new(EngineConfig::default());
    let bot_first = vec![
        Participant::bot("bot-1", "Warrior-1"),
        Participant::human("me", "Guest").as_host(),
    ];
    ctl.start_session(bot_first, None).unwrap();
    assert!(ctl.is_action_pending());

    // Restart with a human in the first seat before the bot acts.
    ctl.advance(ms(1_000));
    ctl.start_session(solo(), None).unwrap();
    assert!(!ctl.is_action_pending());

    ctl.advance(ms(60_000));
    assert!(ctl
        .drain_events()
        .iter()
        .all(|e| !matches!(e, GameEvent::DiceRolled { .. })));
    assert_eq!(ctl.snapshot().rolls_left, MAX_ROLLS);
    assert_eq!(ctl.snapshot().seats.len(), 1);
}

#[test]
fn test_starting_seat_and_validation() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    assert!(matches!(
        ctl.start_session(vec![], None),
        Err(Rejection::InvalidParticipants(_))
    ));

    ctl.start_session(with_bots(2), Some(PlayerId::new(2))).unwrap();
    let events = ctl.drain_events();
    assert!(matches!(
        events.first(),
        Some(GameEvent::TurnStarted { turn: 1, seat, .. }) if *seat == PlayerId::new(2)
    ));

    // An invalid restart leaves the running session alone.
    assert_eq!(
        ctl.start_session(with_bots(2), Some(PlayerId::new(3))),
        Err(Rejection::StartingSeatOutOfRange(PlayerId::new(3)))
    );
    assert_eq!(ctl.snapshot().active, Some(PlayerId::new(2)));
}

#[test]
fn test_turn_summary_event() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    ctl.start_session(solo(), None).unwrap();
    ctl.roll(ME).unwrap();
    let Ok(Selection::Committed { score }) = ctl.select_category(ME, Category::Choice) else {
        panic!("choice always scores");
    };

    let summary = ctl.drain_events().into_iter().find_map(|e| match e {
        GameEvent::TurnEnded { summary, category, .. } => Some((summary, category)),
        _ => None,
    });
    assert_eq!(
        summary,
        Some((format!("Guest recorded {score} in Choice."), Category::Choice))
    );
}

#[test]
fn test_snapshot_serializes() {
    let mut ctl = TurnController::new(EngineConfig::instant());
    ctl.start_session(with_bots(1), None).unwrap();
    ctl.roll(ME).unwrap();

    let snap = ctl.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: yacht_dice::TableSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
}
