//! Headless table runner.
//! Plays a full all-bot game on the virtual clock and prints the settlement.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;
use yacht_dice::{
    settle, EngineConfig, EngineState, FullHouseRule, GameEvent, Participant, SettlementMode,
    TurnController,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    WinnerTakesAll,
    LoserPaysAll,
}

impl From<Mode> for SettlementMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::WinnerTakesAll => SettlementMode::WinnerTakesAll,
            Mode::LoserPaysAll => SettlementMode::LoserPaysAll,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless Yacht dice table")]
struct Args {
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(2..=8))]
    players: u8,

    #[arg(short, long, default_value = "1000")]
    bet: u64,

    #[arg(short, long, value_enum, default_value = "winner-takes-all")]
    mode: Mode,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Require a true 3+2 split for FullHouse.
    #[arg(long)]
    classic_full_house: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let rule = if args.classic_full_house {
        FullHouseRule::Strict
    } else {
        FullHouseRule::FiveOfAKindQualifies
    };
    let config = EngineConfig::default()
        .with_seed(args.seed)
        .with_full_house_rule(rule);
    config.validate().context("invalid engine configuration")?;

    let participants: Vec<Participant> = (0..args.players)
        .map(|i| {
            let bot = Participant::bot(format!("bot-{i}"), format!("Warrior-{}", i + 1));
            if i == 0 {
                bot.as_host()
            } else {
                bot
            }
        })
        .collect();

    let mut table = TurnController::new(config);
    table
        .start_session(participants.clone(), None)
        .context("failed to seat participants")?;

    let mut final_scores = None;
    while table.advance_to_next() {
        for event in table.drain_events() {
            match event {
                GameEvent::TurnEnded { summary, .. } => info!("{summary}"),
                GameEvent::GameOver { final_scores: scores } => final_scores = Some(scores),
                _ => {}
            }
        }
    }

    if table.state() != EngineState::GameOver {
        bail!("table stalled in state {}", table.state().describe());
    }
    let final_scores = final_scores.context("game ended without final scores")?;
    info!(elapsed_ms = table.now().as_millis() as u64, "game finished");

    let result = settle(&participants, &final_scores, args.bet, args.mode.into())?;
    println!("{}", result.reason);
    for payout in &result.payouts {
        let score = final_scores.get(&payout.participant).copied().unwrap_or(0);
        println!("{:<12} {:>4} {:>+8}", payout.name, score, payout.amount);
    }
    Ok(())
}
