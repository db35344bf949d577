//! Paper Rush headless runner
//!
//! Plays a session with the autoplay bot at a fixed 60 Hz clock and prints
//! the summary as JSON. Useful for balance passes and replaying seeds.

use std::path::PathBuf;

use clap::Parser;

use paper_rush::sim::{GameContext, Viewport, autoplay_input, tick};
use paper_rush::{GameEvent, Millis, Tuning};

const TICK_MS: Millis = 16;

#[derive(Debug, Parser)]
#[command(name = "paper-rush")]
#[command(about = "Run a headless Paper Rush session with the autoplay bot")]
struct Cli {
    /// Session seed (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Session length in seconds
    #[arg(long, default_value_t = 60)]
    seconds: u64,
    /// JSON balance file
    #[arg(long)]
    tuning: Option<PathBuf>,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
    /// Print the default tuning as JSON and exit
    #[arg(long, default_value_t = false)]
    dump_tuning: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if cli.dump_tuning {
        println!("{}", Tuning::default().to_json());
        return;
    }

    let tuning = cli
        .tuning
        .as_deref()
        .map(Tuning::load)
        .unwrap_or_default();
    let seed = cli.seed.unwrap_or_else(rand::random);
    let viewport = Viewport::new(cli.width, cli.height);

    let mut ctx = GameContext::with_tuning(viewport, seed, 0, tuning);
    let end = cli.seconds * 1000;
    let mut now = 0;
    while now <= end {
        let input = autoplay_input(&ctx);
        for event in tick(&mut ctx, now, &input) {
            match event {
                GameEvent::ComboBroken { previous } if previous >= 5 => {
                    log::info!("Combo of {} broken at {}ms", previous, now)
                }
                other => log::debug!("{}ms {:?}", now, other),
            }
        }
        now += TICK_MS;
    }

    let summary = ctx.teardown();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Failed to encode summary: {}", e);
            std::process::exit(1);
        }
    }
}
