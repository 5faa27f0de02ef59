//! Dino Warfare headless demo
//!
//! Runs one autopilot session at the fixed tick rate without rendering and
//! logs what the UI and audio layers would have been told.
//!
//! Run with `--help` for the options.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use dino_warfare::consts::{SIM_DT, TICKS_PER_SECOND};
use dino_warfare::sim::{NotifyKind, SessionStatus, SoundCue};
use dino_warfare::{GameHooks, HighScores, PlayerProfile, Session, ShopCatalog, Tuning};

/// Hooks that forward everything to the log
#[derive(Default)]
struct LogHooks {
    cues: u64,
    game_over: bool,
}

impl GameHooks for LogHooks {
    fn on_notify(&mut self, message: &str, kind: NotifyKind) {
        log::info!("[{:?}] {}", kind, message);
    }

    fn on_sound_cue(&mut self, cue: SoundCue) {
        self.cues += 1;
        log::trace!("sound: {}", cue.as_str());
    }

    fn on_game_over(&mut self, score: u64, level: u32) {
        self.game_over = true;
        log::info!("GAME OVER - score {} at level {}", score, level);
    }
}

/// Headless autopilot run of Dino Warfare
#[derive(Parser, Debug)]
#[command(name = "dino-warfare", version, about)]
struct Args {
    /// Tuning JSON file (missing fields take their defaults)
    #[arg(long, value_name = "FILE")]
    tuning: Option<PathBuf>,

    /// Leaderboard JSON file, loaded before and saved after the run
    #[arg(long, value_name = "FILE")]
    scores: Option<PathBuf>,

    /// RNG seed for the run
    #[arg(long, default_value_t = 42, value_parser = clap::value_parser!(u64))]
    seed: u64,

    /// Stop after this many ticks if the run is still going
    #[arg(long, default_value_t = 10 * 60 * TICKS_PER_SECOND as u64, value_parser = clap::value_parser!(u64))]
    ticks: u64,

    /// Play with a subscribed profile
    #[arg(long)]
    subscribed: bool,
}

fn load_tuning(path: Option<&Path>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading tuning file {}", path.display()))?;
    Tuning::from_json(&json).with_context(|| format!("loading tuning from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let tuning = load_tuning(args.tuning.as_deref())?;

    let mut profile = PlayerProfile::new("Autopilot");
    if args.subscribed {
        profile = profile.subscribed();
    }
    let high_scores = args.scores.as_deref().map(HighScores::load).unwrap_or_default();

    log::info!("Dino Warfare (headless) starting, seed {}", args.seed);
    let mut session =
        Session::new(profile, tuning, ShopCatalog::default(), args.seed).with_high_scores(high_scores);
    session.set_autopilot(true);
    session.start();

    let mut hooks = LogHooks::default();
    for _ in 0..args.ticks {
        session.update(&mut hooks);
        if hooks.game_over {
            break;
        }
    }

    let state = session.state();
    if state.status != SessionStatus::GameOver {
        log::info!("Tick limit reached");
    }
    println!(
        "seed {}: score {}, coins {}, level {}, wave {}, {:.1}s simulated, {} sound cues",
        args.seed,
        state.economy.score,
        state.economy.coins,
        state.progression.level,
        state.progression.wave,
        state.time_ticks as f32 * SIM_DT,
        hooks.cues,
    );

    println!("\nHigh scores:");
    for (rank, entry) in session.high_scores().entries.iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>8}  level {:>2}  wave {:>3}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.wave
        );
    }

    if let Some(path) = args.scores.as_deref() {
        session
            .high_scores()
            .save(path)
            .with_context(|| format!("saving high scores to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults_and_flags() {
        let args = Args::try_parse_from(["dino-warfare"]).unwrap();
        assert_eq!(args.seed, 42);
        assert_eq!(args.ticks, 36_000);
        assert!(!args.subscribed);
        assert!(args.tuning.is_none());

        let args = Args::try_parse_from([
            "dino-warfare",
            "--seed",
            "7",
            "--ticks",
            "600",
            "--subscribed",
            "--tuning",
            "balance.json",
        ])
        .unwrap();
        assert_eq!(args.seed, 7);
        assert_eq!(args.ticks, 600);
        assert!(args.subscribed);
        assert_eq!(args.tuning.as_deref(), Some(Path::new("balance.json")));

        assert!(Args::try_parse_from(["dino-warfare", "--seed", "-1"]).is_err());
    }

    #[test]
    fn test_missing_tuning_file_reports_path() {
        let err = load_tuning(Some(Path::new("/nonexistent/tuning.json"))).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/tuning.json"));
        assert_eq!(load_tuning(None).unwrap(), Tuning::default());
    }
}
