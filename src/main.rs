//! Seaweed Swimmer headless runner
//!
//! Plays runs with a simple autopilot against the real session loop, so
//! tuning files can be tried out without a renderer.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use clap::Parser;

use seaweed_swimmer::ads::{AdScheduler, NullAds};
use seaweed_swimmer::audio::{FeedbackRouter, NullAudio, NullHaptics};
use seaweed_swimmer::consts::*;
use seaweed_swimmer::persistence::{FileStore, KeyValueStore, MemoryStore};
use seaweed_swimmer::platform::FrameClock;
use seaweed_swimmer::sim::{GameEvent, RunPhase, World};
use seaweed_swimmer::{ScoreKeeper, Session, Settings, Tuning};

#[derive(Parser, Debug)]
#[command(version, about = "Play Seaweed Swimmer headlessly with an autopilot")]
struct Args {
    /// RNG seed for obstacle layout
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frame cap per run
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    frames: u32,
    /// Simulated display refresh rate
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f32,
    /// JSON tuning file (defaults are used for missing fields)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Directory for high scores and settings (in-memory when omitted)
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Number of runs to play
    #[arg(long, default_value_t = 1)]
    runs: u32,
}

/// Swim up whenever the fish sinks below the next gap
fn autopilot(world: &World, tuning: &Tuning) -> bool {
    if world.phase != RunPhase::Active {
        return true;
    }
    let fish_left = tuning.fish_x - tuning.fish_size / 2.0;
    let target = world
        .obstacles
        .iter()
        .find(|o| o.x + tuning.hitbox_half_width >= fish_left)
        .map_or(tuning.fish_rest_y, |o| o.gap_center);
    world.fish.y > target + tuning.fish_size / 2.0 && world.fish.vel >= 0.0
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if !(args.fps > 0.0) {
        bail!("--fps must be positive");
    }

    let tuning = match &args.tuning {
        Some(path) => Tuning::load_from_file(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };

    let store: Rc<RefCell<dyn KeyValueStore>> = match &args.save_dir {
        Some(dir) => {
            let path = dir.join(SAVE_FILE_NAME);
            Rc::new(RefCell::new(
                FileStore::open(&path).with_context(|| format!("opening {}", path.display()))?,
            ))
        }
        None => Rc::new(RefCell::new(MemoryStore::new())),
    };

    let settings = Settings::load(&*store.borrow());
    let keeper = Rc::new(RefCell::new(ScoreKeeper::new(Box::new(store.clone()))));

    let mut session = Session::new(tuning.clone(), args.seed);
    session.add_observer(Box::new(keeper.clone()));
    session.add_observer(Box::new(FeedbackRouter::new(NullAudio, NullHaptics, settings)));
    session.add_observer(Box::new(AdScheduler::new(NullAds, Box::new(store.clone()))));

    log::info!("Seaweed Swimmer (headless) starting, seed {}", args.seed);

    let frame_secs = 1.0 / f64::from(args.fps);
    let mut clock = FrameClock::new();
    let mut now = 0.0_f64;
    clock.tick(now);

    for run in 1..=args.runs {
        session.start_game();
        let mut near_misses = 0;
        let mut frames = 0;

        while frames < args.frames {
            if autopilot(session.world(), &tuning) {
                session.press_jump(now);
            }
            now += frame_secs;
            for event in session.frame(clock.tick(now)) {
                match event {
                    GameEvent::NearMiss { .. } => near_misses += 1,
                    GameEvent::Milestone { score } => log::info!("Run {run}: reached {score}"),
                    _ => {}
                }
            }
            frames += 1;
            if session.world().phase == RunPhase::Terminated {
                break;
            }
        }

        let world = session.world();
        let outcome = if world.phase == RunPhase::Terminated {
            "crashed"
        } else {
            "frame cap"
        };
        println!(
            "run {run}: score {} ({outcome}) level {} near misses {near_misses} frames {frames}",
            world.score, world.difficulty_level
        );
    }

    let keeper = keeper.borrow();
    println!("best: {}", keeper.best());
    for (i, entry) in keeper.scores().entries.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, entry.score);
    }
    let challenge = keeper.challenge();
    println!(
        "daily challenge: {} ({}), streak {}",
        challenge.target,
        if challenge.completed { "done" } else { "open" },
        challenge.display_streak()
    );

    Ok(())
}
