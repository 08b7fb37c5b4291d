//! Seaweed Swimmer - a one-button arcade game through swaying seaweed
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fish physics, seaweed, scoring, events)
//! - `tuning`: Data-driven game balance
//! - `session`: Screen flow and the per-frame host loop
//! - `platform`: Input debouncing and frame timing
//! - `persistence`: Key-value storage for host records
//! - `highscores`, `challenge`, `settings`: Persisted player records
//! - `audio`, `ads`, `leaderboard`: Collaborators driven by simulation events

pub mod ads;
pub mod audio;
pub mod challenge;
pub mod highscores;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreKeeper};
pub use session::{GameObserver, Screen, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Host configuration constants
pub mod consts {
    /// Display refresh assumed by the headless runner
    pub const DEFAULT_FPS: f32 = 60.0;
    /// Frame cap per run for the headless runner (five minutes at 60 fps)
    pub const DEFAULT_MAX_FRAMES: u32 = 18_000;
    /// Save file inside the runner's save directory
    pub const SAVE_FILE_NAME: &str = "seaweed-swimmer.json";
}
