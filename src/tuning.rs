//! Data-driven game balance
//!
//! Every magnitude the simulation uses lives here so that balance changes never
//! touch `sim`. Units are canvas pixels and nominal frames (1/60 s), y grows
//! downward.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Inclusive-exclusive range used for randomized spawn values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

/// Simulation balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    /// Duration of one nominal frame in seconds
    pub nominal_frame_secs: f32,
    /// Largest normalized delta a single step integrates
    pub max_dt_frames: f32,

    // === Play area ===
    pub width: f32,
    pub height: f32,

    // === Fish ===
    /// Fixed horizontal position of the fish centre
    pub fish_x: f32,
    /// Side length of the fish collision box
    pub fish_size: f32,
    /// Vertical position held while idle
    pub fish_rest_y: f32,
    /// Downward acceleration, px per frame²
    pub gravity: f32,
    /// Velocity set by a jump (negative = upward)
    pub jump_impulse: f32,
    /// Jump and gravity multiplier growth per difficulty level
    pub fish_speed_growth: f32,
    pub rotation_gain: f32,
    pub max_tilt: f32,

    // === Obstacles ===
    /// Visual width of a seaweed pair
    pub obstacle_width: f32,
    /// Half-width of the collision band around the obstacle centre
    pub hitbox_half_width: f32,
    /// Vertical height of the passable gap
    pub gap_height: f32,
    /// Minimum distance between the gap and the top/bottom edge
    pub gap_margin: f32,
    /// Obstacle speed at level 1, px per frame
    pub base_obstacle_speed: f32,
    /// Fractional obstacle speed growth per level
    pub speed_growth_per_level: f32,
    /// Distance the newest obstacle travels before the next spawns
    pub spawn_spacing: SpawnRange,

    // === Sway (render only) ===
    pub sway_waves_max: u8,
    pub sway_angular_speed: SpawnRange,
    pub sway_amplitude: SpawnRange,

    // === Near miss ===
    /// Horizontal distance from the fish inside which near misses are checked
    pub near_miss_window: f32,
    /// Clearance below which a pass counts as a near miss
    pub near_miss_threshold: f32,

    // === Scoring ===
    pub difficulty_window_secs: u32,
    pub max_level: u32,
    pub milestone_interval: u32,

    // === Decor ===
    pub bubble_count: usize,
    pub bubble_radius: SpawnRange,
    pub bubble_speed: SpawnRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            nominal_frame_secs: 1.0 / 60.0,
            max_dt_frames: 3.0,

            width: 800.0,
            height: 600.0,

            fish_x: 150.0,
            fish_size: 32.0,
            fish_rest_y: 300.0,
            gravity: 0.32,
            jump_impulse: -8.8,
            fish_speed_growth: 0.05,
            rotation_gain: 0.075,
            max_tilt: 0.5,

            obstacle_width: 60.0,
            hitbox_half_width: 15.0,
            gap_height: 160.0,
            gap_margin: 80.0,
            base_obstacle_speed: 3.2,
            speed_growth_per_level: 0.3,
            spawn_spacing: SpawnRange::new(350.0, 550.0),

            sway_waves_max: 3,
            sway_angular_speed: SpawnRange::new(0.8, 1.6),
            sway_amplitude: SpawnRange::new(12.0, 24.0),

            near_miss_window: 40.0,
            near_miss_threshold: 20.0,

            difficulty_window_secs: 20,
            max_level: 20,
            milestone_interval: 100,

            bubble_count: 8,
            bubble_radius: SpawnRange::new(4.0, 12.0),
            bubble_speed: SpawnRange::new(1.0, 3.0),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take their default.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        let problems = tuning.validate();
        if !problems.is_empty() {
            return Err(TuningError::Invalid(problems));
        }
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&data)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Lowest admissible gap centre
    pub fn min_gap_center(&self) -> f32 {
        self.gap_margin + self.gap_height / 2.0
    }

    /// Highest admissible gap centre
    pub fn max_gap_center(&self) -> f32 {
        self.height - self.gap_margin - self.gap_height / 2.0
    }

    /// Obstacles are created here, just past the leading edge
    pub fn spawn_x(&self) -> f32 {
        self.width + self.obstacle_width
    }

    /// Obstacles left of this are removed
    pub fn despawn_x(&self) -> f32 {
        -self.obstacle_width
    }

    /// Returns a list of problems; empty means the tuning is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !(self.nominal_frame_secs > 0.0) {
            problems.push("nominal_frame_secs must be > 0".into());
        }
        if !(self.max_dt_frames >= 1.0) {
            problems.push("max_dt_frames must be >= 1".into());
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            problems.push("play area must have positive size".into());
        }
        if !(self.fish_x > 0.0 && self.fish_x < self.width) {
            problems.push("fish_x must lie inside the play area".into());
        }
        if !(self.fish_rest_y > 0.0 && self.fish_rest_y < self.height) {
            problems.push("fish_rest_y must lie inside the play area".into());
        }
        if !(self.fish_size > 0.0) {
            problems.push("fish_size must be > 0".into());
        }
        if !(self.jump_impulse < 0.0) {
            problems.push("jump_impulse must be negative (upward)".into());
        }
        if !(self.gravity > 0.0) {
            problems.push("gravity must be > 0".into());
        }
        if !(self.gap_margin > 0.0) {
            problems.push("gap_margin must be > 0 so the gap fits strictly inside".into());
        }
        if self.min_gap_center() > self.max_gap_center() {
            problems.push(format!(
                "gap_height {} with margin {} does not fit in height {}",
                self.gap_height, self.gap_margin, self.height
            ));
        }
        if !(self.hitbox_half_width > 0.0 && self.hitbox_half_width <= self.obstacle_width / 2.0)
        {
            problems.push("hitbox_half_width must be in (0, obstacle_width / 2]".into());
        }
        if !(self.base_obstacle_speed > 0.0) {
            problems.push("base_obstacle_speed must be > 0".into());
        }
        if !self.spawn_spacing.is_valid() || self.spawn_spacing.min <= 0.0 {
            problems.push("spawn_spacing must be a positive, non-empty range".into());
        }
        if self.sway_waves_max == 0 {
            problems.push("sway_waves_max must be >= 1".into());
        }
        if !self.sway_angular_speed.is_valid() || !self.sway_amplitude.is_valid() {
            problems.push("sway ranges must be non-empty".into());
        }
        if !self.bubble_radius.is_valid() || !self.bubble_speed.is_valid() {
            problems.push("bubble ranges must be non-empty".into());
        }
        if self.difficulty_window_secs == 0 {
            problems.push("difficulty_window_secs must be >= 1".into());
        }
        if self.max_level == 0 {
            problems.push("max_level must be >= 1".into());
        }
        if self.milestone_interval == 0 {
            problems.push("milestone_interval must be >= 1".into());
        }

        problems
    }
}
