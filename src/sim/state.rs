//! World state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives on `World`. The host owns
//! the current value and hands it to `tick::step` once per frame.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Phase of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for the first jump; nothing moves
    #[default]
    Idle,
    /// Physics, spawning and scoring are live
    Active,
    /// Run ended by a collision; only a fresh world leaves this phase
    Terminated,
}

/// The player's fish. Horizontal position is fixed by tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fish {
    /// Centre y (px, downward)
    pub y: f32,
    /// px per nominal frame, negative = rising
    pub vel: f32,
    /// Tilt in radians
    pub rotation: f32,
}

impl Fish {
    pub fn at_rest(tuning: &Tuning) -> Self {
        Self {
            y: tuning.fish_rest_y,
            vel: 0.0,
            rotation: 0.0,
        }
    }
}

/// One sinusoid of the seaweed's visual sway
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwayWave {
    pub phase: f32,
    /// Radians per second
    pub angular_speed: f32,
    /// Peak horizontal displacement (px)
    pub amplitude: f32,
}

/// An upper and lower seaweed barrier with a gap between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Centre x (px)
    pub x: f32,
    /// Centre y of the gap, fixed at creation
    pub gap_center: f32,
    /// The next obstacle spawns once this one's x drops below this value
    pub spawn_threshold: f32,
    pub sway: Vec<SwayWave>,
    /// Set at most once per obstacle
    pub near_miss_triggered: bool,
}

impl Obstacle {
    /// Lower edge of the upper barrier
    #[inline]
    pub fn gap_top(&self, gap_height: f32) -> f32 {
        self.gap_center - gap_height / 2.0
    }

    /// Upper edge of the lower barrier
    #[inline]
    pub fn gap_bottom(&self, gap_height: f32) -> f32 {
        self.gap_center + gap_height / 2.0
    }

    /// Horizontal render displacement at `time_secs`. Collision ignores it.
    pub fn sway_offset(&self, time_secs: f32) -> f32 {
        self.sway
            .iter()
            .map(|w| w.amplitude * (time_secs * w.angular_speed + w.phase).sin())
            .sum()
    }
}

/// Decorative rising bubble (not gameplay-affecting)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bubble {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
}

impl Bubble {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, y: f32) -> Self {
        Self {
            x: rng.random_range(0.0..tuning.width),
            y,
            radius: rng.random_range(tuning.bubble_radius.min..tuning.bubble_radius.max),
            speed: rng.random_range(tuning.bubble_speed.min..tuning.bubble_speed.max),
        }
    }
}

/// Complete simulated state at an instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub phase: RunPhase,
    pub fish: Fish,
    /// Spawn order = left-to-right order
    pub obstacles: Vec<Obstacle>,
    /// Seconds since the first jump of this run
    pub elapsed_play_time: f64,
    pub score: u32,
    /// Derived from `score` every step
    pub difficulty_level: u32,
    /// Highest milestone already announced this run
    pub last_milestone: u32,
    /// Visual particles
    #[serde(skip)]
    pub bubbles: Vec<Bubble>,
    next_id: u32,
}

impl World {
    /// Fresh idle world: fish at rest, no obstacles, score 0
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: RunPhase::Idle,
            fish: Fish::at_rest(tuning),
            obstacles: Vec::new(),
            elapsed_play_time: 0.0,
            score: 0,
            difficulty_level: 1,
            last_milestone: 0,
            bubbles: Vec::new(),
            next_id: 1,
        }
    }

    /// Idle world with a scattered bubble field for the backdrop
    pub fn with_bubbles<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let mut world = Self::new(tuning);
        world.bubbles = (0..tuning.bubble_count)
            .map(|_| {
                let y = rng.random_range(0.0..tuning.height);
                Bubble::random(rng, tuning, y)
            })
            .collect();
        world
    }

    #[inline]
    pub fn run_active(&self) -> bool {
        self.phase == RunPhase::Active
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Most recently spawned obstacle
    pub fn newest_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.last()
    }
}

/// Seeded RNG for obstacle generation
pub fn new_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
