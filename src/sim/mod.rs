//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `StepInput` only
//! - Seeded RNG only, passed in by the caller
//! - Obstacles kept in spawn order
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod state;
pub mod tick;

pub use collision::{Aabb, fish_box, fish_obstacle_collision, gap_clearance, out_of_bounds};
pub use events::{CollisionCause, GameEvent};
pub use state::{Bubble, Fish, Obstacle, RunPhase, SwayWave, World, new_rng};
pub use tick::{StepInput, difficulty_level, obstacle_speed, spawn_obstacle, speed_multiplier, step};
