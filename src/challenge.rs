//! Daily challenge and streak bookkeeping
//!
//! Each day has one target score. Completing today's target bumps tomorrow's by
//! one step and keeps the streak alive; missing a day repeats the target and
//! resets the streak. Days are the player's local calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Targets are multiples of this
pub const TARGET_STEP: u32 = 20;
/// Target ceiling
pub const MAX_TARGET: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub day: NaiveDate,
    /// Score to reach today
    pub target: u32,
    pub completed: bool,
    /// Streak including today (set when today's target is reached)
    pub streak: u32,
    /// Streak carried in from previous days
    pub last_streak: u32,
}

impl DailyChallenge {
    pub const STORAGE_KEY: &'static str = "seaweedSwimmerDailyChallenge";

    /// First-ever challenge
    pub fn fresh(day: NaiveDate) -> Self {
        Self {
            day,
            target: TARGET_STEP,
            completed: false,
            streak: 0,
            last_streak: 0,
        }
    }

    /// Whether a target belongs to the current target ladder
    pub fn is_valid_target(target: u32) -> bool {
        (TARGET_STEP..=MAX_TARGET).contains(&target) && target % TARGET_STEP == 0
    }

    /// Challenge for `today` given this (older) one
    pub fn roll_over(&self, today: NaiveDate) -> Self {
        if !Self::is_valid_target(self.target) {
            return Self::fresh(today);
        }
        if today == self.day {
            return *self;
        }
        if self.completed {
            Self {
                day: today,
                target: (self.target + TARGET_STEP).min(MAX_TARGET),
                completed: false,
                streak: 0,
                last_streak: self.streak,
            }
        } else {
            Self {
                day: today,
                target: self.target,
                completed: false,
                streak: 0,
                last_streak: 0,
            }
        }
    }

    /// Apply a final score. Returns true if this run completed the challenge.
    pub fn complete_with(&mut self, score: u32) -> bool {
        if self.completed || score < self.target {
            return false;
        }
        self.completed = true;
        self.streak = self.last_streak + 1;
        log::info!("Daily challenge {} reached, streak {}", self.target, self.streak);
        true
    }

    /// Streak to show the player
    pub fn display_streak(&self) -> u32 {
        if self.completed {
            self.streak
        } else {
            self.last_streak
        }
    }

    /// Load the stored challenge and roll it forward to `today`, saving the result
    pub fn load_for_day(store: &mut dyn KeyValueStore, today: NaiveDate) -> Self {
        let challenge = match load_json::<Self>(store, Self::STORAGE_KEY) {
            Some(stored) => stored.roll_over(today),
            None => Self::fresh(today),
        };
        challenge.save(store);
        challenge
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Err(e) = save_json(store, Self::STORAGE_KEY, self) {
            log::warn!("Failed to save daily challenge: {e}");
        }
    }
}
