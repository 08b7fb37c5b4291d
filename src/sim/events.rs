//! Discrete events emitted by a simulation step
//!
//! The host forwards these to audio, ads and persistence collaborators.

use serde::{Deserialize, Serialize};

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    /// Fish left the top or bottom of the play area
    Boundary,
    /// Fish touched a seaweed barrier
    Obstacle { id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A jump impulse was applied
    Jump,
    /// Integer score increased
    ScoreChanged { score: u32 },
    /// Score crossed a milestone boundary (announced once per boundary)
    Milestone { score: u32 },
    /// Fish squeezed past a barrier edge without touching it
    NearMiss { obstacle_id: u32 },
    /// Run terminated; carries the final score
    Collision { score: u32, cause: CollisionCause },
}

impl GameEvent {
    pub fn is_collision(&self) -> bool {
        matches!(self, GameEvent::Collision { .. })
    }
}
