//! Per-frame simulation step
//!
//! Advances the world by one host frame: run activation, jump, score, difficulty,
//! fish integration, boundary check, then a single pass over the obstacles
//! (advance, collide, near miss), recycling and spawning.

use rand::Rng;

use super::collision::{
    fish_box, fish_obstacle_collision, gap_clearance, in_near_miss_window, out_of_bounds,
};
use super::events::{CollisionCause, GameEvent};
use super::state::{Bubble, Obstacle, RunPhase, SwayWave, World};
use crate::tuning::Tuning;

/// Bubbles wrap once this far above the top edge
const BUBBLE_WRAP_MARGIN: f32 = 20.0;

/// Input for a single step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInput {
    /// Real seconds since the previous step
    pub elapsed_secs: f32,
    /// At most one (already debounced) jump since the previous step
    pub jump: bool,
}

impl StepInput {
    pub fn new(elapsed_secs: f32, jump: bool) -> Self {
        Self { elapsed_secs, jump }
    }

    /// Elapsed seconds with garbage (NaN, negative, infinite) treated as no time
    pub fn real_secs(&self) -> f32 {
        if self.elapsed_secs.is_finite() && self.elapsed_secs > 0.0 {
            self.elapsed_secs
        } else {
            0.0
        }
    }

    /// Elapsed time in nominal frames, clamped to `max_dt_frames`
    pub fn dt_frames(&self, tuning: &Tuning) -> f32 {
        (self.real_secs() / tuning.nominal_frame_secs).min(tuning.max_dt_frames)
    }
}

/// Difficulty level for a score: one step per window, capped
pub fn difficulty_level(score: u32, tuning: &Tuning) -> u32 {
    let window = tuning.difficulty_window_secs.max(1);
    (score / window).saturating_add(1).min(tuning.max_level.max(1))
}

/// Jump and gravity scale at a difficulty level
pub fn speed_multiplier(level: u32, tuning: &Tuning) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * tuning.fish_speed_growth
}

/// Obstacle speed in px per nominal frame at a difficulty level
pub fn obstacle_speed(level: u32, tuning: &Tuning) -> f32 {
    tuning.base_obstacle_speed * (1.0 + level.saturating_sub(1) as f32 * tuning.speed_growth_per_level)
}

/// Advance the world by one host frame and return what happened.
///
/// A world that is not `Active` is left untouched, except that a jump on an
/// `Idle` world starts the run.
pub fn step<R: Rng + ?Sized>(
    world: &mut World,
    input: &StepInput,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match world.phase {
        RunPhase::Terminated => return events,
        RunPhase::Idle => {
            if input.jump {
                activate(world, tuning, rng, &mut events);
            }
            return events;
        }
        RunPhase::Active => {}
    }

    let dt = input.dt_frames(tuning);

    // Jump uses the level in effect before this frame's score update
    if input.jump {
        world.fish.vel = tuning.jump_impulse * speed_multiplier(world.difficulty_level, tuning);
        events.push(GameEvent::Jump);
    }

    update_score(world, input.real_secs(), tuning, &mut events);
    world.difficulty_level = difficulty_level(world.score, tuning);

    // Fish integration
    let was_out = out_of_bounds(world.fish.y, tuning);
    let mult = speed_multiplier(world.difficulty_level, tuning);
    let fish = &mut world.fish;
    fish.vel += tuning.gravity * mult * dt;
    fish.y += fish.vel * dt;
    fish.rotation = (fish.vel * tuning.rotation_gain).clamp(-tuning.max_tilt, tuning.max_tilt);

    if was_out || out_of_bounds(world.fish.y, tuning) {
        terminate(world, CollisionCause::Boundary, &mut events);
        return events;
    }

    advance_bubbles(world, tuning, rng, dt);

    // Obstacles: advance, collide, near miss
    let dx = obstacle_speed(world.difficulty_level, tuning) * dt;
    let fish = fish_box(world.fish.y, tuning);
    let mut hit = None;
    for obstacle in world.obstacles.iter_mut() {
        obstacle.x -= dx;

        if fish_obstacle_collision(&fish, obstacle, tuning) {
            hit = Some(obstacle.id);
            break;
        }

        if !obstacle.near_miss_triggered && in_near_miss_window(obstacle, tuning) {
            let clearance = gap_clearance(&fish, obstacle, tuning);
            if (0.0..tuning.near_miss_threshold).contains(&clearance) {
                obstacle.near_miss_triggered = true;
                events.push(GameEvent::NearMiss {
                    obstacle_id: obstacle.id,
                });
            }
        }
    }

    let despawn_x = tuning.despawn_x();
    world.obstacles.retain(|o| o.x >= despawn_x);

    if let Some(id) = hit {
        terminate(world, CollisionCause::Obstacle { id }, &mut events);
        return events;
    }

    if world
        .newest_obstacle()
        .is_none_or(|o| o.x < o.spawn_threshold)
    {
        spawn_obstacle(world, tuning, rng);
    }

    events
}

/// Start the run on the first jump
fn activate<R: Rng + ?Sized>(
    world: &mut World,
    tuning: &Tuning,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    world.phase = RunPhase::Active;
    world.elapsed_play_time = 0.0;
    world.score = 0;
    world.last_milestone = 0;
    world.difficulty_level = difficulty_level(0, tuning);

    world.fish.vel = tuning.jump_impulse * speed_multiplier(world.difficulty_level, tuning);
    world.fish.rotation =
        (world.fish.vel * tuning.rotation_gain).clamp(-tuning.max_tilt, tuning.max_tilt);

    if world.obstacles.is_empty() {
        spawn_obstacle(world, tuning, rng);
    }

    events.push(GameEvent::Jump);
    log::debug!("Run started");
}

fn terminate(world: &mut World, cause: CollisionCause, events: &mut Vec<GameEvent>) {
    world.phase = RunPhase::Terminated;
    log::debug!("Run over at score {} ({:?})", world.score, cause);
    events.push(GameEvent::Collision {
        score: world.score,
        cause,
    });
}

/// Accumulate play time, derive the integer score and announce milestones
fn update_score(world: &mut World, real_secs: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
    world.elapsed_play_time += f64::from(real_secs);
    // `as` saturates, so absurd play times cap at u32::MAX
    let score = world.elapsed_play_time.floor() as u32;
    if score <= world.score {
        return;
    }
    world.score = score;
    events.push(GameEvent::ScoreChanged { score });

    let interval = tuning.milestone_interval.max(1);
    while let Some(next) = world.last_milestone.checked_add(interval) {
        if next > score {
            break;
        }
        world.last_milestone = next;
        log::debug!("Milestone {}", next);
        events.push(GameEvent::Milestone { score: next });
    }
}

fn advance_bubbles<R: Rng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R, dt: f32) {
    for bubble in world.bubbles.iter_mut() {
        bubble.y -= bubble.speed * dt;
        if bubble.y < -BUBBLE_WRAP_MARGIN {
            *bubble = Bubble::random(rng, tuning, tuning.height + BUBBLE_WRAP_MARGIN);
        }
    }
}

/// Append a fresh obstacle at the leading edge with randomized gap and sway
pub fn spawn_obstacle<R: Rng + ?Sized>(world: &mut World, tuning: &Tuning, rng: &mut R) {
    let gap_center = rng.random_range(tuning.min_gap_center()..=tuning.max_gap_center());
    let spacing = rng.random_range(tuning.spawn_spacing.min..tuning.spawn_spacing.max);

    let waves = rng.random_range(1..=tuning.sway_waves_max.max(1));
    let sway = (0..waves)
        .map(|_| SwayWave {
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            angular_speed: rng
                .random_range(tuning.sway_angular_speed.min..tuning.sway_angular_speed.max),
            amplitude: rng.random_range(tuning.sway_amplitude.min..tuning.sway_amplitude.max),
        })
        .collect();

    let obstacle = Obstacle {
        id: world.next_obstacle_id(),
        x: tuning.spawn_x(),
        gap_center,
        spawn_threshold: tuning.width - spacing,
        sway,
        near_miss_triggered: false,
    };
    log::trace!(
        "Spawned obstacle {} gap={:.1} next<{:.1}",
        obstacle.id,
        obstacle.gap_center,
        obstacle.spawn_threshold
    );
    world.obstacles.push(obstacle);
}
