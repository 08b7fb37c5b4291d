//! Collision and near-miss detection
//!
//! Both the fish and the seaweed are axis-aligned boxes. The seaweed hitbox is
//! a band narrower than its drawn width and ignores the render-time sway, so a
//! frond that visually brushes the fish does not end the run.

use glam::Vec2;

use super::state::Obstacle;
use crate::tuning::Tuning;

/// Axis-aligned box, y grows downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Open-interval horizontal overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.max.y > other.min.y && self.min.y < other.max.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }
}

/// Collision box of a fish centred at `fish_y`
pub fn fish_box(fish_y: f32, tuning: &Tuning) -> Aabb {
    let half = tuning.fish_size / 2.0;
    Aabb::from_center(Vec2::new(tuning.fish_x, fish_y), Vec2::splat(half))
}

/// Hitbox bands of an obstacle: (upper barrier, lower barrier)
pub fn obstacle_boxes(obstacle: &Obstacle, tuning: &Tuning) -> (Aabb, Aabb) {
    let left = obstacle.x - tuning.hitbox_half_width;
    let right = obstacle.x + tuning.hitbox_half_width;
    let upper = Aabb::new(
        Vec2::new(left, f32::NEG_INFINITY),
        Vec2::new(right, obstacle.gap_top(tuning.gap_height)),
    );
    let lower = Aabb::new(
        Vec2::new(left, obstacle.gap_bottom(tuning.gap_height)),
        Vec2::new(right, f32::INFINITY),
    );
    (upper, lower)
}

/// True if the fish overlaps the obstacle band horizontally and pokes out of the gap
pub fn fish_obstacle_collision(fish: &Aabb, obstacle: &Obstacle, tuning: &Tuning) -> bool {
    let (upper, lower) = obstacle_boxes(obstacle, tuning);
    if !fish.overlaps_x(&upper) {
        return false;
    }
    fish.top() < upper.bottom() || fish.bottom() > lower.top()
}

/// Distance from the fish to the nearer barrier edge of the gap.
/// Negative when the fish pokes out of the gap.
pub fn gap_clearance(fish: &Aabb, obstacle: &Obstacle, tuning: &Tuning) -> f32 {
    let from_top = fish.top() - obstacle.gap_top(tuning.gap_height);
    let from_bottom = obstacle.gap_bottom(tuning.gap_height) - fish.bottom();
    from_top.min(from_bottom)
}

/// Whether the obstacle is horizontally inside the near-miss window
#[inline]
pub fn in_near_miss_window(obstacle: &Obstacle, tuning: &Tuning) -> bool {
    (tuning.fish_x - obstacle.x).abs() < tuning.near_miss_window
}

/// Fish centre outside the vertical play area
#[inline]
pub fn out_of_bounds(fish_y: f32, tuning: &Tuning) -> bool {
    !(0.0..=tuning.height).contains(&fish_y)
}
