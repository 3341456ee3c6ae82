//! Collision detection
//!
//! Everything in the game is an axis-aligned box centred on its position.
//! Boxes that only share an edge do not collide.

use glam::Vec2;

use super::state::{Obstacle, Player};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    /// Box of `size` centred at `center`
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x < reach.x && delta.y < reach.y
    }

    /// Point containment (edges inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        let delta = (point - self.center).abs();
        delta.x <= self.half_extents.x && delta.y <= self.half_extents.y
    }
}

/// Index of the first obstacle the player overlaps
pub fn find_collision(player: &Player, obstacles: &[Obstacle]) -> Option<usize> {
    let bounds = player.bounds();
    obstacles.iter().position(|o| bounds.overlaps(&o.bounds()))
}

/// True if the player overlaps any obstacle
pub fn collides(player: &Player, obstacles: &[Obstacle]) -> bool {
    find_collision(player, obstacles).is_some()
}
