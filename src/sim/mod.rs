//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - One call to [`tick`] per frame, movement is per tick
//! - Randomness only through an injected [`RandomSource`](crate::random::RandomSource)
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{Aabb, collides, find_collision};
pub use obstacles::{advance_obstacles, spawn_interval, spawn_obstacle, update_spawner};
pub use state::{GamePhase, GameState, Obstacle, ObstacleKind, Player, Session, Snapshot};
pub use tick::{TickInput, TickOutput, tick};
