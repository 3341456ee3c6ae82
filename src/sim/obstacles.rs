//! Obstacle spawning, scrolling and recycling

use glam::Vec2;

use super::state::{Obstacle, ObstacleKind};
use crate::config::GameConfig;
use crate::random::RandomSource;

/// Ticks between spawns at the given speed; shrinks with speed down to a floor
pub fn spawn_interval(speed: f32, config: &GameConfig) -> f32 {
    let interval =
        config.base_spawn_interval - (speed - config.start_speed) * config.spawn_interval_per_speed;
    interval.max(config.min_spawn_interval)
}

/// New obstacle at a random x inside the lane, just above the screen
pub fn spawn_obstacle(config: &GameConfig, rng: &mut dyn RandomSource) -> Obstacle {
    let lane = config.lane();
    let low = (lane.left + config.spawn_margin).ceil() as i32;
    let high = (lane.right - config.spawn_margin).floor() as i32;
    let x = rng.range_inclusive(low, high) as f32;
    let kind = if rng.coin() {
        ObstacleKind::Car
    } else {
        ObstacleKind::Barrier
    };
    Obstacle::new(Vec2::new(x, config.spawn_y), kind, config)
}

/// Scroll every obstacle down and drop the ones past the bottom margin
///
/// Movement is per tick, not scaled by frame time. Returns how many
/// obstacles were removed.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, speed: f32, config: &GameConfig) -> usize {
    let step = speed + config.obstacle_speed_bonus;
    let limit = config.despawn_y();
    let before = obstacles.len();
    obstacles.retain_mut(|o| {
        o.pos.y += step;
        o.pos.y <= limit
    });
    before - obstacles.len()
}

/// Count one tick on the spawn timer; spawns and resets it when due
pub fn update_spawner(
    spawn_timer: &mut u32,
    obstacles: &mut Vec<Obstacle>,
    speed: f32,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> bool {
    *spawn_timer += 1;
    if *spawn_timer as f32 >= spawn_interval(speed, config) {
        obstacles.push(spawn_obstacle(config, rng));
        *spawn_timer = 0;
        true
    } else {
        false
    }
}
