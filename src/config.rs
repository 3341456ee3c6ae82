//! Immutable game configuration
//!
//! Screen layout, lane geometry, entity sizes and difficulty tuning. Built once
//! and handed to [`GameState::new`](crate::sim::GameState::new); tests build
//! variants with alternate dimensions.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("screen size must be positive, got {width}x{height}")]
    ScreenSize { width: f32, height: f32 },
    #[error("lane width {lane} does not fit on a {screen} wide screen")]
    LaneWidth { lane: f32, screen: f32 },
    #[error("lane is too narrow for the spawn margin ({margin}) on each side")]
    SpawnMargin { margin: f32 },
    #[error("speed range is invalid: start {start}, max {max}")]
    SpeedRange { start: f32, max: f32 },
    #[error("menu buttons end at y={bottom}, below the {height} high screen")]
    ButtonLayout { bottom: f32, height: f32 },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
}

/// Horizontal drivable corridor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lane {
    pub left: f32,
    pub right: f32,
}

impl Lane {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Lane ===
    /// Width of the road, centred horizontally on the screen
    pub lane_width: f32,

    // === Player ===
    pub player_size: Vec2,
    /// Distance of the player's centre above the bottom of the screen
    pub player_bottom_offset: f32,
    /// Horizontal step per tick while a steer key is held
    pub player_step: f32,
    /// Clearance kept between the player centre and the lane edge
    pub player_edge_clearance: f32,

    // === Obstacles ===
    pub car_size: Vec2,
    pub barrier_size: Vec2,
    /// Spawn x is kept this far inside the lane edges
    pub spawn_margin: f32,
    /// Spawn y (above the visible area)
    pub spawn_y: f32,
    /// Obstacles are removed once y exceeds screen_height + despawn_margin
    pub despawn_margin: f32,
    /// Added to speed for the per-tick obstacle scroll
    pub obstacle_speed_bonus: f32,
    /// Score awarded for each obstacle that leaves the screen
    pub pass_bonus: u64,

    // === Difficulty ===
    pub start_speed: f32,
    pub max_speed: f32,
    pub speed_step: f32,
    /// Distance between speed increases
    pub level_distance: f32,
    pub base_spawn_interval: f32,
    pub min_spawn_interval: f32,
    /// Spawn interval shrink per unit of speed above start_speed
    pub spawn_interval_per_speed: f32,
    /// 1-in-N chance per tick of an ambient engine sound
    pub engine_sound_odds: u32,

    // === Road stripes ===
    pub stripe_spacing: f32,
    pub stripe_length: f32,

    // === Menu ===
    pub button_size: Vec2,
    /// Top edge of the first button
    pub first_button_top: f32,
    /// Vertical distance between the tops of consecutive buttons
    pub button_pitch: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,

            lane_width: 300.0,

            player_size: Vec2::new(32.0, 56.0),
            player_bottom_offset: 100.0,
            player_step: 8.0,
            player_edge_clearance: 18.0, // half car width + wheel overhang

            car_size: Vec2::new(30.0, 40.0),
            barrier_size: Vec2::new(40.0, 20.0),
            spawn_margin: 30.0,
            spawn_y: -50.0,
            despawn_margin: 50.0,
            obstacle_speed_bonus: 2.0,
            pass_bonus: 10,

            start_speed: 5.0,
            max_speed: 12.0,
            speed_step: 0.5,
            level_distance: 1000.0,
            base_spawn_interval: 40.0,
            min_spawn_interval: 20.0,
            spawn_interval_per_speed: 4.0,
            engine_sound_odds: 120,

            stripe_spacing: 50.0,
            stripe_length: 40.0,

            button_size: Vec2::new(200.0, 50.0),
            first_button_top: 400.0,
            button_pitch: 70.0,
        }
    }
}

impl GameConfig {
    /// Check that the configuration describes a playable layout
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width <= 0.0 || self.screen_height <= 0.0 {
            return Err(ConfigError::ScreenSize {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.lane_width <= 0.0 || self.lane_width > self.screen_width {
            return Err(ConfigError::LaneWidth {
                lane: self.lane_width,
                screen: self.screen_width,
            });
        }
        if self.spawn_margin * 2.0 > self.lane_width {
            return Err(ConfigError::SpawnMargin {
                margin: self.spawn_margin,
            });
        }
        if self.start_speed <= 0.0 || self.max_speed < self.start_speed {
            return Err(ConfigError::SpeedRange {
                start: self.start_speed,
                max: self.max_speed,
            });
        }
        if self.level_distance <= 0.0 {
            return Err(ConfigError::NotPositive("level_distance"));
        }
        if self.min_spawn_interval < 1.0 {
            return Err(ConfigError::NotPositive("min_spawn_interval"));
        }
        if self.engine_sound_odds == 0 {
            return Err(ConfigError::NotPositive("engine_sound_odds"));
        }
        if self.button_size.x <= 0.0 || self.button_size.y <= 0.0 {
            return Err(ConfigError::NotPositive("button_size"));
        }
        // Game over shows two buttons
        let bottom = self.first_button_top + self.button_pitch + self.button_size.y;
        if bottom > self.screen_height {
            return Err(ConfigError::ButtonLayout {
                bottom,
                height: self.screen_height,
            });
        }
        Ok(())
    }

    /// The road, centred on screen
    pub fn lane(&self) -> Lane {
        let center = self.screen_width * 0.5;
        let half = self.lane_width * 0.5;
        Lane {
            left: center - half,
            right: center + half,
        }
    }

    /// Fixed y coordinate of the player's centre
    pub fn player_y(&self) -> f32 {
        self.screen_height - self.player_bottom_offset
    }

    /// Inclusive range the player's centre x is clamped to
    pub fn player_x_bounds(&self) -> (f32, f32) {
        let lane = self.lane();
        (
            lane.left + self.player_edge_clearance,
            lane.right - self.player_edge_clearance,
        )
    }

    /// Obstacles past this y are recycled
    pub fn despawn_y(&self) -> f32 {
        self.screen_height + self.despawn_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lane_is_centered() {
        let config = GameConfig::default();
        let lane = config.lane();
        assert_eq!(lane.left, 250.0);
        assert_eq!(lane.right, 550.0);
        assert_eq!(lane.width(), 300.0);
        assert_eq!(lane.center(), 400.0);
    }

    #[test]
    fn test_default_player_geometry() {
        let config = GameConfig::default();
        assert_eq!(config.player_y(), 500.0);
        assert_eq!(config.player_x_bounds(), (268.0, 532.0));
        assert_eq!(config.despawn_y(), 650.0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_layouts() {
        let config = GameConfig {
            lane_width: 900.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LaneWidth { .. })
        ));

        let config = GameConfig {
            lane_width: 50.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpawnMargin { .. })
        ));

        let config = GameConfig {
            max_speed: 4.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SpeedRange { .. })
        ));

        let config = GameConfig {
            screen_height: 500.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ButtonLayout {
                bottom: 520.0,
                height: 500.0,
            })
        );

        let config = GameConfig {
            engine_sound_odds: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive("engine_sound_odds"))
        );
    }

    #[test]
    fn test_config_json_roundtrip_keeps_layout() {
        let config = GameConfig {
            screen_width: 1024.0,
            lane_width: 400.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lane(), config.lane());
    }
}
