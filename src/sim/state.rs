//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::GameConfig;
use crate::menu::MenuAction;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    Start,
    /// Active driving
    Playing,
    /// Round ended by a crash
    GameOver,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Centre of the car (y never changes during a round)
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    /// Player centred in the lane at the configured height
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(config.lane().center(), config.player_y()),
            size: config.player_size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move horizontally by `dx`; a move that would leave the lane is dropped whole
    pub fn steer(&mut self, dx: f32, config: &GameConfig) {
        let (min_x, max_x) = config.player_x_bounds();
        let x = self.pos.x + dx;
        if (min_x..=max_x).contains(&x) {
            self.pos.x = x;
        }
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Car,
    Barrier,
}

impl ObstacleKind {
    pub fn size(self, config: &GameConfig) -> Vec2 {
        match self {
            ObstacleKind::Car => config.car_size,
            ObstacleKind::Barrier => config.barrier_size,
        }
    }
}

/// Something in the road
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Centre of the obstacle
    pub pos: Vec2,
    pub kind: ObstacleKind,
    pub size: Vec2,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind, config: &GameConfig) -> Self {
        Self {
            pos,
            kind,
            size: kind.size(config),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Per-round counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub score: u64,
    pub distance: f32,
    /// Current scroll speed, within [start_speed, max_speed]
    pub speed: f32,
    /// Seconds spent playing this round
    pub elapsed: f32,
    /// Ticks since the last obstacle spawn
    pub spawn_timer: u32,
}

impl Session {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            distance: 0.0,
            speed: config.start_speed,
            elapsed: 0.0,
            spawn_timer: 0,
        }
    }

    /// Difficulty level shown on the HUD (1 at start speed)
    pub fn level(&self) -> u32 {
        (self.speed - 4.0).max(0.0) as u32
    }

    /// Speedometer reading
    pub fn display_speed_kmh(&self) -> u32 {
        (self.speed * 20.0) as u32
    }

    /// Odometer reading
    pub fn display_distance_m(&self) -> u32 {
        (self.distance / 10.0) as u32
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub player: Player,
    /// Active obstacles (spawn order)
    pub obstacles: Vec<Obstacle>,
    pub session: Session,
    /// Y offsets of the centre-line stripes
    pub stripes: Vec<f32>,
    /// Last known pointer position
    pub pointer: Vec2,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        let stripes = initial_stripes(&config);
        Self {
            phase: GamePhase::Start,
            player: Player::new(&config),
            obstacles: Vec::new(),
            session: Session::new(&config),
            stripes,
            pointer: Vec2::ZERO,
            config,
        }
    }

    /// Reset counters, player and obstacles and begin driving
    pub fn start_round(&mut self) {
        self.session = Session::new(&self.config);
        self.player = Player::new(&self.config);
        self.obstacles.clear();
        self.phase = GamePhase::Playing;
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            player: self.player.clone(),
            obstacles: self.obstacles.clone(),
            score: self.session.score,
            distance: self.session.distance,
            elapsed: self.session.elapsed,
            speed: self.session.speed,
            level: self.session.level(),
            speed_kmh: self.session.display_speed_kmh(),
            distance_m: self.session.display_distance_m(),
            stripes: self.stripes.clone(),
            hovered: crate::menu::hovered(self.phase, self.pointer, &self.config),
        }
    }
}

/// Stripe offsets every `stripe_spacing` from the top to just past the bottom
fn initial_stripes(config: &GameConfig) -> Vec<f32> {
    let count = ((config.screen_height + config.stripe_spacing) / config.stripe_spacing).ceil()
        as usize;
    (0..count).map(|i| i as f32 * config.stripe_spacing).collect()
}

/// Frame-ready copy of everything the renderer draws
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub distance: f32,
    pub elapsed: f32,
    pub speed: f32,
    pub level: u32,
    pub speed_kmh: u32,
    pub distance_m: u32,
    pub stripes: Vec<f32>,
    pub hovered: Option<MenuAction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_on_title() {
        let state = GameState::new(GameConfig::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.player.pos, Vec2::new(400.0, 500.0));
        assert!(state.obstacles.is_empty());
        assert_eq!(state.stripes.len(), 13);
        assert_eq!(state.stripes[1], 50.0);
    }

    #[test]
    fn test_start_round_resets_everything() {
        let config = GameConfig::default();
        let mut state = GameState::new(config.clone());
        state.session.score = 999;
        state.session.distance = 4321.0;
        state.session.speed = 9.5;
        state.session.elapsed = 12.0;
        state.session.spawn_timer = 17;
        state.player.pos.x = 300.0;
        state.obstacles.push(Obstacle::new(
            Vec2::new(300.0, 10.0),
            ObstacleKind::Car,
            &config,
        ));

        state.start_round();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session, Session::new(&config));
        assert_eq!(state.session.speed, 5.0);
        assert_eq!(state.player.pos.x, 400.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_steer_stops_short_of_both_lane_edges() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        for _ in 0..100 {
            player.steer(-config.player_step, &config);
        }
        assert_eq!(player.pos.x, 272.0);

        for _ in 0..100 {
            player.steer(config.player_step, &config);
        }
        assert_eq!(player.pos.x, 528.0);

        player.steer(-config.player_step, &config);
        assert_eq!(player.pos.x, 520.0);
    }

    #[test]
    fn test_steer_moves_by_whole_steps_only() {
        let config = GameConfig::default();
        let mut player = Player::new(&config);

        let mut moves = Vec::new();
        for _ in 0..20 {
            let before = player.pos.x;
            player.steer(-config.player_step, &config);
            moves.push(before - player.pos.x);
        }
        assert!(moves.iter().all(|&m| m == 0.0 || m == config.player_step));
        assert_eq!(moves.iter().filter(|&&m| m > 0.0).count(), 16);

        // A step landing exactly on the bound is allowed
        player.pos.x = 276.0;
        player.steer(-config.player_step, &config);
        assert_eq!(player.pos.x, 268.0);
    }

    #[test]
    fn test_obstacle_sizes_by_kind() {
        let config = GameConfig::default();
        let car = Obstacle::new(Vec2::ZERO, ObstacleKind::Car, &config);
        let barrier = Obstacle::new(Vec2::ZERO, ObstacleKind::Barrier, &config);
        assert_eq!(car.size, Vec2::new(30.0, 40.0));
        assert_eq!(barrier.size, Vec2::new(40.0, 20.0));
    }

    #[test]
    fn test_hud_readouts() {
        let config = GameConfig::default();
        let mut session = Session::new(&config);
        assert_eq!(session.level(), 1);
        assert_eq!(session.display_speed_kmh(), 100);
        session.speed = 12.0;
        session.distance = 12345.0;
        assert_eq!(session.level(), 8);
        assert_eq!(session.display_speed_kmh(), 240);
        assert_eq!(session.display_distance_m(), 1234);
    }
}
