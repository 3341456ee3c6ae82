//! Fixed-rate game loop
//!
//! Ties the render/input boundary to the simulation: poll input, tick, play
//! sounds, present the snapshot, then wait for the next frame. A quit request
//! is honoured at the top of the following iteration; a tick is never cut
//! short.

use glam::Vec2;

use crate::audio::AudioManager;
use crate::config::{ConfigError, GameConfig};
use crate::random::RandomSource;
use crate::sim::{GamePhase, GameState, Snapshot, TickInput, tick};

/// Discrete input from the front-end
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Left steer key pressed (true) or released (false)
    SteerLeft(bool),
    SteerRight(bool),
    Confirm,
    Cancel,
    Quit,
    PointerMove(f32, f32),
    PointerClick,
}

/// Folds input events into the next [`TickInput`]
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    pending: TickInput,
}

impl InputTracker {
    pub fn apply(&mut self, event: InputEvent) {
        let input = &mut self.pending;
        match event {
            InputEvent::SteerLeft(active) => input.steer_left = active,
            InputEvent::SteerRight(active) => input.steer_right = active,
            InputEvent::Confirm => input.confirm = true,
            InputEvent::Cancel => input.cancel = true,
            InputEvent::Quit => input.quit = true,
            InputEvent::PointerMove(x, y) => input.pointer = Some(Vec2::new(x, y)),
            InputEvent::PointerClick => input.click = true,
        }
    }

    /// Input for this tick; one-shots are cleared, held steering is kept
    pub fn take(&mut self) -> TickInput {
        let input = self.pending.clone();
        self.pending = TickInput {
            steer_left: input.steer_left,
            steer_right: input.steer_right,
            ..Default::default()
        };
        input
    }
}

/// Render/input boundary
pub trait Frontend {
    /// Events since the previous frame
    fn poll_input(&mut self) -> Vec<InputEvent>;

    /// Draw one frame
    fn present(&mut self, frame: &Snapshot);
}

/// Frame pacing
pub trait FrameClock {
    /// Block until the next frame is due; returns the measured delta in seconds
    fn wait_next_frame(&mut self) -> f32;
}

/// Never waits; always reports the same delta
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub dt: f32,
}

impl FrameClock for FixedClock {
    fn wait_next_frame(&mut self) -> f32 {
        self.dt
    }
}

/// Sleeps to hold a target frame rate
#[cfg(not(target_arch = "wasm32"))]
pub struct RealtimeClock {
    period: std::time::Duration,
    last: Option<std::time::Instant>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RealtimeClock {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            period: std::time::Duration::from_secs_f64(1.0 / rate_hz.max(1) as f64),
            last: None,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameClock for RealtimeClock {
    fn wait_next_frame(&mut self) -> f32 {
        let Some(last) = self.last else {
            self.last = Some(std::time::Instant::now());
            return self.period.as_secs_f32();
        };
        let due = last + self.period;
        let now = std::time::Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        let now = std::time::Instant::now();
        self.last = Some(now);
        (now - last).as_secs_f32()
    }
}

/// A running game: state, randomness, audio and pending input
pub struct Game {
    state: GameState,
    rng: Box<dyn RandomSource>,
    audio: AudioManager,
    input: InputTracker,
    running: bool,
    ticks: u64,
}

impl Game {
    pub fn new(
        config: GameConfig,
        rng: Box<dyn RandomSource>,
        audio: AudioManager,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(config),
            rng,
            audio,
            input: InputTracker::default(),
            running: true,
            ticks: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Run one simulation tick and fire its sounds
    pub fn step(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let input = self.input.take();
        let before = self.state.phase;
        let out = tick(&mut self.state, &input, self.rng.as_mut(), dt);
        self.ticks += 1;

        self.audio.play_all(&out.sounds);

        if self.state.phase != before {
            log::info!("Phase {:?} -> {:?}", before, self.state.phase);
        }
        if out.exit {
            log::info!("Quit requested after {} ticks", self.ticks);
            self.running = false;
        }
    }

    /// Drive the loop until the player quits; returns the number of ticks run
    pub fn run(&mut self, frontend: &mut dyn Frontend, clock: &mut dyn FrameClock) -> u64 {
        while self.running {
            let dt = clock.wait_next_frame();
            for event in frontend.poll_input() {
                self.handle_event(event);
            }
            self.step(dt);
            frontend.present(&self.state.snapshot());
        }
        self.ticks
    }
}

/// Headless front-end that plays by itself
///
/// Starts one round, dodges the nearest obstacle ahead, leaves on game over or
/// when the frame budget runs out.
#[derive(Debug, Clone)]
pub struct Autopilot {
    max_frames: u64,
    frames: u64,
    started: bool,
    /// Player x range, for choosing which way to dodge
    bounds: (f32, f32),
    step: f32,
    last: Option<Snapshot>,
}

/// How far ahead of the player obstacles are considered
const LOOKAHEAD: f32 = 260.0;
/// Extra sideways clearance the autopilot keeps
const CLEARANCE: f32 = 12.0;

impl Autopilot {
    pub fn new(max_frames: u64, config: &GameConfig) -> Self {
        Self {
            max_frames,
            frames: 0,
            started: false,
            bounds: config.player_x_bounds(),
            step: config.player_step,
            last: None,
        }
    }

    /// Most recent frame presented
    pub fn last_frame(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// (left, right) steering for a frame
    fn steer(&self, frame: &Snapshot) -> (bool, bool) {
        let player = &frame.player;
        let threat = frame
            .obstacles
            .iter()
            .filter(|o| {
                let ahead = player.pos.y - o.pos.y;
                let reach = (o.size.x + player.size.x) * 0.5 + CLEARANCE;
                ahead > -player.size.y
                    && ahead < LOOKAHEAD
                    && (o.pos.x - player.pos.x).abs() < reach
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let Some(threat) = threat else {
            return (false, false);
        };
        let (min_x, max_x) = self.bounds;
        let go_left = if threat.pos.x >= player.pos.x {
            player.pos.x - self.step >= min_x
        } else {
            player.pos.x + self.step > max_x
        };
        (go_left, !go_left)
    }
}

impl Frontend for Autopilot {
    fn poll_input(&mut self) -> Vec<InputEvent> {
        self.frames += 1;
        if self.frames > self.max_frames {
            return vec![InputEvent::Quit];
        }
        let Some(frame) = &self.last else {
            return Vec::new();
        };
        match frame.phase {
            GamePhase::Start if !self.started => {
                self.started = true;
                vec![InputEvent::Confirm]
            }
            GamePhase::Start => vec![InputEvent::Quit],
            GamePhase::Playing => {
                let (left, right) = self.steer(frame);
                vec![InputEvent::SteerLeft(left), InputEvent::SteerRight(right)]
            }
            GamePhase::GameOver => vec![InputEvent::Cancel],
        }
    }

    fn present(&mut self, frame: &Snapshot) {
        self.last = Some(frame.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{RecordingSink, SoundId};
    use crate::consts::SIM_DT;
    use crate::random::{ScriptedRandom, SeededRandom};
    use crate::settings::Settings;
    use crate::sim::{Obstacle, ObstacleKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Replays a fixed list of per-frame events and records every frame
    struct ScriptedFrontend {
        script: Vec<Vec<InputEvent>>,
        frame: usize,
        presented: Vec<Snapshot>,
    }

    impl ScriptedFrontend {
        fn new(script: Vec<Vec<InputEvent>>) -> Self {
            Self {
                script,
                frame: 0,
                presented: Vec::new(),
            }
        }
    }

    impl Frontend for ScriptedFrontend {
        fn poll_input(&mut self) -> Vec<InputEvent> {
            let events = self.script.get(self.frame).cloned().unwrap_or_default();
            self.frame += 1;
            events
        }

        fn present(&mut self, frame: &Snapshot) {
            self.presented.push(frame.clone());
        }
    }

    fn game_with_log(rng: Box<dyn RandomSource>) -> (Game, Rc<RefCell<Vec<SoundId>>>) {
        let sink = RecordingSink::new();
        let log = sink.log();
        let audio = AudioManager::new(Ok(Box::new(sink)), Settings::default());
        let game = Game::new(GameConfig::default(), rng, audio).unwrap();
        (game, log)
    }

    #[test]
    fn test_tracker_keeps_held_keys() {
        let mut tracker = InputTracker::default();
        tracker.apply(InputEvent::SteerLeft(true));
        tracker.apply(InputEvent::Confirm);
        tracker.apply(InputEvent::PointerMove(10.0, 20.0));
        tracker.apply(InputEvent::PointerClick);

        let first = tracker.take();
        assert!(first.steer_left && first.confirm && first.click);
        assert_eq!(first.pointer, Some(Vec2::new(10.0, 20.0)));

        let second = tracker.take();
        assert!(second.steer_left);
        assert!(!second.confirm && !second.click);
        assert_eq!(second.pointer, None);

        tracker.apply(InputEvent::SteerLeft(false));
        assert!(!tracker.take().steer_left);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            screen_width: 0.0,
            ..Default::default()
        };
        let result = Game::new(
            config,
            Box::new(SeededRandom::new(1)),
            AudioManager::disabled(),
        );
        assert!(matches!(result, Err(ConfigError::ScreenSize { .. })));
    }

    #[test]
    fn test_quit_stops_at_top_of_next_iteration() {
        let (mut game, _log) = game_with_log(Box::new(ScriptedRandom::quiet()));
        let mut frontend = ScriptedFrontend::new(vec![
            vec![InputEvent::Confirm],
            vec![],
            vec![InputEvent::Quit],
            vec![InputEvent::Confirm], // never polled
        ]);
        let mut clock = FixedClock { dt: SIM_DT };

        let ticks = game.run(&mut frontend, &mut clock);
        assert_eq!(ticks, 3);
        assert_eq!(frontend.frame, 3);
        // The quitting frame is still presented
        assert_eq!(frontend.presented.len(), 3);
        assert!(!game.is_running());
    }

    #[test]
    fn test_full_round_with_sounds() {
        let (mut game, log) = game_with_log(Box::new(ScriptedRandom::quiet()));
        game.handle_event(InputEvent::Confirm);
        game.step(SIM_DT);
        assert_eq!(game.state().phase, GamePhase::Playing);

        for _ in 0..200 {
            game.step(SIM_DT);
        }
        let frame = game.snapshot();
        assert_eq!(frame.distance, 1000.0);
        assert_eq!(frame.speed, 5.5);
        assert!(frame.score >= 200);

        // Drop a car on the player
        let config = game.state().config.clone();
        let player = game.state().player.pos;
        game.state
            .obstacles
            .push(Obstacle::new(player, ObstacleKind::Car, &config));
        game.step(SIM_DT);
        assert_eq!(game.state().phase, GamePhase::GameOver);

        game.handle_event(InputEvent::Confirm);
        game.step(SIM_DT);
        assert_eq!(game.state().phase, GamePhase::Start);

        assert_eq!(
            *log.borrow(),
            vec![SoundId::Select, SoundId::Crash, SoundId::Select]
        );
    }

    #[test]
    fn test_steer_events_move_player() {
        let (mut game, _log) = game_with_log(Box::new(ScriptedRandom::quiet()));
        game.handle_event(InputEvent::Confirm);
        game.step(SIM_DT);

        game.handle_event(InputEvent::SteerRight(true));
        game.step(SIM_DT);
        game.step(SIM_DT);
        game.handle_event(InputEvent::SteerRight(false));
        game.step(SIM_DT);
        assert_eq!(game.state().player.pos.x, 416.0);
    }

    #[test]
    fn test_events_ignored_after_quit() {
        let (mut game, _log) = game_with_log(Box::new(ScriptedRandom::quiet()));
        game.handle_event(InputEvent::Quit);
        game.step(SIM_DT);
        assert!(!game.is_running());

        game.handle_event(InputEvent::Confirm);
        game.step(SIM_DT);
        assert_eq!(game.state().phase, GamePhase::Start);
        assert_eq!(game.ticks(), 1);
    }

    #[test]
    fn test_autopilot_plays_and_leaves() {
        let config = GameConfig::default();
        let mut game = Game::new(
            config.clone(),
            Box::new(SeededRandom::new(2024)),
            AudioManager::disabled(),
        )
        .unwrap();
        let mut pilot = Autopilot::new(3_000, &config);
        let mut clock = FixedClock { dt: SIM_DT };

        let ticks = game.run(&mut pilot, &mut clock);
        assert!(ticks <= 3_002);
        assert!(!game.is_running());
        let last = pilot.last_frame().unwrap();
        assert!(last.score > 0);
        assert!(last.distance > 0.0);
    }

    #[test]
    fn test_autopilot_dodges_away_from_threat() {
        let config = GameConfig::default();
        let pilot = Autopilot::new(10, &config);
        let mut state = GameState::new(config.clone());
        state.start_round();

        state
            .obstacles
            .push(Obstacle::new(Vec2::new(410.0, 400.0), ObstacleKind::Car, &config));
        assert_eq!(pilot.steer(&state.snapshot()), (true, false));

        state.obstacles[0].pos.x = 390.0;
        assert_eq!(pilot.steer(&state.snapshot()), (false, true));

        // Pinned at the left edge: dodge right even if the threat is to the right
        state.player.pos.x = 272.0;
        state.obstacles[0].pos.x = 279.0;
        assert_eq!(pilot.steer(&state.snapshot()), (false, true));

        state.obstacles.clear();
        assert_eq!(pilot.steer(&state.snapshot()), (false, false));
    }
}
