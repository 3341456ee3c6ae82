//! Fixed-rate simulation tick
//!
//! Advances the game by one frame: menu transitions outside of play, and the
//! driving update (steer, scroll, difficulty, scoring, obstacles, collision)
//! while playing.

use glam::Vec2;

use super::collision::find_collision;
use super::obstacles::{advance_obstacles, update_spawner};
use super::state::{GamePhase, GameState};
use crate::audio::SoundId;
use crate::menu::{self, MenuAction};
use crate::random::RandomSource;

/// Input for a single tick
///
/// Steering flags are held state; everything else is a one-shot that the
/// caller clears after the tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub steer_left: bool,
    pub steer_right: bool,
    /// Space / Enter
    pub confirm: bool,
    /// Escape
    pub cancel: bool,
    /// Window close
    pub quit: bool,
    /// Latest pointer position, if it moved
    pub pointer: Option<Vec2>,
    /// Primary button pressed this tick
    pub click: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    /// Sounds to fire, in order
    pub sounds: Vec<SoundId>,
    /// The player asked to leave the game
    pub exit: bool,
}

/// Advance the game state by one tick
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut dyn RandomSource,
    dt: f32,
) -> TickOutput {
    let mut out = TickOutput::default();

    if input.quit {
        out.exit = true;
        return out;
    }

    if let Some(pointer) = input.pointer {
        state.pointer = pointer;
    }
    let clicked = if input.click {
        menu::hovered(state.phase, state.pointer, &state.config)
    } else {
        None
    };

    match state.phase {
        GamePhase::Start => {
            if input.confirm || clicked == Some(MenuAction::StartGame) {
                state.start_round();
                out.sounds.push(SoundId::Select);
                log::info!("Round started");
            }
        }

        GamePhase::Playing => drive(state, input, rng, dt, &mut out),

        GamePhase::GameOver => {
            if input.confirm || clicked == Some(MenuAction::PlayAgain) {
                state.phase = GamePhase::Start;
                out.sounds.push(SoundId::Select);
            } else if input.cancel || clicked == Some(MenuAction::QuitGame) {
                out.exit = true;
            }
        }
    }

    out
}

/// One tick of active driving
fn drive(
    state: &mut GameState,
    input: &TickInput,
    rng: &mut dyn RandomSource,
    dt: f32,
    out: &mut TickOutput,
) {
    let config = &state.config;
    let session = &mut state.session;

    // Steering
    if input.steer_left {
        state.player.steer(-config.player_step, config);
    }
    if input.steer_right {
        state.player.steer(config.player_step, config);
    }

    // Travel
    let prev_distance = session.distance;
    session.distance += session.speed;
    session.elapsed += dt;

    // Difficulty: one speed step per level_distance crossed
    let crossed = (session.distance / config.level_distance).floor()
        - (prev_distance / config.level_distance).floor();
    for _ in 0..crossed.max(0.0) as u32 {
        let old_level = session.speed.floor();
        session.speed = (session.speed + config.speed_step).min(config.max_speed);
        if session.speed.floor() > old_level {
            out.sounds.push(SoundId::Beep);
            log::info!(
                "Level up: speed {} at distance {}",
                session.speed,
                session.distance
            );
        }
    }

    session.score += 1;

    if rng.one_in(config.engine_sound_odds) {
        out.sounds.push(SoundId::Engine);
    }

    // Road stripes
    let wrap = config.screen_height;
    for stripe in &mut state.stripes {
        *stripe += session.speed;
        if *stripe > wrap {
            *stripe = -config.stripe_spacing;
        }
    }

    // Obstacles
    let passed = advance_obstacles(&mut state.obstacles, session.speed, config);
    session.score += passed as u64 * config.pass_bonus;
    update_spawner(
        &mut session.spawn_timer,
        &mut state.obstacles,
        session.speed,
        config,
        rng,
    );

    if let Some(index) = find_collision(&state.player, &state.obstacles) {
        out.sounds.push(SoundId::Crash);
        state.phase = GamePhase::GameOver;
        log::info!(
            "Crashed into {:?}: score {}, distance {}",
            state.obstacles[index].kind,
            session.score,
            session.distance
        );
    }
}
