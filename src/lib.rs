//! Retro Racer - A single-screen synthwave arcade racer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacles, collisions, game state)
//! - `audio`: Procedural sound synthesis and fire-and-forget playback
//! - `app`: Fixed-rate game loop tying input, simulation, audio and rendering
//! - `renderer`: WebGPU rendering pipeline
//! - `menu`: Start / game-over button hit testing

pub mod app;
pub mod audio;
pub mod config;
pub mod menu;
pub mod random;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (Hz)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Audio sample rate used by the synthesizer (Hz)
    pub const SAMPLE_RATE: u32 = 22050;
    /// Peak amplitude of synthesized waves, well below i16::MAX for headroom
    pub const CLIP_AMPLITUDE: f32 = 4096.0;
}
