//! Procedural audio
//!
//! Every sound is synthesized once at startup into a [`SoundBank`]; playback
//! hands a buffer to an [`AudioSink`] and never waits for it to finish.

#[cfg(all(not(target_arch = "wasm32"), feature = "native-audio"))]
pub mod native;
pub mod synth;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::settings::Settings;
pub use synth::{WaveformBuffer, generate_engine_sound, generate_tone};

/// Sound identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// Level up
    Beep,
    /// Menu confirm
    Select,
    /// Player hit an obstacle
    Crash,
    /// Ambient engine rumble
    Engine,
}

impl SoundId {
    pub const ALL: [SoundId; 4] = [
        SoundId::Beep,
        SoundId::Select,
        SoundId::Crash,
        SoundId::Engine,
    ];

    fn index(self) -> usize {
        match self {
            SoundId::Beep => 0,
            SoundId::Select => 1,
            SoundId::Crash => 2,
            SoundId::Engine => 3,
        }
    }
}

/// Audio output failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Precomputed waveform for every [`SoundId`]
#[derive(Debug, Clone)]
pub struct SoundBank {
    buffers: [WaveformBuffer; 4],
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundBank {
    /// Synthesize the full bank
    pub fn new() -> Self {
        Self {
            buffers: [
                generate_tone(880.0, 0.1, 0.3),
                generate_tone(1200.0, 0.15, 0.4),
                generate_engine_sound(60.0, 0.5, 0.5),
                generate_engine_sound(100.0, 0.3, 0.2),
            ],
        }
    }

    pub fn get(&self, id: SoundId) -> &WaveformBuffer {
        &self.buffers[id.index()]
    }
}

/// Output port for synthesized sounds
///
/// Implementations start playback and return immediately.
pub trait AudioSink {
    fn play(&mut self, id: SoundId, buffer: &WaveformBuffer, gain: f32) -> Result<(), AudioError>;
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _id: SoundId, _buffer: &WaveformBuffer, _gain: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Records every played sound into a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<SoundId>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared log (stays valid after the sink is boxed)
    pub fn log(&self) -> Rc<RefCell<Vec<SoundId>>> {
        self.log.clone()
    }
}

impl AudioSink for RecordingSink {
    fn play(&mut self, id: SoundId, _buffer: &WaveformBuffer, _gain: f32) -> Result<(), AudioError> {
        self.log.borrow_mut().push(id);
        Ok(())
    }
}

/// Create the platform's audio output
#[cfg(target_arch = "wasm32")]
pub fn platform_sink() -> Result<Box<dyn AudioSink>, AudioError> {
    Ok(Box::new(web::WebAudioSink::new()?))
}

/// Create the platform's audio output
#[cfg(all(not(target_arch = "wasm32"), feature = "native-audio"))]
pub fn platform_sink() -> Result<Box<dyn AudioSink>, AudioError> {
    Ok(Box::new(native::RodioSink::new()?))
}

/// Create the platform's audio output
#[cfg(all(not(target_arch = "wasm32"), not(feature = "native-audio")))]
pub fn platform_sink() -> Result<Box<dyn AudioSink>, AudioError> {
    Err(AudioError::Unavailable(
        "built without the native-audio feature".into(),
    ))
}

/// Audio manager for the game
pub struct AudioManager {
    bank: SoundBank,
    sink: Option<Box<dyn AudioSink>>,
    settings: Settings,
}

impl AudioManager {
    /// Wrap the result of sink creation; a failed sink leaves audio disabled
    pub fn new(sink: Result<Box<dyn AudioSink>, AudioError>, settings: Settings) -> Self {
        let sink = match sink {
            Ok(sink) => Some(sink),
            Err(e) => {
                log::warn!("{e} - sound disabled");
                None
            }
        };
        Self {
            bank: SoundBank::new(),
            sink,
            settings,
        }
    }

    /// Audio manager that never plays anything
    pub fn disabled() -> Self {
        Self {
            bank: SoundBank::new(),
            sink: None,
            settings: Settings::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flip mute; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = !self.settings.muted;
        self.settings.set_muted(muted);
        muted
    }

    /// Nudge the master volume by `delta`; returns the new (clamped) volume
    pub fn change_volume(&mut self, delta: f32) -> f32 {
        self.settings
            .set_master_volume(self.settings.master_volume + delta);
        self.settings.master_volume
    }

    /// Fire-and-forget playback; failures are swallowed
    pub fn play(&mut self, id: SoundId) {
        let gain = self.settings.effective_volume();
        if gain <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        if let Err(e) = sink.play(id, self.bank.get(id), gain) {
            log::debug!("Ignoring {:?}: {}", id, e);
        }
    }

    /// Play every cue emitted by a tick, in order
    pub fn play_all(&mut self, ids: &[SoundId]) {
        for &id in ids {
            self.play(id);
        }
    }
}
