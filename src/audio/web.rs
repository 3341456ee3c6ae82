//! Web Audio output
//!
//! Uploads each synthesized waveform into an `AudioBuffer` the first time it is
//! played and replays it through a fresh `AudioBufferSourceNode` afterwards.

use std::collections::HashMap;

use web_sys::{AudioBuffer, AudioContext, AudioContextState};

use super::{AudioError, AudioSink, SoundId, WaveformBuffer};

pub struct WebAudioSink {
    ctx: AudioContext,
    buffers: HashMap<SoundId, AudioBuffer>,
}

impl WebAudioSink {
    pub fn new() -> Result<Self, AudioError> {
        // May fail outside a secure context
        let ctx = AudioContext::new()
            .map_err(|e| AudioError::Unavailable(format!("AudioContext: {:?}", e)))?;
        Ok(Self {
            ctx,
            buffers: HashMap::new(),
        })
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        let _ = self.ctx.resume();
    }

    fn upload(&self, waveform: &WaveformBuffer) -> Result<AudioBuffer, AudioError> {
        let buffer = self
            .ctx
            .create_buffer(2, waveform.len() as u32, waveform.sample_rate() as f32)
            .map_err(|e| AudioError::Playback(format!("create_buffer: {:?}", e)))?;
        for channel in 0..2 {
            let data = waveform.channel_f32(channel);
            buffer
                .copy_to_channel(&data, channel as i32)
                .map_err(|e| AudioError::Playback(format!("copy_to_channel: {:?}", e)))?;
        }
        Ok(buffer)
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, id: SoundId, waveform: &WaveformBuffer, gain: f32) -> Result<(), AudioError> {
        if waveform.is_empty() {
            return Ok(());
        }

        // Browsers start the context suspended until a user gesture
        if self.ctx.state() == AudioContextState::Suspended {
            self.resume();
        }

        if !self.buffers.contains_key(&id) {
            let buffer = self.upload(waveform)?;
            self.buffers.insert(id, buffer);
        }
        let Some(buffer) = self.buffers.get(&id) else {
            return Ok(());
        };

        let to_err = |e| AudioError::Playback(format!("{:?}", e));
        let source = self.ctx.create_buffer_source().map_err(to_err)?;
        let gain_node = self.ctx.create_gain().map_err(to_err)?;
        source.set_buffer(Some(buffer));
        gain_node.gain().set_value(gain);
        source.connect_with_audio_node(&gain_node).map_err(to_err)?;
        gain_node
            .connect_with_audio_node(&self.ctx.destination())
            .map_err(to_err)?;
        source.start().map_err(to_err)?;
        Ok(())
    }
}
