//! Native audio output through rodio
//!
//! Each play opens a detached `Sink` on the shared output stream, so sounds
//! overlap freely and the caller never waits.

use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use super::{AudioError, AudioSink, SoundId, WaveformBuffer};

pub struct RodioSink {
    // Dropping the stream silences every sink
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioSink {
    /// Open the default output device
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::Unavailable(format!("output stream: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl AudioSink for RodioSink {
    fn play(&mut self, _id: SoundId, waveform: &WaveformBuffer, gain: f32) -> Result<(), AudioError> {
        if waveform.is_empty() {
            return Ok(());
        }
        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AudioError::Playback(format!("sink: {}", e)))?;
        sink.set_volume(gain);
        sink.append(SamplesBuffer::new(
            2,
            waveform.sample_rate(),
            waveform.interleaved(),
        ));
        sink.detach();
        Ok(())
    }
}
