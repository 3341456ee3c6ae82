//! Sample-level waveform synthesis
//!
//! Pure generators producing stereo 16-bit frames. Identical inputs always give
//! identical buffers.

use std::f64::consts::TAU;

use crate::consts::{CLIP_AMPLITUDE, SAMPLE_RATE};

/// Relative weights of the engine harmonics (fundamental, 1.5x, 2x)
const ENGINE_HARMONICS: [(f64, f64); 3] = [(1.0, 1.0), (1.5, 0.5), (2.0, 0.3)];
/// Divisor keeping the summed harmonics inside the single-tone bound
const ENGINE_NORMALIZE: f64 = 2.8;

/// A fixed-length sequence of stereo frames `[left, right]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WaveformBuffer {
    frames: Vec<[i16; 2]>,
    sample_rate: u32,
}

impl WaveformBuffer {
    pub fn frames(&self) -> &[[i16; 2]] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Playback length in seconds
    pub fn duration(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.frames.len() as f32 / self.sample_rate as f32
        }
    }

    /// Largest absolute sample value over both channels
    pub fn peak(&self) -> u16 {
        self.frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|s| s.unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Frames flattened to `L R L R ...` (rodio layout)
    pub fn interleaved(&self) -> Vec<i16> {
        self.frames.iter().flat_map(|f| f.iter().copied()).collect()
    }

    /// One channel as normalized floats in [-1, 1] (Web Audio layout)
    pub fn channel_f32(&self, channel: usize) -> Vec<f32> {
        let channel = channel.min(1);
        self.frames
            .iter()
            .map(|f| f[channel] as f32 / 32768.0)
            .collect()
    }
}

/// Number of frames for a duration, or zero for degenerate durations
fn frame_count(duration: f32) -> usize {
    if !duration.is_finite() || duration <= 0.0 {
        return 0;
    }
    (duration as f64 * SAMPLE_RATE as f64).round() as usize
}

/// Build a buffer by sampling `wave(t)` (t in seconds) and scaling to i16
fn render(duration: f32, volume: f32, wave: impl Fn(f64) -> f64) -> WaveformBuffer {
    let rate = SAMPLE_RATE as f64;
    let scale = CLIP_AMPLITUDE as f64 * volume as f64;
    let frames = (0..frame_count(duration))
        .map(|i| {
            let sample = (scale * wave(i as f64 / rate)).round() as i16;
            [sample, sample]
        })
        .collect();
    WaveformBuffer {
        frames,
        sample_rate: SAMPLE_RATE,
    }
}

/// Single sine beep
pub fn generate_tone(frequency: f32, duration: f32, volume: f32) -> WaveformBuffer {
    let freq = frequency as f64;
    render(duration, volume, |t| (TAU * freq * t).sin())
}

/// Engine rumble: fundamental plus two weighted overtones, normalized
pub fn generate_engine_sound(base_frequency: f32, duration: f32, volume: f32) -> WaveformBuffer {
    let base = base_frequency as f64;
    render(duration, volume, |t| {
        let combined: f64 = ENGINE_HARMONICS
            .iter()
            .map(|&(mult, weight)| weight * (TAU * base * mult * t).sin())
            .sum();
        combined / ENGINE_NORMALIZE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tone_length_and_rate() {
        let buf = generate_tone(880.0, 0.1, 0.3);
        assert_eq!(buf.len(), 2205);
        assert_eq!(buf.sample_rate(), SAMPLE_RATE);
        assert!((buf.duration() - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_tone_zero_duration_is_empty() {
        assert!(generate_tone(440.0, 0.0, 1.0).is_empty());
        assert!(generate_tone(440.0, -1.0, 1.0).is_empty());
        assert!(generate_tone(440.0, f32::NAN, 1.0).is_empty());
        assert!(generate_engine_sound(80.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn test_tone_known_samples() {
        // Quarter-period of 5512.5 Hz at 22050 Hz lands exactly on the peak
        let buf = generate_tone(5512.5, 0.001, 1.0);
        assert_eq!(buf.frames()[0], [0, 0]);
        assert_eq!(buf.frames()[1], [4096, 4096]);
        assert_eq!(buf.frames()[2], [0, 0]);
        assert_eq!(buf.frames()[3], [-4096, -4096]);
    }

    #[test]
    fn test_tone_channels_identical() {
        let buf = generate_tone(1200.0, 0.15, 0.4);
        assert!(buf.frames().iter().all(|f| f[0] == f[1]));
    }

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(generate_tone(880.0, 0.1, 0.3), generate_tone(880.0, 0.1, 0.3));
        assert_eq!(
            generate_engine_sound(60.0, 0.5, 0.5),
            generate_engine_sound(60.0, 0.5, 0.5)
        );
    }

    #[test]
    fn test_engine_first_sample_and_length() {
        let buf = generate_engine_sound(100.0, 0.3, 0.2);
        assert_eq!(buf.len(), 6615);
        assert_eq!(buf.frames()[0], [0, 0]);
        assert!(buf.peak() > 0);
    }

    #[test]
    fn test_channel_f32_normalized() {
        let buf = generate_tone(5512.5, 0.001, 1.0);
        let left = buf.channel_f32(0);
        assert_eq!(left.len(), buf.len());
        assert!((left[1] - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_interleaved_layout() {
        let buf = generate_tone(5512.5, 0.001, 1.0);
        let samples = buf.interleaved();
        assert_eq!(samples.len(), buf.len() * 2);
        assert_eq!(&samples[..8], &[0, 0, 4096, 4096, 0, 0, -4096, -4096]);
    }

    proptest! {
        #[test]
        fn prop_tone_length_and_bound(
            freq in 20.0f32..8000.0,
            duration in 0.0f32..0.5,
            volume in 0.0f32..=1.0,
        ) {
            let buf = generate_tone(freq, duration, volume);
            let expected = (duration as f64 * SAMPLE_RATE as f64).round() as usize;
            prop_assert_eq!(buf.len(), if duration > 0.0 { expected } else { 0 });
            let bound = (CLIP_AMPLITUDE * volume).round() as u16;
            prop_assert!(buf.peak() <= bound);
        }

        #[test]
        fn prop_engine_stays_within_tone_bound(
            base in 20.0f32..2000.0,
            duration in 0.0f32..0.5,
            volume in 0.0f32..=1.0,
        ) {
            let buf = generate_engine_sound(base, duration, volume);
            let bound = (CLIP_AMPLITUDE * volume).round() as u16;
            prop_assert!(buf.peak() <= bound);
        }
    }
}
