//! Audio preferences
//!
//! Volume scaling is applied at playback time as a gain, so the precomputed
//! sound bank is never regenerated.

use serde::{Deserialize, Serialize};

/// Player-adjustable audio settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all playback
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Set master volume (clamped to 0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Gain applied to every sound
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 1.0);

        settings.set_master_volume(2.0);
        assert_eq!(settings.master_volume, 1.0);

        settings.set_master_volume(0.5);
        settings.sfx_volume = 0.5;
        assert_eq!(settings.effective_volume(), 0.25);

        settings.set_muted(true);
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
