//! Volume controls applied to every playback request.

use serde::{Deserialize, Serialize};

/// Audio volume settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 to 1.0)
    pub master: f32,
    /// Sound effects volume (0.0 to 1.0)
    pub sfx: f32,
    /// Whether audio is muted
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master: 1.0,
            sfx: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Create new audio settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the effective SFX volume (master * sfx).
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master * self.sfx).clamp(0.0, 1.0)
        }
    }

    /// Scale a requested cue volume by the effective SFX volume.
    pub fn apply(&self, volume: f32) -> f32 {
        (volume * self.effective_sfx_volume()).clamp(0.0, 1.0)
    }

    /// Toggle mute state.
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Set master volume (clamped to 0.0-1.0).
    pub fn set_master(&mut self, volume: f32) {
        self.master = volume.clamp(0.0, 1.0);
    }

    /// Set SFX volume (clamped to 0.0-1.0).
    pub fn set_sfx(&mut self, volume: f32) {
        self.sfx = volume.clamp(0.0, 1.0);
    }
}
