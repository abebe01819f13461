//! Classified sounds and where they go.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::SoundCategory;

/// A sound the classifier wants played.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    /// Pool to draw a variant from.
    pub category: SoundCategory,
    /// Where the sound happens.
    pub position: Vec3,
    /// Loudness in `[0, 1]`.
    pub volume: f32,
}

/// Consumer of sound cues.
pub trait CueSink {
    /// Play `cue`; returns whether a clip was actually dispatched.
    fn play_cue(&mut self, cue: &SoundCue) -> bool;
}

/// Collects cues and reports every one as played.
impl CueSink for Vec<SoundCue> {
    fn play_cue(&mut self, cue: &SoundCue) -> bool {
        self.push(*cue);
        true
    }
}
