//! Outbound playback requests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec3;
use serde::Serialize;

use crate::sounds::SoundCategory;
use crate::variant::ClipHandle;

/// Fire-and-forget request to play a clip at a world position.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    /// Pool the clip was drawn from.
    pub category: SoundCategory,
    /// Identifier of the chosen variant.
    pub variant_id: String,
    /// Decoded PCM to play.
    pub clip: ClipHandle,
    /// Emitter position.
    pub position: Vec3,
    /// Final gain in `[0, 1]`.
    pub volume: f32,
    /// Playback rate scalar.
    pub pitch: f32,
}

impl PlaybackRequest {
    /// Serializable summary without the sample data.
    pub fn summary(&self) -> PlaybackSummary {
        PlaybackSummary {
            category: self.category,
            variant_id: self.variant_id.clone(),
            position: self.position.to_array(),
            volume: self.volume,
            frames: self.clip.frames(),
        }
    }
}

/// Loggable view of a [`PlaybackRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSummary {
    /// Pool the clip was drawn from.
    pub category: SoundCategory,
    /// Identifier of the chosen variant.
    pub variant_id: String,
    /// Emitter position.
    pub position: [f32; 3],
    /// Final gain.
    pub volume: f32,
    /// Clip length in frames.
    pub frames: usize,
}

/// Host-side consumer of playback requests.
///
/// No completion is reported back; the sink owns the clip handle for as long
/// as it needs it.
pub trait PlaybackSink {
    /// Start playing a clip.
    fn play(&mut self, request: PlaybackRequest);

    /// Move the listener used for spatialization.
    fn set_listener(&mut self, _position: Vec3) {}

    /// Housekeeping, called once per frame.
    fn update(&mut self) {}

    /// Clips still playing.
    fn active_sound_count(&self) -> usize {
        0
    }

    /// Silence everything.
    fn stop_all(&mut self) {}
}

/// Sink that discards every request.
#[derive(Debug, Default)]
pub struct NullSink;

impl PlaybackSink for NullSink {
    fn play(&mut self, _request: PlaybackRequest) {}
}

/// Sink that keeps every request, for headless runs and tests.
///
/// Clones share one request log, so a clone can be handed to the manager while
/// the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    requests: Rc<RefCell<Vec<PlaybackRequest>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests seen so far.
    pub fn requests(&self) -> Vec<PlaybackRequest> {
        self.requests.borrow().clone()
    }

    /// Number of requests seen so far.
    pub fn len(&self) -> usize {
        self.requests.borrow().len()
    }

    /// Whether nothing has been played.
    pub fn is_empty(&self) -> bool {
        self.requests.borrow().is_empty()
    }

    /// Take all requests, leaving the log empty.
    pub fn drain(&self) -> Vec<PlaybackRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl PlaybackSink for RecordingSink {
    fn play(&mut self, request: PlaybackRequest) {
        self.requests.borrow_mut().push(request);
    }
}
