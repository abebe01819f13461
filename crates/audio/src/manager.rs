//! Audio manager: owns the registry, the playback sink and the volume settings.

use crate::playback::{NullSink, PlaybackSink};
use crate::registry::{LoadSummary, SoundRegistry};
use crate::sounds::SoundCategory;
use crate::source::ResourceLookup;
use crate::variant::ClipHandle;
use crate::AudioSettings;
use anyhow::{anyhow, Result};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rinkaudio_core::{CueSink, SoundCue};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

#[cfg(feature = "rodio_backend")]
mod backend {
    use super::*;
    use crate::playback::PlaybackRequest;
    use anyhow::Context;
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, SpatialSink};

    /// Half the distance between the listener's ears.
    const EAR_OFFSET: f32 = 0.1;

    /// Backend state for rodio audio.
    pub struct BackendState {
        /// Output stream (must be kept alive)
        _stream: OutputStream,
        /// Stream handle for creating sinks
        stream_handle: OutputStreamHandle,
        /// Listener position for spatial sinks
        listener: Vec3,
        /// Active one-shot sound effects
        active_sounds: Vec<SpatialSink>,
    }

    impl BackendState {
        pub fn new() -> Result<Self> {
            let (stream, stream_handle) =
                OutputStream::try_default().context("Failed to create audio output stream")?;

            Ok(Self {
                _stream: stream,
                stream_handle,
                listener: Vec3::ZERO,
                active_sounds: Vec::new(),
            })
        }

        fn ears(&self) -> ([f32; 3], [f32; 3]) {
            let offset = Vec3::new(EAR_OFFSET, 0.0, 0.0);
            (
                (self.listener - offset).to_array(),
                (self.listener + offset).to_array(),
            )
        }

        fn try_play(&mut self, request: &PlaybackRequest) -> Result<()> {
            let (left, right) = self.ears();
            let sink = SpatialSink::try_new(
                &self.stream_handle,
                request.position.to_array(),
                left,
                right,
            )
            .context("Failed to create spatial sink")?;

            let format = request.clip.format();
            let source =
                SamplesBuffer::new(format.channels, format.sample_rate, request.clip.samples().to_vec());
            sink.set_volume(request.volume);
            sink.set_speed(request.pitch);
            sink.append(source);

            self.active_sounds.retain(|s| !s.empty());
            self.active_sounds.push(sink);
            Ok(())
        }
    }

    impl PlaybackSink for BackendState {
        fn play(&mut self, request: PlaybackRequest) {
            if let Err(e) = self.try_play(&request) {
                warn!("Failed to play {}: {e:#}", request.variant_id);
            }
        }

        fn set_listener(&mut self, position: Vec3) {
            self.listener = position;
            let (left, right) = self.ears();
            for sink in &self.active_sounds {
                sink.set_left_ear_position(left);
                sink.set_right_ear_position(right);
            }
        }

        fn update(&mut self) {
            self.active_sounds.retain(|s| !s.empty());
        }

        fn active_sound_count(&self) -> usize {
            self.active_sounds.len()
        }

        fn stop_all(&mut self) {
            for sink in self.active_sounds.drain(..) {
                sink.stop();
            }
        }
    }
}

#[cfg(not(feature = "rodio_backend"))]
mod backend {
    use super::*;
    use crate::playback::PlaybackRequest;

    /// Backend state stub when rodio is not available.
    pub struct BackendState;

    impl BackendState {
        pub fn new() -> Result<Self> {
            debug!("Audio backend: stub (no rodio)");
            Ok(Self)
        }
    }

    impl PlaybackSink for BackendState {
        fn play(&mut self, _request: PlaybackRequest) {}
    }
}

use backend::BackendState;

/// How often and how patiently to try opening the playback sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts (at least one is always made).
    pub attempts: u32,
    /// Blocking pause between attempts.
    pub pause: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            pause: Duration::from_millis(100),
        }
    }
}

/// Open the platform playback sink (rodio when enabled, a silent stub otherwise).
pub fn open_default_sink() -> Result<Box<dyn PlaybackSink>> {
    Ok(Box::new(BackendState::new()?))
}

/// Contextual sound playback for the rink.
///
/// Construct one explicitly at startup, register and load variants, then pass
/// it by reference to whatever needs to play sounds.
pub struct AudioManager {
    /// Where playback requests go
    sink: Box<dyn PlaybackSink>,
    /// Registered variants
    registry: SoundRegistry,
    /// Current audio settings
    settings: AudioSettings,
    /// Variant selection
    rng: StdRng,
    /// Listener position for 3D audio
    listener_pos: Vec3,
}

impl AudioManager {
    /// Create a manager on the default playback sink.
    pub fn new() -> Result<Self> {
        Ok(Self::with_sink(open_default_sink()?))
    }

    /// Create a manager that accepts requests but never plays anything.
    ///
    /// Useful for testing or headless operation.
    pub fn stub() -> Self {
        Self::with_sink(Box::new(NullSink))
    }

    /// Create a manager around an already-opened sink.
    pub fn with_sink(sink: Box<dyn PlaybackSink>) -> Self {
        Self {
            sink,
            registry: SoundRegistry::new(),
            settings: AudioSettings::default(),
            rng: StdRng::from_entropy(),
            listener_pos: Vec3::ZERO,
        }
    }

    /// Open a sink with `open`, retrying per `policy`.
    ///
    /// Pauses block the calling thread. Fails once every attempt has failed.
    pub fn acquire<F>(policy: &RetryPolicy, mut open: F) -> Result<Self>
    where
        F: FnMut() -> Result<Box<dyn PlaybackSink>>,
    {
        let attempts = policy.attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            debug!(attempt, attempts, "opening playback sink");
            match open() {
                Ok(sink) => {
                    info!(attempt, "Audio manager initialized");
                    return Ok(Self::with_sink(sink));
                }
                Err(err) => {
                    warn!(attempt, attempts, "Failed to open playback sink: {err:#}");
                    last_err = Some(err);
                    if attempt < attempts {
                        thread::sleep(policy.pause);
                    }
                }
            }
        }
        let err = last_err.unwrap_or_else(|| anyhow!("no attempt was made"));
        Err(err.context(format!(
            "failed to open playback sink after {attempts} attempts"
        )))
    }

    /// Make variant selection reproducible.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Registered variants.
    pub fn registry(&self) -> &SoundRegistry {
        &self.registry
    }

    /// Mutable registry, for the startup phase.
    pub fn registry_mut(&mut self) -> &mut SoundRegistry {
        &mut self.registry
    }

    /// Get the current audio settings.
    pub fn settings(&self) -> &AudioSettings {
        &self.settings
    }

    /// Get mutable access to audio settings.
    pub fn settings_mut(&mut self) -> &mut AudioSettings {
        &mut self.settings
    }

    /// Update audio settings.
    pub fn update_settings(&mut self, settings: AudioSettings) {
        self.settings = settings;
    }

    /// Set the listener position for 3D audio.
    pub fn set_listener_position(&mut self, pos: Vec3) {
        self.listener_pos = pos;
        self.sink.set_listener(pos);
    }

    /// Current listener position.
    pub fn listener_position(&self) -> Vec3 {
        self.listener_pos
    }

    /// Load every registered variant that is not resident yet.
    pub fn load_all(&mut self, resources: &dyn ResourceLookup) -> LoadSummary {
        self.registry.load_all(resources)
    }

    /// Clip of a random loaded variant of `category`.
    pub fn select_random(&mut self, category: SoundCategory) -> Option<ClipHandle> {
        self.registry.select_random(category, &mut self.rng)
    }

    /// Play a random variant of `category` at `position`.
    ///
    /// `volume_multiplier` is scaled by the SFX settings. Returns whether a
    /// request reached the sink.
    pub fn play_at(&mut self, category: SoundCategory, position: Vec3, volume_multiplier: f32) -> bool {
        let volume = self.settings.apply(volume_multiplier);
        if volume <= 0.0 {
            debug!(category = category.name(), "skipping silent sound");
            return false;
        }
        self.registry
            .play(category, position, volume, &mut self.rng, self.sink.as_mut())
    }

    /// Loaded variants in `category`.
    pub fn count(&self, category: SoundCategory) -> usize {
        self.registry.count(category)
    }

    /// Release every buffer, keeping registrations.
    pub fn unload_all(&mut self) {
        self.registry.unload_all();
    }

    /// Update audio state (call once per frame).
    pub fn update(&mut self) {
        self.sink.update();
    }

    /// Get the number of currently playing sounds.
    pub fn active_sound_count(&self) -> usize {
        self.sink.active_sound_count()
    }

    /// Stop all sounds.
    pub fn stop_all(&mut self) {
        self.sink.stop_all();
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::stub()
    }
}

impl CueSink for AudioManager {
    fn play_cue(&mut self, cue: &SoundCue) -> bool {
        self.play_at(cue.category, cue.position, cue.volume)
    }
}
