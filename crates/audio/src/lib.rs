//! Contextual audio for the rink.
//!
//! Decodes raw PCM clips, keeps interchangeable variants per sound category,
//! and plays a randomly chosen variant at a world position.
//!
//! # Architecture
//!
//! - [`decode_wav`] - WAV blob to normalized PCM
//! - [`SoundVariant`] - One asset with a lazy-loaded buffer
//! - [`SoundRegistry`] - Category pools, bulk load, uniform random selection
//! - [`AudioManager`] - Registry + playback sink + volume settings
//!
//! # Example
//!
//! ```ignore
//! let mut audio = AudioManager::new()?;
//! register_catalog(audio.registry_mut(), DEFAULT_CATALOG);
//! audio.load_all(&ResourceDir::new("assets"));
//! audio.play_at(SoundCategory::PuckHitIce, Vec3::new(0.0, 0.1, 3.0), 0.5);
//! ```

mod manager;
mod playback;
mod registry;
mod settings;
mod sounds;
mod source;
mod variant;
mod wav;

pub use manager::{open_default_sink, AudioManager, RetryPolicy};
pub use playback::{NullSink, PlaybackRequest, PlaybackSink, PlaybackSummary, RecordingSink};
pub use registry::{LoadSummary, SoundRegistry};
pub use settings::AudioSettings;
pub use sounds::{register_catalog, CatalogEntry, SoundCategory, DEFAULT_CATALOG};
pub use source::{
    discover_external_sounds, ByteSource, ExternalFormat, ExternalSound, ResourceDir,
    ResourceLookup, ResourceMap, SourceError,
};
pub use variant::{ClipHandle, LoadError, SoundVariant};
pub use wav::{decode_wav, DecodeError, PcmBuffer, PcmFormat, MIN_HEADER_LEN};
