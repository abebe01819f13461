//! A single interchangeable audio asset.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::source::{ByteSource, ResourceLookup, SourceError};
use crate::wav::{decode_wav, DecodeError, PcmBuffer, PcmFormat};

/// Why a variant failed to load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Bytes could not be obtained.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Bytes were not decodable PCM.
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Shared handle to decoded PCM. Cheap to clone; the samples never change.
pub type ClipHandle = Arc<PcmBuffer>;

/// One audio asset registered under a category.
///
/// Starts unloaded; [`SoundVariant::load`] decodes the bytes and
/// [`SoundVariant::unload`] releases them again.
#[derive(Debug, Clone)]
pub struct SoundVariant {
    id: String,
    display_name: String,
    source: ByteSource,
    /// Per-variant gain, applied on top of the requested volume.
    pub volume: f32,
    /// Playback rate scalar.
    pub pitch: f32,
    buffer: Option<ClipHandle>,
}

impl SoundVariant {
    /// Create an unloaded variant.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, source: ByteSource) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            source,
            volume: 1.0,
            pitch: 1.0,
            buffer: None,
        }
    }

    /// Identifier within the owning category.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name for logs.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Where the bytes come from.
    pub fn source(&self) -> &ByteSource {
        &self.source
    }

    /// Whether PCM is resident.
    pub fn is_loaded(&self) -> bool {
        self.buffer.is_some()
    }

    /// Format of the resident PCM.
    pub fn format(&self) -> Option<PcmFormat> {
        self.buffer.as_ref().map(|b| b.format())
    }

    /// Read and decode the variant's bytes.
    ///
    /// Calling this on a loaded variant decodes again and swaps the buffer.
    /// On failure the previous state is kept.
    pub fn load(&mut self, resources: &dyn ResourceLookup) -> Result<(), LoadError> {
        debug!(id = %self.id, source = %self.source.describe(), "loading sound variant");
        let bytes = self.source.read(resources)?;
        let pcm = decode_wav(&bytes)?;
        debug!(
            id = %self.id,
            frames = pcm.frames(),
            sample_rate = pcm.format().sample_rate,
            "loaded sound variant"
        );
        self.buffer = Some(Arc::new(pcm));
        Ok(())
    }

    /// Drop the resident PCM. Handles already given out stay valid.
    pub fn unload(&mut self) {
        if self.buffer.take().is_some() {
            debug!(id = %self.id, "unloaded sound variant");
        }
    }

    /// Clip to hand to playback, if loaded.
    pub fn processed_clip(&self) -> Option<ClipHandle> {
        // Per-play processing hooks in here; today the stored clip is played as-is.
        self.buffer.clone()
    }
}
