//! Sound subsystem lifetime: explicit startup, event routing and teardown.

use anyhow::Result;
use glam::Vec3;
use rinkaudio_audio::{
    discover_external_sounds, register_catalog, AudioManager, ByteSource, ClipHandle,
    ExternalFormat, ExternalSound, LoadSummary, PlaybackSink, ResourceLookup, SoundCategory,
    SoundRegistry, SoundVariant, DEFAULT_CATALOG,
};
use rinkaudio_core::HostEvent;
use rinkaudio_physics::{CollisionClassifier, SoundCue};
use tracing::{info, warn};

use crate::config::RinkAudioConfig;

struct ActiveSystem {
    manager: AudioManager,
    classifier: CollisionClassifier,
}

/// Owns the audio manager and the classifier once started.
///
/// Every operation is a no-op until [`SoundSystem::initialize`] succeeds and
/// after [`SoundSystem::shutdown`].
#[derive(Default)]
pub struct SoundSystem {
    active: Option<ActiveSystem>,
}

impl SoundSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a playback sink through `open`, register and load every variant.
    ///
    /// Returns the load summary, or `None` when no sink could be opened.
    pub fn initialize<F>(
        &mut self,
        config: &RinkAudioConfig,
        resources: &dyn ResourceLookup,
        open: F,
    ) -> Option<LoadSummary>
    where
        F: FnMut() -> Result<Box<dyn PlaybackSink>>,
    {
        if self.active.is_some() {
            warn!("sound system already initialized");
            return None;
        }

        let mut manager = match AudioManager::acquire(&config.startup.retry_policy(), open) {
            Ok(manager) => manager,
            Err(err) => {
                warn!("Sound system disabled: {err:#}");
                return None;
            }
        };
        if let Some(seed) = config.startup.rng_seed {
            manager.seed_rng(seed);
        }
        manager.update_settings(config.audio.clone());

        let registry = manager.registry_mut();
        let bundled = register_catalog(registry, DEFAULT_CATALOG);
        let external = match (&config.assets.external_dir, config.assets.register_external) {
            (Some(dir), true) => register_external_sounds(registry, &discover_external_sounds(dir)),
            _ => 0,
        };
        info!(
            bundled,
            external,
            total = registry.total_registered(),
            "registered sound variants"
        );

        let summary = manager.load_all(resources);
        self.active = Some(ActiveSystem {
            manager,
            classifier: CollisionClassifier::new(config.classifier.clone()),
        });
        Some(summary)
    }

    pub fn is_initialized(&self) -> bool {
        self.active.is_some()
    }

    /// The running manager, for inspection.
    pub fn manager(&self) -> Option<&AudioManager> {
        self.active.as_ref().map(|active| &active.manager)
    }

    /// Route a host event; returns the cues played.
    ///
    /// Listener moves and direct plays go straight to the manager, everything
    /// else through the classifier.
    pub fn handle(&mut self, event: &HostEvent) -> Vec<SoundCue> {
        match event {
            HostEvent::Listener { position } => {
                self.set_listener_position(*position);
                Vec::new()
            }
            HostEvent::PlaySound {
                category,
                position,
                volume,
            } => {
                if self.play_custom(*category, *position, *volume) {
                    vec![SoundCue {
                        category: *category,
                        position: *position,
                        volume: *volume,
                    }]
                } else {
                    Vec::new()
                }
            }
            _ => match self.active.as_mut() {
                Some(active) => active.classifier.handle(event, &mut active.manager),
                None => Vec::new(),
            },
        }
    }

    /// Play a random variant of `category` directly.
    pub fn play_custom(&mut self, category: SoundCategory, position: Vec3, volume: f32) -> bool {
        match self.active.as_mut() {
            Some(active) => active.manager.play_at(category, position, volume),
            None => false,
        }
    }

    /// Clip of a random loaded variant of `category`.
    pub fn random_clip(&mut self, category: SoundCategory) -> Option<ClipHandle> {
        self.active.as_mut()?.manager.select_random(category)
    }

    pub fn set_listener_position(&mut self, position: Vec3) {
        if let Some(active) = self.active.as_mut() {
            active.manager.set_listener_position(position);
        }
    }

    /// Per-frame housekeeping of the playback backend.
    pub fn update(&mut self) {
        if let Some(active) = self.active.as_mut() {
            active.manager.update();
        }
    }

    /// Release every loaded clip and drop the subsystem.
    pub fn shutdown(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.manager.stop_all();
            active.manager.unload_all();
            info!("Sound system shut down");
        }
    }
}

/// Register `.wav` files whose stem starts with a category name.
///
/// Returns how many were registered.
pub fn register_external_sounds(registry: &mut SoundRegistry, sounds: &[ExternalSound]) -> usize {
    let mut registered = 0;
    for sound in sounds {
        if sound.format != ExternalFormat::Wav {
            warn!(path = %sound.path.display(), "skipping external sound: only WAV is decoded");
            continue;
        }
        let stem = sound.stem();
        let Some(category) = SoundCategory::from_file_stem(&stem) else {
            warn!(path = %sound.path.display(), "skipping external sound: no category prefix");
            continue;
        };
        registry.register(
            category,
            SoundVariant::new(
                format!("external:{stem}"),
                stem.clone(),
                ByteSource::file(sound.path.clone()),
            ),
        );
        registered += 1;
    }
    registered
}
