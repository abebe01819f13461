//! Category → variant pools with lazy loading and random selection.

use std::collections::HashMap;

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::playback::{PlaybackRequest, PlaybackSink};
use crate::sounds::SoundCategory;
use crate::source::ResourceLookup;
use crate::variant::{ClipHandle, SoundVariant};

/// Outcome of [`SoundRegistry::load_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Variants resident after the pass.
    pub loaded: usize,
    /// Variants registered.
    pub total: usize,
}

impl LoadSummary {
    /// Variants that could not be loaded.
    pub fn failed(&self) -> usize {
        self.total - self.loaded
    }
}

/// Owns every registered variant, grouped by category in insertion order.
///
/// Mutated while the subsystem starts up, read-only afterwards.
#[derive(Debug, Default)]
pub struct SoundRegistry {
    pools: HashMap<SoundCategory, Vec<SoundVariant>>,
}

impl SoundRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `variant` to the pool for `category`.
    ///
    /// Identifiers are not checked for collisions.
    pub fn register(&mut self, category: SoundCategory, variant: SoundVariant) {
        debug!(
            category = category.name(),
            id = variant.id(),
            name = variant.display_name(),
            "registered sound variant"
        );
        self.pools.entry(category).or_default().push(variant);
    }

    /// Load every variant that is not resident yet.
    ///
    /// Failures are logged and counted; the pass never stops early.
    pub fn load_all(&mut self, resources: &dyn ResourceLookup) -> LoadSummary {
        let mut summary = LoadSummary::default();
        for category in SoundCategory::ALL {
            let Some(pool) = self.pools.get_mut(&category) else {
                continue;
            };
            for variant in pool.iter_mut() {
                summary.total += 1;
                if variant.is_loaded() {
                    summary.loaded += 1;
                    continue;
                }
                match variant.load(resources) {
                    Ok(()) => summary.loaded += 1,
                    Err(err) => warn!(
                        category = category.name(),
                        id = variant.id(),
                        source = %variant.source().describe(),
                        %err,
                        "failed to load sound variant"
                    ),
                }
            }
        }
        info!(
            loaded = summary.loaded,
            total = summary.total,
            "Loaded {}/{} sounds",
            summary.loaded,
            summary.total
        );
        summary
    }

    /// Pick a loaded variant of `category` uniformly at random.
    pub fn select_variant<R: Rng + ?Sized>(
        &self,
        category: SoundCategory,
        rng: &mut R,
    ) -> Option<&SoundVariant> {
        let pool = self.pools.get(&category)?;
        let loaded: Vec<&SoundVariant> = pool.iter().filter(|v| v.is_loaded()).collect();
        loaded.choose(rng).copied()
    }

    /// Clip of a uniformly chosen loaded variant of `category`.
    pub fn select_random<R: Rng + ?Sized>(
        &self,
        category: SoundCategory,
        rng: &mut R,
    ) -> Option<ClipHandle> {
        self.select_variant(category, rng)?.processed_clip()
    }

    /// Select a clip and hand it to `sink`. Returns whether anything was sent.
    pub fn play<R: Rng + ?Sized>(
        &self,
        category: SoundCategory,
        position: Vec3,
        volume_multiplier: f32,
        rng: &mut R,
        sink: &mut dyn PlaybackSink,
    ) -> bool {
        let Some(variant) = self.select_variant(category, rng) else {
            debug!(category = category.name(), "no loaded variant to play");
            return false;
        };
        let Some(clip) = variant.processed_clip() else {
            return false;
        };
        sink.play(PlaybackRequest {
            category,
            variant_id: variant.id().to_string(),
            clip,
            position,
            volume: (volume_multiplier * variant.volume).clamp(0.0, 1.0),
            pitch: variant.pitch,
        });
        true
    }

    /// Loaded variants in `category`.
    pub fn count(&self, category: SoundCategory) -> usize {
        self.pools
            .get(&category)
            .map(|pool| pool.iter().filter(|v| v.is_loaded()).count())
            .unwrap_or(0)
    }

    /// Registered variants in `category`, loaded or not.
    pub fn variants(&self, category: SoundCategory) -> &[SoundVariant] {
        self.pools.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Registered variants across all categories.
    pub fn total_registered(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    /// Unload every variant of `category` with identifier `id`; returns how many.
    pub fn unload_variant(&mut self, category: SoundCategory, id: &str) -> usize {
        let Some(pool) = self.pools.get_mut(&category) else {
            return 0;
        };
        let mut unloaded = 0;
        for variant in pool.iter_mut().filter(|v| v.id() == id) {
            variant.unload();
            unloaded += 1;
        }
        unloaded
    }

    /// Release every buffer. Registrations stay in place.
    pub fn unload_all(&mut self) {
        for variant in self.pools.values_mut().flatten() {
            variant.unload();
        }
        info!("All sounds unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::RecordingSink;
    use crate::source::{ByteSource, ResourceMap};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn wav_with_sample(sample: i16) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&38u32.to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&8_000u32.to_le_bytes());
        out.extend_from_slice(&16_000u32.to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&sample.to_le_bytes());
        out
    }

    /// Registry with three ice variants (one missing its bytes) and one shot.
    fn fixture() -> (SoundRegistry, ResourceMap) {
        let mut resources = ResourceMap::new();
        resources.insert("ice_1.wav", wav_with_sample(1_000));
        resources.insert("ice_2.wav", wav_with_sample(2_000));
        resources.insert("shot_1.wav", wav_with_sample(3_000));

        let mut registry = SoundRegistry::new();
        for (category, id) in [
            (SoundCategory::PuckHitIce, "ice_1"),
            (SoundCategory::PuckHitIce, "ice_2"),
            (SoundCategory::PuckHitIce, "ice_3"),
            (SoundCategory::PuckShot, "shot_1"),
        ] {
            let source = ByteSource::embedded(format!("{id}.wav"));
            registry.register(category, SoundVariant::new(id, id, source));
        }
        (registry, resources)
    }

    #[test]
    fn load_all_tolerates_partial_failure() {
        let (mut registry, resources) = fixture();
        let summary = registry.load_all(&resources);
        assert_eq!(summary, LoadSummary { loaded: 3, total: 4 });
        assert_eq!(summary.failed(), 1);
        assert_eq!(registry.total_registered(), 4);
        assert_eq!(registry.count(SoundCategory::PuckHitIce), 2);
        assert_eq!(registry.count(SoundCategory::PuckShot), 1);

        // Second pass keeps resident variants and retries the missing one.
        let again = registry.load_all(&resources);
        assert_eq!(again, LoadSummary { loaded: 3, total: 4 });
    }

    #[test]
    fn selection_only_returns_loaded_variants_of_category() {
        let (mut registry, resources) = fixture();
        registry.load_all(&resources);
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = HashSet::new();
        for _ in 0..200 {
            let variant = registry
                .select_variant(SoundCategory::PuckHitIce, &mut rng)
                .unwrap();
            assert!(variant.is_loaded());
            seen.insert(variant.id().to_string());
        }
        let expected: HashSet<String> = ["ice_1", "ice_2"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let (mut registry, resources) = fixture();
        registry.load_all(&resources);
        let mut rng = StdRng::seed_from_u64(42);

        let mut first = 0;
        let draws = 2_000;
        for _ in 0..draws {
            let variant = registry
                .select_variant(SoundCategory::PuckHitIce, &mut rng)
                .unwrap();
            if variant.id() == "ice_1" {
                first += 1;
            }
        }
        assert!((800..1_200).contains(&first), "ice_1 drawn {first} times");
    }

    #[test]
    fn selection_empty_for_unknown_or_unloaded_categories() {
        let (mut registry, resources) = fixture();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(registry.select_random(SoundCategory::PuckHitIce, &mut rng).is_none());

        registry.load_all(&resources);
        assert!(registry.select_random(SoundCategory::PuckHitGlass, &mut rng).is_none());

        registry.unload_all();
        assert!(registry.select_random(SoundCategory::PuckHitIce, &mut rng).is_none());
        assert_eq!(registry.variants(SoundCategory::PuckHitIce).len(), 3);
    }

    #[test]
    fn unloading_removes_variant_from_pool() {
        let (mut registry, resources) = fixture();
        registry.load_all(&resources);
        assert_eq!(registry.unload_variant(SoundCategory::PuckHitIce, "ice_1"), 1);
        assert_eq!(registry.count(SoundCategory::PuckHitIce), 1);

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let variant = registry
                .select_variant(SoundCategory::PuckHitIce, &mut rng)
                .unwrap();
            assert_eq!(variant.id(), "ice_2");
        }
    }

    #[test]
    fn duplicate_ids_are_independent_variants() {
        let (mut registry, resources) = fixture();
        registry.register(
            SoundCategory::PuckShot,
            SoundVariant::new("shot_1", "Shot 1 again", ByteSource::embedded("shot_1.wav")),
        );
        registry.load_all(&resources);
        assert_eq!(registry.count(SoundCategory::PuckShot), 2);
        assert_eq!(registry.unload_variant(SoundCategory::PuckShot, "shot_1"), 2);
        assert_eq!(registry.count(SoundCategory::PuckShot), 0);
    }

    #[test]
    fn play_sends_request_to_sink() {
        let (mut registry, resources) = fixture();
        registry.load_all(&resources);
        let mut rng = StdRng::seed_from_u64(9);
        let mut sink = RecordingSink::new();

        let position = Vec3::new(1.0, 0.0, -2.0);
        assert!(registry.play(SoundCategory::PuckShot, position, 0.4, &mut rng, &mut sink));
        assert!(!registry.play(SoundCategory::PuckHitBoards, position, 1.0, &mut rng, &mut sink));

        let requests = sink.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].variant_id, "shot_1");
        assert_eq!(requests[0].position, position);
        assert!((requests[0].volume - 0.4).abs() < 1e-6);
    }
}
