//! The bundled variant catalog.

pub use rinkaudio_core::SoundCategory;

use crate::registry::SoundRegistry;
use crate::source::ByteSource;
use crate::variant::SoundVariant;

/// One bundled variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Pool the variant joins.
    pub category: SoundCategory,
    /// Identifier, unique within its category.
    pub id: &'static str,
    /// Name shown in logs.
    pub display_name: &'static str,
    /// Embedded resource path.
    pub resource: &'static str,
}

const fn entry(
    category: SoundCategory,
    id: &'static str,
    display_name: &'static str,
    resource: &'static str,
) -> CatalogEntry {
    CatalogEntry {
        category,
        id,
        display_name,
        resource,
    }
}

/// Variants shipped with the application.
pub const DEFAULT_CATALOG: &[CatalogEntry] = &[
    entry(
        SoundCategory::PuckHitBoards,
        "boards_hit_1",
        "Boards Hit 1",
        "Resources/hockey-puck-hits-board-1.wav",
    ),
    entry(
        SoundCategory::PuckHitBoardsSlow,
        "boards_hit_slow_1",
        "Boards Hit Slow 1",
        "Resources/hockey-puck-hits-board-slow-1.wav",
    ),
    entry(
        SoundCategory::PuckHitGlass,
        "glass_hit_1",
        "Glass Hit 1",
        "Resources/hockey-puck-hits-glass-1.wav",
    ),
    entry(
        SoundCategory::PuckHitGlass,
        "glass_hit_2",
        "Glass Hit 2",
        "Resources/hockey-puck-hits-glass-2.wav",
    ),
    entry(
        SoundCategory::PuckHitGlass,
        "glass_hit_3",
        "Glass Hit 3",
        "Resources/hockey-puck-hits-glass-3.wav",
    ),
    entry(
        SoundCategory::PuckHitGlass,
        "glass_hit_4",
        "Glass Hit 4",
        "Resources/hockey-puck-hits-glass-4.wav",
    ),
    entry(
        SoundCategory::PuckHitGlass,
        "glass_hit_5",
        "Glass Hit 5",
        "Resources/hockey-puck-hits-glass-5.wav",
    ),
    entry(
        SoundCategory::PuckHitGlassSlow,
        "glass_hit_slow_1",
        "Glass Hit Slow 1",
        "Resources/hockey-puck-hits-glass-slow-1.wav",
    ),
    entry(
        SoundCategory::PuckHitGlassSlow,
        "glass_hit_slow_2",
        "Glass Hit Slow 2",
        "Resources/hockey-puck-hits-glass-slow-2.wav",
    ),
    entry(
        SoundCategory::PuckHitGlassSlow,
        "glass_hit_slow_3",
        "Glass Hit Slow 3",
        "Resources/hockey-puck-hits-glass-slow-3.wav",
    ),
    entry(
        SoundCategory::PuckHitIce,
        "puck_hit_ice_1",
        "Ice Hit 1",
        "Resources/hockey-puck-hits-ice-1.wav",
    ),
    entry(
        SoundCategory::PuckHitIce,
        "puck_hit_ice_2",
        "Ice Hit 2",
        "Resources/hockey-puck-hits-ice-2.wav",
    ),
    entry(
        SoundCategory::PuckHitIce,
        "puck_hit_ice_3",
        "Ice Hit 3",
        "Resources/hockey-puck-hits-ice-3.wav",
    ),
    entry(
        SoundCategory::PuckHitIce,
        "puck_hit_ice_4",
        "Ice Hit 4",
        "Resources/hockey-puck-hits-ice-4.wav",
    ),
    entry(
        SoundCategory::PuckShot,
        "puck_shot_1",
        "Puck Shot 1",
        "Resources/hockey-shot-1.wav",
    ),
    entry(
        SoundCategory::PuckShot,
        "puck_shot_2",
        "Puck Shot 2",
        "Resources/hockey-shot-2.wav",
    ),
    entry(
        SoundCategory::PuckStickHandling,
        "puck_shot_slow_1",
        "Puck Shot Slow 1",
        "Resources/hockey-shot-slow-1.wav",
    ),
    entry(
        SoundCategory::PuckStickHandling,
        "puck_shot_slow_2",
        "Puck Shot Slow 2",
        "Resources/hockey-shot-slow-2.wav",
    ),
    entry(
        SoundCategory::PuckStickHandling,
        "puck_shot_slow_3",
        "Puck Shot Slow 3",
        "Resources/hockey-shot-slow-3.wav",
    ),
    entry(
        SoundCategory::PuckStickHandling,
        "puck_shot_slow_4",
        "Puck Shot Slow 4",
        "Resources/hockey-shot-slow-4.wav",
    ),
    entry(
        SoundCategory::PuckStickHandling,
        "puck_shot_slow_5",
        "Puck Shot Slow 5",
        "Resources/hockey-shot-slow-5.wav",
    ),
];

impl CatalogEntry {
    /// Build the unloaded variant described by this entry.
    pub fn to_variant(&self) -> SoundVariant {
        SoundVariant::new(
            self.id,
            self.display_name,
            ByteSource::embedded(self.resource),
        )
    }
}

/// Register every catalog entry; returns how many were added.
pub fn register_catalog(registry: &mut SoundRegistry, catalog: &[CatalogEntry]) -> usize {
    for entry in catalog {
        registry.register(entry.category, entry.to_variant());
    }
    catalog.len()
}
