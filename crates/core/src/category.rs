//! Sound categories shared by the classifier and the audio pools.

use serde::{Deserialize, Serialize};

/// What physical event a sound represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SoundCategory {
    /// Hard hit against the boards
    PuckHitBoards,
    /// Soft hit against the boards
    PuckHitBoardsSlow,
    /// Hard hit against the glass
    PuckHitGlass,
    /// Soft hit against the glass
    PuckHitGlassSlow,
    /// Puck landing on or bouncing off the ice
    PuckHitIce,
    /// Slapshot
    PuckShot,
    /// Stick handling touch or wrist shot
    PuckStickHandling,
}

impl SoundCategory {
    /// Every category, in declaration order.
    pub const ALL: [SoundCategory; 7] = [
        SoundCategory::PuckHitBoards,
        SoundCategory::PuckHitBoardsSlow,
        SoundCategory::PuckHitGlass,
        SoundCategory::PuckHitGlassSlow,
        SoundCategory::PuckHitIce,
        SoundCategory::PuckShot,
        SoundCategory::PuckStickHandling,
    ];

    /// Stable snake-case name, used in logs and for external file matching.
    pub fn name(&self) -> &'static str {
        match self {
            SoundCategory::PuckHitBoards => "puck_hit_boards",
            SoundCategory::PuckHitBoardsSlow => "puck_hit_boards_slow",
            SoundCategory::PuckHitGlass => "puck_hit_glass",
            SoundCategory::PuckHitGlassSlow => "puck_hit_glass_slow",
            SoundCategory::PuckHitIce => "puck_hit_ice",
            SoundCategory::PuckShot => "puck_shot",
            SoundCategory::PuckStickHandling => "puck_stick_handling",
        }
    }

    /// Category whose name prefixes `stem`; the longest match wins so
    /// `puck_hit_glass_slow_2` lands in the slow glass pool.
    pub fn from_file_stem(stem: &str) -> Option<SoundCategory> {
        let stem = stem.to_ascii_lowercase();
        SoundCategory::ALL
            .into_iter()
            .filter(|category| stem.starts_with(category.name()))
            .max_by_key(|category| category.name().len())
    }
}
