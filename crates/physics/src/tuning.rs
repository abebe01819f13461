//! Thresholds and scales for collision classification.

use serde::{Deserialize, Serialize};

/// `value` clamped to `[0, 1]`.
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Force-scaled volume with a floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeCurve {
    /// Force that maps to full volume.
    pub full_force: f32,
    /// Quietest volume once the sound plays at all.
    pub floor: f32,
}

impl VolumeCurve {
    /// `max(clamp01(force / full_force), floor)`.
    pub fn volume(&self, force: f32) -> f32 {
        clamp01(force / self.full_force).max(self.floor)
    }
}

/// Boards or glass family: slow/normal split plus volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRule {
    /// Forces below this pick the slow variant.
    pub slow_below: f32,
    /// Volume for both variants.
    pub volume: VolumeCurve,
}

/// Every threshold the classifier uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierTuning {
    /// Shortest ice contact that counts as a wind-up (seconds).
    pub min_drag_time: f32,
    /// Shortest drag path that counts as a wind-up.
    pub min_drag_distance: f32,
    /// Longest gap between ice contact and the hit (seconds).
    pub max_time_since_contact: f32,
    /// Weakest hit that can be a slapshot.
    pub min_shot_force: f32,
    /// Force that saturates the force half of the slapshot blend.
    pub slapshot_full_force: f32,
    /// Stick speed that saturates the speed half of the slapshot blend.
    pub slapshot_full_speed: f32,
    /// Share of the force term in the slapshot blend; speed gets the rest.
    pub slapshot_force_weight: f32,
    /// Quietest slapshot.
    pub slapshot_floor: f32,
    /// Volume of non-slapshot stick hits.
    pub stick_handling: VolumeCurve,
    /// Weakest ice impact that makes a sound.
    pub ice_min_force: f32,
    /// Volume of ice impacts.
    pub ice: VolumeCurve,
    /// Weakest boards impact that makes a sound.
    pub boards_min_force: f32,
    /// Puck heights above this hit glass rather than boards.
    pub glass_height: f32,
    /// Glass family.
    pub glass: WallRule,
    /// Boards family.
    pub boards: WallRule,
}

impl Default for ClassifierTuning {
    fn default() -> Self {
        Self {
            min_drag_time: 0.1,
            min_drag_distance: 0.0,
            max_time_since_contact: 1.0,
            min_shot_force: 8.0,
            slapshot_full_force: 30.0,
            slapshot_full_speed: 10.0,
            slapshot_force_weight: 0.6,
            slapshot_floor: 0.3,
            stick_handling: VolumeCurve {
                full_force: 20.0,
                floor: 0.2,
            },
            ice_min_force: 2.0,
            ice: VolumeCurve {
                full_force: 25.0,
                floor: 0.1,
            },
            boards_min_force: 1.0,
            glass_height: 2.0,
            glass: WallRule {
                slow_below: 8.0,
                volume: VolumeCurve {
                    full_force: 15.0,
                    floor: 0.1,
                },
            },
            boards: WallRule {
                slow_below: 10.0,
                volume: VolumeCurve {
                    full_force: 20.0,
                    floor: 0.15,
                },
            },
        }
    }
}

impl ClassifierTuning {
    /// Slapshot loudness from hit force and peak stick speed.
    pub fn slapshot_volume(&self, force: f32, max_stick_speed: f32) -> f32 {
        let force_term = clamp01(force / self.slapshot_full_force);
        let speed_term = clamp01(max_stick_speed / self.slapshot_full_speed);
        let blend = force_term * self.slapshot_force_weight
            + speed_term * (1.0 - self.slapshot_force_weight);
        clamp01(blend).max(self.slapshot_floor)
    }
}
