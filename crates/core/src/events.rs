//! Inbound host events.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{SoundCategory, SurfaceLayer};

/// A collision reported on the puck.
///
/// `self_*` fields describe the puck, `other_*` fields the object it hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// Simulation time in seconds.
    pub time: f32,
    /// Object name of the other collider (e.g. `"Stick (Clone)"`).
    #[serde(default)]
    pub other_label: String,
    /// Layer name of the other collider (e.g. `"Boards"`).
    #[serde(default)]
    pub other_layer: String,
    /// Relative velocity between the two bodies at contact.
    pub relative_velocity: Vec3,
    /// World position of the other collider.
    #[serde(default)]
    pub other_position: Vec3,
    /// World position of the puck.
    pub self_position: Vec3,
}

impl CollisionEvent {
    /// Impact strength proxy: magnitude of the relative velocity.
    pub fn force(&self) -> f32 {
        self.relative_velocity.length()
    }

    /// Parsed layer of the other collider.
    pub fn layer(&self) -> SurfaceLayer {
        SurfaceLayer::from_name(&self.other_layer)
    }

    /// Height of the puck at contact.
    pub fn self_height(&self) -> f32 {
        self.self_position.y
    }

    /// Height of the other collider.
    pub fn other_height(&self) -> f32 {
        self.other_position.y
    }

    /// Whether the other collider is a stick (by name or by layer).
    pub fn is_stick(&self) -> bool {
        self.other_label.contains("Stick") || self.layer() == SurfaceLayer::Stick
    }
}

/// Everything the host delivers to the audio layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    /// Fixed-timestep tick with the current stick transform.
    Tick {
        /// Tick duration in seconds.
        dt: f32,
        /// Stick blade position.
        stick_position: Vec3,
        /// Whether the stick is still touching the ground.
        grounded: bool,
    },
    /// Stick touched a surface.
    StickGrounded {
        /// Simulation time in seconds.
        time: f32,
        /// Layer name of the surface.
        surface: String,
        /// Stick blade position.
        position: Vec3,
    },
    /// Stick left the ground.
    StickUngrounded {
        /// Simulation time in seconds.
        time: f32,
    },
    /// Puck collided with something.
    Collision(CollisionEvent),
    /// Camera or listener moved.
    Listener {
        /// Listener world position.
        position: Vec3,
    },
    /// Host asks for a category to be played directly, bypassing the classifier.
    PlaySound {
        /// Category to draw a variant from.
        category: SoundCategory,
        /// World position of the emitter.
        position: Vec3,
        /// Requested volume in `[0, 1]`.
        #[serde(default = "full_volume")]
        volume: f32,
    },
}

fn full_volume() -> f32 {
    1.0
}
