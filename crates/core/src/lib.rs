#![warn(missing_docs)]
//! Host-boundary primitives shared across the workspace.
//!
//! Everything the simulation hands us (ticks, ground contacts, collisions) is
//! expressed here as plain data so the classifier and the replay driver can
//! consume the same values.

pub mod category;
pub mod cue;
pub mod events;

use serde::{Deserialize, Serialize};

pub use category::SoundCategory;
pub use cue::{CueSink, SoundCue};
pub use events::{CollisionEvent, HostEvent};

/// Fixed physics tick counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick of any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }
}

/// Physics layer of the object a puck or stick touched.
///
/// Hosts report layers by name; only the names below carry audio rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceLayer {
    /// Playing surface.
    Ice,
    /// Rink boards, including the glass mounted above them.
    Boards,
    /// Goal frame.
    GoalPost,
    /// A player's stick.
    Stick,
    /// Any layer without audio rules.
    Other,
}

impl SurfaceLayer {
    /// Map a host layer name onto a known layer.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Ice" => SurfaceLayer::Ice,
            "Boards" => SurfaceLayer::Boards,
            "Goal Post" => SurfaceLayer::GoalPost,
            "Stick" => SurfaceLayer::Stick,
            _ => SurfaceLayer::Other,
        }
    }

    /// Host layer name for this layer (`None` for [`SurfaceLayer::Other`]).
    pub fn name(&self) -> Option<&'static str> {
        match self {
            SurfaceLayer::Ice => Some("Ice"),
            SurfaceLayer::Boards => Some("Boards"),
            SurfaceLayer::GoalPost => Some("Goal Post"),
            SurfaceLayer::Stick => Some("Stick"),
            SurfaceLayer::Other => None,
        }
    }
}
