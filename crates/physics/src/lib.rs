#![warn(missing_docs)]
//! Puck collision classification: stick drag tracking and the rules that map
//! impacts to sound categories.

mod classifier;
mod drag;
mod tuning;

pub use classifier::{ClassifierPhase, CollisionClassifier};
pub use drag::DragTrackingState;
pub use rinkaudio_core::{CueSink, SoundCategory, SoundCue};
pub use tuning::{clamp01, ClassifierTuning, VolumeCurve, WallRule};
